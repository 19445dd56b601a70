use std::io::{self, BufRead, Stdout};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::Validator,
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};
use shell_words::split;
use strsim::levenshtein;
use tracing::debug;

use super::{
    output, view::TerminalView, CliError, CliMode, CommandError, LoopControl, SCRIPT_ENV,
};
use crate::{
    config::{Config, ConfigManager},
    controller::{BudgetView, Controller, ItemRef},
    errors::LedgerError,
    ledger::{ItemInput, RecordKind},
};

const PROMPT: &str = "budget> ";
const SUGGESTION_DISTANCE: usize = 3;

const COMMANDS: &[(&str, &str, &str)] = &[
    (
        "add",
        "add <inc|exp> <description> <value>",
        "Add an income or expense line item",
    ),
    ("delete", "delete <kind-id>", "Remove a line item, e.g. `delete exp-0`"),
    ("list", "list", "Show every line item with its current figures"),
    ("summary", "summary [--json]", "Show the budget totals"),
    (
        "config",
        "config [separators <decimal> <grouping>]",
        "Show or change number formatting",
    ),
    ("help", "help [command]", "Show available commands"),
    ("exit", "exit", "Leave the shell"),
];

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };
    if mode == CliMode::Script {
        output::disable_colors();
    }

    let config_manager = ConfigManager::new()?;
    let config = config_manager.load()?;
    let view = TerminalView::new(io::stdout(), config.format_settings());
    let mut context = ShellContext::new(mode, Controller::new(view), config_manager);
    context.controller.init();

    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
    editor.set_helper(Some(CommandHelper::new()));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);

    while context.running {
        match editor.readline(PROMPT) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                editor.add_history_entry(trimmed).ok();
                if handle_line(context, trimmed) == LoopControl::Exit {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                output::info("Exiting shell.");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        if !context.running {
            break;
        }
        let line = line?;
        if handle_line(context, &line) == LoopControl::Exit {
            break;
        }
    }
    Ok(())
}

fn handle_line(context: &mut ShellContext, line: &str) -> LoopControl {
    let tokens = match split(line) {
        Ok(tokens) => tokens,
        Err(err) => {
            output::warning(err);
            return LoopControl::Continue;
        }
    };
    let Some((raw, rest)) = tokens.split_first() else {
        return LoopControl::Continue;
    };
    let command = raw.to_lowercase();
    let args: Vec<&str> = rest.iter().map(String::as_str).collect();

    match context.dispatch(&command, &args) {
        Ok(LoopControl::Exit) => {
            context.running = false;
            LoopControl::Exit
        }
        Ok(LoopControl::Continue) => LoopControl::Continue,
        Err(err) => {
            context.report_error(err);
            LoopControl::Continue
        }
    }
}

struct ShellContext {
    mode: CliMode,
    running: bool,
    controller: Controller<TerminalView<Stdout>>,
    config_manager: ConfigManager,
}

impl ShellContext {
    fn new(
        mode: CliMode,
        controller: Controller<TerminalView<Stdout>>,
        config_manager: ConfigManager,
    ) -> Self {
        Self {
            mode,
            running: true,
            controller,
            config_manager,
        }
    }

    fn dispatch(&mut self, command: &str, args: &[&str]) -> Result<LoopControl, CommandError> {
        debug!(command, ?args, mode = ?self.mode, "dispatching command");
        match command {
            "add" => self.cmd_add(args),
            "delete" | "del" | "rm" => self.cmd_delete(args),
            "list" | "ls" => self.cmd_list(),
            "summary" => self.cmd_summary(args),
            "config" => self.cmd_config(args),
            "help" => self.cmd_help(args),
            "exit" | "quit" => Ok(LoopControl::Exit),
            other => Err(CommandError::UnknownCommand(other.to_string())),
        }
    }

    fn cmd_add(&mut self, args: &[&str]) -> Result<LoopControl, CommandError> {
        let [kind, description @ .., value] = args else {
            return Err(usage_error("add"));
        };
        if description.is_empty() {
            return Err(usage_error("add"));
        }
        let kind: RecordKind = kind.parse()?;
        let value: f64 = value.parse().map_err(|_| {
            CommandError::InvalidArguments(format!("`{value}` is not a number"))
        })?;

        let input = ItemInput::new(kind, description.join(" "), value);
        match self.controller.add_item(input)? {
            Some(item) => output::success(format!("Added {item}")),
            None => output::warning(
                "Item ignored. Description must not be empty and value must be a positive number.",
            ),
        }
        Ok(LoopControl::Continue)
    }

    fn cmd_delete(&mut self, args: &[&str]) -> Result<LoopControl, CommandError> {
        let item: ItemRef = match args {
            [reference] => reference.parse()?,
            [kind, id] => format!("{kind}-{id}").parse()?,
            _ => return Err(usage_error("delete")),
        };
        if self.controller.ledger().record(item.kind, item.id).is_none() {
            output::info(format!("No item {item}, nothing removed."));
        }
        self.controller.delete_item(item);
        Ok(LoopControl::Continue)
    }

    fn cmd_list(&mut self) -> Result<LoopControl, CommandError> {
        let lines: Vec<String> = RecordKind::ALL
            .iter()
            .flat_map(|kind| self.controller.ledger().records(*kind))
            .map(|record| self.controller.view().record_line(record))
            .collect();
        if lines.is_empty() {
            output::info("No items yet.");
        }
        let view = self.controller.view_mut();
        for line in lines {
            view.write_line(line);
        }
        Ok(LoopControl::Continue)
    }

    fn cmd_summary(&mut self, args: &[&str]) -> Result<LoopControl, CommandError> {
        let summary = self.controller.ledger().summary();
        match args {
            [] => self.controller.view_mut().display_budget(&summary),
            ["--json"] => {
                let json = serde_json::to_string_pretty(&summary)
                    .map_err(LedgerError::from)?;
                self.controller.view_mut().write_line(json);
            }
            _ => return Err(usage_error("summary")),
        }
        Ok(LoopControl::Continue)
    }

    fn cmd_config(&mut self, args: &[&str]) -> Result<LoopControl, CommandError> {
        match args {
            [] => {
                let settings = *self.controller.view().settings();
                output::info(format!(
                    "Config file: {}",
                    self.config_manager.path().display()
                ));
                output::info(format!(
                    "Decimal separator `{}`, grouping separator `{}`",
                    settings.decimal_separator, settings.grouping_separator
                ));
            }
            ["separators", decimal, grouping] => {
                let config = Config {
                    decimal_separator: single_char(decimal)?,
                    grouping_separator: single_char(grouping)?,
                };
                self.config_manager.save(&config)?;
                self.controller
                    .view_mut()
                    .set_settings(config.format_settings());
                output::success("Formatting updated.");
            }
            _ => return Err(usage_error("config")),
        }
        Ok(LoopControl::Continue)
    }

    fn cmd_help(&mut self, args: &[&str]) -> Result<LoopControl, CommandError> {
        let entries: Vec<_> = match args {
            [] => COMMANDS.iter().collect(),
            [name] => {
                let found: Vec<_> = COMMANDS.iter().filter(|(cmd, _, _)| cmd == name).collect();
                if found.is_empty() {
                    return Err(CommandError::UnknownCommand(name.to_string()));
                }
                found
            }
            _ => return Err(usage_error("help")),
        };
        output::print(output::MessageKind::Section, "Commands");
        for (_, usage, description) in entries {
            output::info(format!("{usage:<38} {description}"));
        }
        Ok(LoopControl::Continue)
    }

    fn report_error(&self, err: CommandError) {
        match err {
            CommandError::UnknownCommand(name) => {
                output::error(format!("Unknown command `{name}`."));
                if let Some(best) = suggest_command(&name) {
                    output::info(format!("Suggestion: `{best}`?"));
                }
            }
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::info("Use `help <command>` for usage details.");
            }
            CommandError::Ledger(err) => output::error(err),
        }
    }
}

fn single_char(raw: &str) -> Result<char, CommandError> {
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Ok(ch),
        _ => Err(CommandError::InvalidArguments(format!(
            "`{raw}` must be a single character"
        ))),
    }
}

fn usage_error(command: &str) -> CommandError {
    let usage = COMMANDS
        .iter()
        .find(|(name, _, _)| *name == command)
        .map(|(_, usage, _)| *usage)
        .unwrap_or(command);
    CommandError::InvalidArguments(format!("Usage: {usage}"))
}

pub(crate) fn suggest_command(input: &str) -> Option<&'static str> {
    COMMANDS
        .iter()
        .map(|(name, _, _)| (levenshtein(name, input), *name))
        .min_by_key(|(distance, _)| *distance)
        .filter(|(distance, _)| *distance <= SUGGESTION_DISTANCE)
        .map(|(_, name)| name)
}

struct CommandHelper {
    commands: Vec<String>,
}

impl CommandHelper {
    fn new() -> Self {
        let mut commands: Vec<String> = COMMANDS
            .iter()
            .map(|(name, _, _)| name.to_string())
            .collect();
        commands.sort();
        Self { commands }
    }
}

impl Helper for CommandHelper {}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let prefix = &line[..pos];
        if prefix.trim_start().contains(char::is_whitespace) {
            return Ok((pos, Vec::new()));
        }
        let start = prefix.len() - prefix.trim_start().len();
        let needle = prefix[start..].to_ascii_lowercase();
        let candidates = self
            .commands
            .iter()
            .filter(|name| name.starts_with(&needle))
            .map(|name| Pair {
                display: name.clone(),
                replacement: name.clone(),
            })
            .collect();
        Ok((start, candidates))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;
}

impl Highlighter for CommandHelper {}

impl Validator for CommandHelper {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggests_close_commands_only() {
        assert_eq!(suggest_command("ad"), Some("add"));
        assert_eq!(suggest_command("sumary"), Some("summary"));
        assert_eq!(suggest_command("completely-different"), None);
    }

    #[test]
    fn usage_error_mentions_command_usage() {
        let message = usage_error("delete").to_string();
        assert_eq!(message, "Usage: delete <kind-id>");
    }

    #[test]
    fn completes_command_names_only_in_first_word() {
        let helper = CommandHelper::new();
        let history = DefaultHistory::new();
        let ctx = ReadlineContext::new(&history);

        let (start, candidates) = helper.complete("su", 2, &ctx).unwrap();
        assert_eq!(start, 0);
        let names: Vec<_> = candidates.iter().map(|pair| pair.replacement.as_str()).collect();
        assert_eq!(names, vec!["summary"]);

        let (_, candidates) = helper.complete("add ex", 6, &ctx).unwrap();
        assert!(candidates.is_empty());
    }

    #[test]
    fn separators_must_be_single_characters() {
        assert_eq!(single_char(",").unwrap(), ',');
        assert!(single_char("").is_err());
        assert!(single_char("..").is_err());
    }
}
