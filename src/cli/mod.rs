//! Terminal front end: a small command shell driving the budget controller.

pub mod output;
pub mod shell;
pub mod view;

use rustyline::error::ReadlineError;
use thiserror::Error;

use crate::errors::LedgerError;

pub use shell::run_cli;
pub use view::TerminalView;

/// Environment switch that makes the shell read commands from stdin without prompting.
pub const SCRIPT_ENV: &str = "BUDGET_WIDGET_SCRIPT";

/// User-facing CLI error wrapper.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] LedgerError),
    #[error("Line editor error: {0}")]
    Readline(#[from] ReadlineError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures of a single shell command; reported and the shell keeps running.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("Unknown command `{0}`")]
    UnknownCommand(String),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}
