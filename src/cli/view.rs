use std::io::Write;

use chrono::NaiveDate;
use colored::Colorize;
use tracing::warn;

use crate::{
    controller::{BudgetView, ItemRef},
    format::{format_amount, format_budget, format_percentage, month_label, FormatSettings},
    ledger::{BudgetSummary, Percentage, Record, RecordKind},
};

/// Line-oriented [`BudgetView`] that writes to any `Write` sink.
pub struct TerminalView<W: Write> {
    out: W,
    settings: FormatSettings,
    expense_rows: Vec<ItemRef>,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W, settings: FormatSettings) -> Self {
        Self {
            out,
            settings,
            expense_rows: Vec::new(),
        }
    }

    pub fn settings(&self) -> &FormatSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: FormatSettings) {
        self.settings = settings;
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// One line per record, as shown by `add` and `list`.
    pub fn record_line(&self, record: &Record) -> String {
        let amount = format_amount(record.kind, record.value, &self.settings);
        let amount = match record.kind {
            RecordKind::Income => amount.green().to_string(),
            RecordKind::Expense => amount.red().to_string(),
        };
        let mut line = format!(
            "  {:<7} {:<24} {}",
            ItemRef::from(record).to_string(),
            record.description,
            amount
        );
        if let Some(percentage) = record.percentage() {
            line.push_str(&format!("  {}", format_percentage(percentage)));
        }
        line
    }

    pub fn write_line(&mut self, line: impl AsRef<str>) {
        if let Err(err) = writeln!(self.out, "{}", line.as_ref()) {
            warn!(%err, "failed to write view output");
        }
    }
}

impl<W: Write> BudgetView for TerminalView<W> {
    fn display_month(&mut self, today: NaiveDate) {
        let title = format!("=== Available budget in {} ===", month_label(&today));
        self.write_line(title.bold().to_string());
    }

    fn add_list_item(&mut self, record: &Record) {
        if record.kind == RecordKind::Expense {
            self.expense_rows.push(ItemRef::from(record));
        }
        let line = self.record_line(record);
        self.write_line(line);
    }

    fn delete_list_item(&mut self, item: ItemRef) {
        self.expense_rows.retain(|row| *row != item);
        self.write_line(format!("  removed {item}"));
    }

    fn clear_fields(&mut self) {}

    fn display_budget(&mut self, summary: &BudgetSummary) {
        let budget = format_budget(summary.net_budget, &self.settings);
        let income = format_amount(RecordKind::Income, summary.total_income, &self.settings);
        let expense = format_amount(RecordKind::Expense, summary.total_expense, &self.settings);
        self.write_line(format!(
            "Budget {budget} | Income {income} | Expenses {expense} ({})",
            format_percentage(summary.spend_percentage)
        ));
    }

    fn display_percentages(&mut self, percentages: &[Percentage]) {
        if self.expense_rows.is_empty() {
            return;
        }
        let shares: Vec<String> = self
            .expense_rows
            .iter()
            .zip(percentages)
            .map(|(row, percentage)| format!("{row} {}", format_percentage(*percentage)))
            .collect();
        self.write_line(format!("Expense shares: {}", shares.join(", ")));
    }
}
