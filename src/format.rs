//! Display strings for amounts, percentages and the budget month.

use chrono::{Datelike, Month};

use crate::ledger::{Percentage, RecordKind};

const EMPTY_PERCENTAGE: &str = "---";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatSettings {
    pub decimal_separator: char,
    pub grouping_separator: char,
}

impl Default for FormatSettings {
    fn default() -> Self {
        Self {
            decimal_separator: '.',
            grouping_separator: ',',
        }
    }
}

/// Renders `value` as `+ 1,234.56` for income or `- 1,234.56` for expenses.
///
/// The sign comes from `kind` alone; the magnitude is always taken as absolute.
pub fn format_amount(kind: RecordKind, value: f64, settings: &FormatSettings) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, dec_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = match kind {
        RecordKind::Income => '+',
        RecordKind::Expense => '-',
    };
    format!(
        "{sign} {}{}{dec_part}",
        group_digits(int_part, settings.grouping_separator),
        settings.decimal_separator
    )
}

/// Net budgets above zero read as income; zero and below read as expense.
pub fn budget_sign(net_budget: f64) -> RecordKind {
    if net_budget > 0.0 {
        RecordKind::Income
    } else {
        RecordKind::Expense
    }
}

pub fn format_budget(net_budget: f64, settings: &FormatSettings) -> String {
    format_amount(budget_sign(net_budget), net_budget, settings)
}

/// `40%` for positive figures, `---` for zero or the undefined sentinel.
pub fn format_percentage(percentage: Percentage) -> String {
    match percentage {
        Percentage::Value(value) if value > 0 => format!("{value}%"),
        _ => EMPTY_PERCENTAGE.to_string(),
    }
}

pub fn month_label(date: &impl Datelike) -> String {
    let name = u8::try_from(date.month())
        .ok()
        .and_then(|month| Month::try_from(month).ok())
        .map(|month| month.name())
        .unwrap_or("Unknown");
    format!("{} {}", name, date.year())
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped
}
