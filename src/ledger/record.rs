//! Line items held by the ledger and the percentage figure attached to expenses.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::LedgerError;

/// Whether a line item adds to or draws from the budget.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Income,
    Expense,
}

impl RecordKind {
    pub const ALL: [RecordKind; 2] = [RecordKind::Income, RecordKind::Expense];

    /// Short code used in item references (`inc-0`, `exp-3`).
    pub fn code(self) -> &'static str {
        match self {
            RecordKind::Income => "inc",
            RecordKind::Expense => "exp",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RecordKind::Income => "Income",
            RecordKind::Expense => "Expense",
        };
        f.write_str(label)
    }
}

impl FromStr for RecordKind {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inc" | "income" | "+" => Ok(RecordKind::Income),
            "exp" | "expense" | "-" => Ok(RecordKind::Expense),
            other => Err(LedgerError::InvalidReference(format!(
                "unknown item kind `{other}` (expected `inc` or `exp`)"
            ))),
        }
    }
}

/// Share of total income, or `Undefined` when there is no income to measure against.
///
/// Serialised as a bare integer with `-1` standing in for `Undefined`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum Percentage {
    #[default]
    Undefined,
    Value(i64),
}

impl Percentage {
    pub const SENTINEL: i64 = -1;

    /// `round(part / whole * 100)` when `whole` is positive, `Undefined` otherwise.
    pub fn of(part: f64, whole: f64) -> Self {
        if whole > 0.0 {
            Percentage::Value((part / whole * 100.0).round() as i64)
        } else {
            Percentage::Undefined
        }
    }

    pub fn value(self) -> Option<i64> {
        match self {
            Percentage::Value(value) => Some(value),
            Percentage::Undefined => None,
        }
    }

    pub fn is_undefined(self) -> bool {
        matches!(self, Percentage::Undefined)
    }
}

impl From<i64> for Percentage {
    fn from(raw: i64) -> Self {
        if raw < 0 {
            Percentage::Undefined
        } else {
            Percentage::Value(raw)
        }
    }
}

impl From<Percentage> for i64 {
    fn from(percentage: Percentage) -> Self {
        percentage.value().unwrap_or(Percentage::SENTINEL)
    }
}

/// A single income or expense line item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Record {
    pub id: u32,
    pub description: String,
    pub value: f64,
    pub kind: RecordKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage: Option<Percentage>,
}

impl Record {
    pub fn new(kind: RecordKind, id: u32, description: impl Into<String>, value: f64) -> Self {
        let percentage = match kind {
            RecordKind::Expense => Some(Percentage::Undefined),
            RecordKind::Income => None,
        };
        Self {
            id,
            description: description.into(),
            value,
            kind,
            percentage,
        }
    }

    /// Recomputes this record's share of `total_income`. Income records are left untouched.
    pub fn calc_percentage(&mut self, total_income: f64) {
        if self.kind == RecordKind::Expense {
            self.percentage = Some(Percentage::of(self.value, total_income));
        }
    }

    pub fn percentage(&self) -> Option<Percentage> {
        self.percentage
    }
}

/// Raw line item as captured from a front end, before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemInput {
    pub kind: RecordKind,
    pub description: String,
    pub value: f64,
}

impl ItemInput {
    pub fn new(kind: RecordKind, description: impl Into<String>, value: f64) -> Self {
        Self {
            kind,
            description: description.into(),
            value,
        }
    }

    /// Rejects blank descriptions and values that are not positive finite numbers.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.description.trim().is_empty() {
            return Err(LedgerError::InvalidInput(
                "description must not be empty".into(),
            ));
        }
        if !self.value.is_finite() || self.value <= 0.0 {
            return Err(LedgerError::InvalidInput(format!(
                "value must be a positive number, got {}",
                self.value
            )));
        }
        Ok(())
    }
}
