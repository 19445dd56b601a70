use serde::{Deserialize, Serialize};

use super::record::{Percentage, Record};

/// Snapshot of the derived budget figures.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct BudgetSummary {
    pub net_budget: f64,
    pub total_income: f64,
    pub total_expense: f64,
    pub spend_percentage: Percentage,
}

impl BudgetSummary {
    /// Figures shown before anything has been entered.
    pub fn zeroed() -> Self {
        Self {
            net_budget: 0.0,
            total_income: 0.0,
            total_expense: 0.0,
            spend_percentage: Percentage::Value(0),
        }
    }

    pub fn from_records(income: &[Record], expenses: &[Record]) -> Self {
        let total_income = total(income);
        let total_expense = total(expenses);
        Self {
            net_budget: total_income - total_expense,
            total_income,
            total_expense,
            spend_percentage: Percentage::of(total_expense, total_income),
        }
    }
}

fn total(records: &[Record]) -> f64 {
    records.iter().map(|record| record.value).sum()
}
