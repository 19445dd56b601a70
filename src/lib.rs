#![doc(test(attr(deny(warnings))))]

//! Budget Widget keeps a running tally of income and expense line items: totals,
//! the net budget, and each expense's share of income.
//!
//! ```
//! use budget_widget::ledger::{Ledger, Percentage, RecordKind};
//!
//! let mut ledger = Ledger::new();
//! ledger.add_item(RecordKind::Income, "Salary", 100.0);
//! ledger.add_item(RecordKind::Expense, "Rent", 40.0);
//! ledger.refresh();
//!
//! let totals = ledger.aggregates();
//! assert_eq!(totals.net_budget, 60.0);
//! assert_eq!(totals.spend_percentage, Percentage::Value(40));
//! ```

pub mod cli;
pub mod config;
pub mod controller;
pub mod errors;
pub mod format;
pub mod ledger;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Budget Widget tracing initialized.");
    });
}
