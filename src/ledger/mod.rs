//! In-memory budget ledger: line items, their derived totals and percentages.

#[allow(clippy::module_inception)]
pub mod ledger;
pub mod record;
pub mod summary;

pub use ledger::Ledger;
pub use record::{ItemInput, Percentage, Record, RecordKind};
pub use summary::BudgetSummary;
