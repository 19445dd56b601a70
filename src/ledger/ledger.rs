use serde::Serialize;
use tracing::debug;

use crate::errors::LedgerError;

use super::{
    record::{ItemInput, Percentage, Record, RecordKind},
    summary::BudgetSummary,
};

/// Income and expense line items plus the cached figures derived from them.
///
/// Mutations leave the cache untouched. Call [`Ledger::recompute_aggregates`] and
/// [`Ledger::recompute_percentages`] (or [`Ledger::refresh`]) before reading
/// [`Ledger::aggregates`] or [`Ledger::expense_percentages`]. [`Ledger::summary`]
/// skips the cache entirely.
///
/// Only [`Ledger::new`] and the add operations build records, so ids always
/// follow the last-record rule.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Ledger {
    income: Vec<Record>,
    expenses: Vec<Record>,
    totals: BudgetSummary,
    #[serde(skip)]
    aggregates_stale: bool,
    #[serde(skip)]
    percentages_stale: bool,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record without validating it. Ids continue from the last stored
    /// record of the same kind, so gaps left by deletes are never refilled.
    ///
    /// # Panics
    ///
    /// Panics when the last id of `kind` is `u32::MAX`. [`Ledger::try_add_item`]
    /// reports that case as an error instead.
    pub fn add_item(
        &mut self,
        kind: RecordKind,
        description: impl Into<String>,
        value: f64,
    ) -> &Record {
        match self.next_id(kind) {
            Ok(id) => self.push_record(kind, id, description.into(), value),
            Err(err) => panic!("{err}"),
        }
    }

    /// Validating counterpart of [`Ledger::add_item`].
    pub fn try_add_item(&mut self, input: ItemInput) -> Result<&Record, LedgerError> {
        input.validate()?;
        let id = self.next_id(input.kind)?;
        let ItemInput {
            kind,
            description,
            value,
        } = input;
        Ok(self.push_record(kind, id, description, value))
    }

    /// Removes the record with `id` if present. Unknown ids are ignored.
    pub fn delete_item(&mut self, kind: RecordKind, id: u32) -> bool {
        let collection = self.collection_mut(kind);
        match collection.iter().position(|record| record.id == id) {
            Some(index) => {
                collection.remove(index);
                self.mark_stale();
                debug!(kind = kind.code(), id, "record deleted");
                true
            }
            None => {
                debug!(kind = kind.code(), id, "delete ignored, no such record");
                false
            }
        }
    }

    pub fn recompute_aggregates(&mut self) {
        self.totals = self.summary();
        self.aggregates_stale = false;
        debug!(
            net_budget = self.totals.net_budget,
            total_income = self.totals.total_income,
            total_expense = self.totals.total_expense,
            "aggregates recomputed"
        );
    }

    /// Uses the cached income total, so run after [`Ledger::recompute_aggregates`].
    /// Percentages computed from stale totals stay flagged as stale.
    pub fn recompute_percentages(&mut self) {
        let total_income = self.totals.total_income;
        for record in &mut self.expenses {
            record.calc_percentage(total_income);
        }
        self.percentages_stale = self.aggregates_stale;
    }

    pub fn refresh(&mut self) {
        self.recompute_aggregates();
        self.recompute_percentages();
    }

    pub fn aggregates(&self) -> BudgetSummary {
        self.totals
    }

    pub fn expense_percentages(&self) -> Vec<Percentage> {
        self.expenses
            .iter()
            .map(|record| record.percentage().unwrap_or_default())
            .collect()
    }

    /// Figures computed straight from the current records.
    pub fn summary(&self) -> BudgetSummary {
        BudgetSummary::from_records(&self.income, &self.expenses)
    }

    /// True when records changed after the last full refresh.
    pub fn is_stale(&self) -> bool {
        self.aggregates_stale || self.percentages_stale
    }

    pub fn records(&self, kind: RecordKind) -> &[Record] {
        match kind {
            RecordKind::Income => &self.income,
            RecordKind::Expense => &self.expenses,
        }
    }

    pub fn record(&self, kind: RecordKind, id: u32) -> Option<&Record> {
        self.records(kind).iter().find(|record| record.id == id)
    }

    pub fn len(&self, kind: RecordKind) -> usize {
        self.records(kind).len()
    }

    pub fn is_empty(&self) -> bool {
        self.income.is_empty() && self.expenses.is_empty()
    }

    fn next_id(&self, kind: RecordKind) -> Result<u32, LedgerError> {
        match self.records(kind).last() {
            None => Ok(0),
            Some(last) => last.id.checked_add(1).ok_or_else(|| {
                LedgerError::IdsExhausted(format!(
                    "no {} ids left after {}",
                    kind.code(),
                    last.id
                ))
            }),
        }
    }

    fn push_record(
        &mut self,
        kind: RecordKind,
        id: u32,
        description: String,
        value: f64,
    ) -> &Record {
        let collection = self.collection_mut(kind);
        collection.push(Record::new(kind, id, description, value));
        self.mark_stale();
        debug!(kind = kind.code(), id, value, "record added");
        &self.records(kind)[self.len(kind) - 1]
    }

    fn mark_stale(&mut self) {
        self.aggregates_stale = true;
        self.percentages_stale = true;
    }

    fn collection_mut(&mut self, kind: RecordKind) -> &mut Vec<Record> {
        match kind {
            RecordKind::Income => &mut self.income,
            RecordKind::Expense => &mut self.expenses,
        }
    }
}
