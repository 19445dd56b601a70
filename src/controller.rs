//! Sequences ledger mutations and view refreshes for each user action.

use std::{fmt, str::FromStr};

use chrono::{Local, NaiveDate};
use tracing::{debug, info};

use crate::{
    errors::LedgerError,
    ledger::{BudgetSummary, ItemInput, Ledger, Percentage, Record, RecordKind},
};

/// Rendering side of the widget. Implementations only draw; they never touch the ledger.
pub trait BudgetView {
    fn display_month(&mut self, today: NaiveDate);
    fn add_list_item(&mut self, record: &Record);
    fn delete_list_item(&mut self, item: ItemRef);
    fn clear_fields(&mut self);
    fn display_budget(&mut self, summary: &BudgetSummary);
    fn display_percentages(&mut self, percentages: &[Percentage]);
}

/// Reference to a rendered line item, written as `inc-3` or `exp-0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemRef {
    pub kind: RecordKind,
    pub id: u32,
}

impl ItemRef {
    pub fn new(kind: RecordKind, id: u32) -> Self {
        Self { kind, id }
    }
}

impl From<&Record> for ItemRef {
    fn from(record: &Record) -> Self {
        Self::new(record.kind, record.id)
    }
}

impl fmt::Display for ItemRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.kind.code(), self.id)
    }
}

impl FromStr for ItemRef {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, id) = s.trim().split_once('-').ok_or_else(|| {
            LedgerError::InvalidReference(format!("`{s}` is not of the form <kind>-<id>"))
        })?;
        let id = id
            .parse::<u32>()
            .map_err(|_| LedgerError::InvalidReference(format!("`{id}` is not a valid item id")))?;
        Ok(Self::new(kind.parse()?, id))
    }
}

/// Owns the ledger and drives a [`BudgetView`] after every change.
pub struct Controller<V: BudgetView> {
    ledger: Ledger,
    view: V,
}

impl<V: BudgetView> Controller<V> {
    pub fn new(view: V) -> Self {
        Self::with_ledger(Ledger::new(), view)
    }

    pub fn with_ledger(ledger: Ledger, view: V) -> Self {
        Self { ledger, view }
    }

    /// Initial render: current month and zeroed figures.
    pub fn init(&mut self) {
        info!("Budget widget started.");
        self.view.display_month(Local::now().date_naive());
        self.view.display_budget(&BudgetSummary::zeroed());
    }

    /// Adds a validated item and refreshes the view.
    ///
    /// Invalid input is dropped without touching the ledger, returning `Ok(None)`.
    pub fn add_item(&mut self, input: ItemInput) -> Result<Option<ItemRef>, LedgerError> {
        let record = match self.ledger.try_add_item(input) {
            Ok(record) => record,
            Err(LedgerError::InvalidInput(reason)) => {
                debug!(%reason, "ignoring invalid item");
                return Ok(None);
            }
            Err(err) => return Err(err),
        };
        let item = ItemRef::from(record);
        self.view.add_list_item(record);
        self.view.clear_fields();
        self.update_budget();
        self.update_percentages();
        Ok(Some(item))
    }

    pub fn delete_item(&mut self, item: ItemRef) {
        if self.ledger.delete_item(item.kind, item.id) {
            self.view.delete_list_item(item);
        }
        self.update_budget();
        self.update_percentages();
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn into_parts(self) -> (Ledger, V) {
        (self.ledger, self.view)
    }

    fn update_budget(&mut self) {
        self.ledger.recompute_aggregates();
        let summary = self.ledger.aggregates();
        self.view.display_budget(&summary);
    }

    fn update_percentages(&mut self) {
        self.ledger.recompute_percentages();
        let percentages = self.ledger.expense_percentages();
        self.view.display_percentages(&percentages);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingView {
        rows: Vec<ItemRef>,
        budgets: Vec<BudgetSummary>,
        percentages: Vec<Vec<Percentage>>,
        clears: usize,
        month: Option<NaiveDate>,
    }

    impl BudgetView for RecordingView {
        fn display_month(&mut self, today: NaiveDate) {
            self.month = Some(today);
        }

        fn add_list_item(&mut self, record: &Record) {
            self.rows.push(ItemRef::from(record));
        }

        fn delete_list_item(&mut self, item: ItemRef) {
            self.rows.retain(|row| *row != item);
        }

        fn clear_fields(&mut self) {
            self.clears += 1;
        }

        fn display_budget(&mut self, summary: &BudgetSummary) {
            self.budgets.push(*summary);
        }

        fn display_percentages(&mut self, percentages: &[Percentage]) {
            self.percentages.push(percentages.to_vec());
        }
    }

    #[test]
    fn item_ref_parses_and_prints() {
        let item: ItemRef = "exp-12".parse().unwrap();
        assert_eq!(item, ItemRef::new(RecordKind::Expense, 12));
        assert_eq!(item.to_string(), "exp-12");
        assert!("exp".parse::<ItemRef>().is_err());
        assert!("exp-x".parse::<ItemRef>().is_err());
        assert!("foo-1".parse::<ItemRef>().is_err());
    }

    #[test]
    fn init_renders_zeroed_budget() {
        let mut controller = Controller::new(RecordingView::default());
        controller.init();
        assert!(controller.view().month.is_some());
        assert_eq!(controller.view().budgets, vec![BudgetSummary::zeroed()]);
    }

    #[test]
    fn invalid_input_leaves_everything_untouched() {
        let mut controller = Controller::new(RecordingView::default());
        let added = controller
            .add_item(ItemInput::new(RecordKind::Income, "", 10.0))
            .unwrap();
        assert_eq!(added, None);
        for value in [0.0, -4.0, f64::NAN] {
            let added = controller
                .add_item(ItemInput::new(RecordKind::Expense, "Rent", value))
                .unwrap();
            assert_eq!(added, None);
        }
        assert!(controller.ledger().is_empty());
        assert!(controller.view().budgets.is_empty());
        assert_eq!(controller.view().clears, 0);
    }

    #[test]
    fn add_refreshes_budget_and_percentages() {
        let mut controller = Controller::new(RecordingView::default());
        controller
            .add_item(ItemInput::new(RecordKind::Income, "Salary", 100.0))
            .unwrap();
        let rent = controller
            .add_item(ItemInput::new(RecordKind::Expense, "Rent", 40.0))
            .unwrap()
            .expect("valid item");

        let view = controller.view();
        assert_eq!(view.rows.len(), 2);
        assert_eq!(view.clears, 2);
        let last = view.budgets.last().unwrap();
        assert_eq!(last.net_budget, 60.0);
        assert_eq!(last.spend_percentage, Percentage::Value(40));
        assert_eq!(view.percentages.last().unwrap(), &vec![Percentage::Value(40)]);

        controller.delete_item(rent);
        let view = controller.view();
        assert_eq!(view.rows, vec![ItemRef::new(RecordKind::Income, 0)]);
        assert_eq!(view.budgets.last().unwrap().total_expense, 0.0);
        assert!(view.percentages.last().unwrap().is_empty());
        assert!(!controller.ledger().is_stale());
    }

    #[test]
    fn deleting_unknown_item_still_refreshes() {
        let mut controller = Controller::new(RecordingView::default());
        controller.delete_item(ItemRef::new(RecordKind::Expense, 7));
        assert_eq!(controller.view().budgets.len(), 1);
        assert_eq!(
            controller.view().budgets[0].spend_percentage,
            Percentage::Undefined
        );
    }
}
