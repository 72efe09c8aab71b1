//! Aggregation over an owner's ledger
//!
//! The free functions are pure derivations over a slice of transactions;
//! `AggregationService` loads the owner's ledger and applies them.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::FinanceResult;
use crate::models::{Money, OwnerId, Period, Transaction, TransactionKind};
use crate::storage::Storage;

/// Income and expense summed over a set of transactions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub income: Money,
    pub expense: Money,
}

impl Totals {
    /// Income minus expense
    pub fn balance(&self) -> Money {
        self.income - self.expense
    }

    fn record(&mut self, txn: &Transaction) {
        match txn.kind {
            TransactionKind::Income => self.income += txn.amount,
            TransactionKind::Expense => self.expense += txn.amount,
        }
    }
}

/// Income and expense of one month
pub type MonthFlow = Totals;

/// Sum income and expense across all transactions
pub fn totals(transactions: &[Transaction]) -> Totals {
    let mut totals = Totals::default();
    for txn in transactions {
        totals.record(txn);
    }
    totals
}

/// Expense per category within one month
///
/// Only categories with at least one matching expense appear.
pub fn spend_by_category(transactions: &[Transaction], month: Period) -> BTreeMap<String, Money> {
    let mut spend: BTreeMap<String, Money> = BTreeMap::new();
    for txn in transactions
        .iter()
        .filter(|t| t.is_expense() && month.contains(&t.date))
    {
        *spend.entry(txn.category.clone()).or_default() += txn.amount;
    }
    spend
}

/// Income and expense for each requested month, zero when a month is empty
pub fn income_expense_by_month(
    transactions: &[Transaction],
    months: &[Period],
) -> BTreeMap<Period, MonthFlow> {
    let mut flows: BTreeMap<Period, MonthFlow> =
        months.iter().map(|m| (*m, MonthFlow::default())).collect();

    for txn in transactions {
        if let Some(flow) = flows.get_mut(&txn.date.period()) {
            flow.record(txn);
        }
    }
    flows
}

/// Service computing derived figures for one owner at a time
pub struct AggregationService<'a> {
    storage: &'a Storage,
}

impl<'a> AggregationService<'a> {
    /// Create a new aggregation service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    fn ledger(&self, owner: &OwnerId) -> FinanceResult<Vec<Transaction>> {
        self.storage.transactions.list_for_owner(owner)
    }

    /// Income and expense across all of an owner's transactions
    pub fn totals(&self, owner: &OwnerId) -> FinanceResult<Totals> {
        Ok(totals(&self.ledger(owner)?))
    }

    /// Expense per category for one month
    pub fn spend_by_category(
        &self,
        owner: &OwnerId,
        month: Period,
    ) -> FinanceResult<BTreeMap<String, Money>> {
        Ok(spend_by_category(&self.ledger(owner)?, month))
    }

    /// Income and expense for each requested month
    pub fn income_expense_by_month(
        &self,
        owner: &OwnerId,
        months: &[Period],
    ) -> FinanceResult<BTreeMap<Period, MonthFlow>> {
        Ok(income_expense_by_month(&self.ledger(owner)?, months))
    }
}
