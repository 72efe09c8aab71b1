//! Core data models for fintrack
//!
//! This module contains the data structures of the ledger domain:
//! transactions, budgets, money amounts and calendar-month periods.

pub mod budget;
pub mod ids;
pub mod money;
pub mod period;
pub mod transaction;

pub use budget::{normalize_budget_category, Budget, BudgetKey, BudgetLine, GENERAL_BUDGET_LABEL};
pub use ids::{BudgetId, OwnerId, TransactionId};
pub use money::Money;
pub use period::{Period, TxDate};
pub use transaction::{Transaction, TransactionKind, TransactionPatch};
