//! Service layer for fintrack
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation, owner scoping and derived figures.

pub mod aggregation;
pub mod budget;
pub mod period;
pub mod transaction;

pub use aggregation::{AggregationService, MonthFlow, Totals};
pub use budget::BudgetService;
pub use period::PeriodService;
pub use transaction::{CreateTransactionInput, TransactionService};
