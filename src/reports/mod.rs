//! Reports module for fintrack
//!
//! Read models assembled from the ledger, the budget registry and the
//! aggregation functions: a dashboard snapshot and a multi-month trend.

pub mod dashboard;
pub mod trend;

pub use dashboard::{budget_usage, BudgetUsage, DashboardSnapshot};
pub use trend::{TrendReport, MAX_TREND_MONTHS};
