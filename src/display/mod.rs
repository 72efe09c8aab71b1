//! Display formatting for terminal output
//!
//! Provides utilities for formatting data models for terminal display,
//! including tables and color hints.

pub mod budget;
pub mod report;
pub mod transaction;

pub use budget::{format_budget_details, format_budget_lines, format_budget_list};
pub use transaction::{format_transaction_details, format_transaction_register};
