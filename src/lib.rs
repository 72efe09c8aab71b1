//! fintrack - Terminal personal finance ledger
//!
//! This library records income and expense transactions per owner, keeps
//! monthly spending budgets (per category, or one general budget covering
//! everything else) and derives totals, category breakdowns and
//! multi-month income/expense trends from the ledger.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (transactions, budgets, money, periods)
//! - `storage`: JSON file storage layer
//! - `services`: Ledger, budget registry, aggregation and period logic
//! - `reports`: Dashboard snapshot and trend report
//! - `display`: Terminal formatting
//! - `cli`: Command handlers for the `fintrack` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use fintrack::config::paths::FinancePaths;
//! use fintrack::models::OwnerId;
//! use fintrack::services::AggregationService;
//! use fintrack::storage::Storage;
//!
//! let storage = Storage::open(FinancePaths::new()?)?;
//! let totals = AggregationService::new(&storage).totals(&OwnerId::new("alice")?)?;
//! storage.close()?;
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{FinanceError, FinanceResult};
