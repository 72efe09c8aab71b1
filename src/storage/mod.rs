//! Storage layer for fintrack
//!
//! Provides JSON file storage with atomic writes and automatic directory
//! creation. The `Storage` handle is opened once at startup, shared by
//! reference with every service, and closed at shutdown.

pub mod budget;
pub mod file_io;
pub mod transactions;

pub use budget::BudgetRepository;
pub use file_io::{read_json, write_json_atomic};
pub use transactions::TransactionRepository;

use crate::config::paths::FinancePaths;
use crate::error::FinanceError;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: FinancePaths,
    pub transactions: TransactionRepository,
    pub budgets: BudgetRepository,
}

impl Storage {
    /// Create a new Storage instance without touching disk contents
    pub fn new(paths: FinancePaths) -> Result<Self, FinanceError> {
        paths.ensure_directories()?;

        Ok(Self {
            transactions: TransactionRepository::new(paths.transactions_file()),
            budgets: BudgetRepository::new(paths.budgets_file()),
            paths,
        })
    }

    /// Create a Storage instance and load every table from disk
    pub fn open(paths: FinancePaths) -> Result<Self, FinanceError> {
        let storage = Self::new(paths)?;
        storage.load_all()?;
        tracing::debug!(base = %storage.paths.base_dir().display(), "storage opened");
        Ok(storage)
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &FinancePaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&self) -> Result<(), FinanceError> {
        self.transactions.load()?;
        self.budgets.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), FinanceError> {
        self.transactions.save()?;
        self.budgets.save()?;
        Ok(())
    }

    /// Flush every table and release the handle
    pub fn close(self) -> Result<(), FinanceError> {
        self.save_all()?;
        tracing::debug!(base = %self.paths.base_dir().display(), "storage closed");
        Ok(())
    }
}
