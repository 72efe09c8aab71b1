//! Budget repository for JSON storage
//!
//! Manages loading and saving budgets to budgets.json. A unique index on
//! `(owner, month, category)` is kept next to the records, and both are
//! guarded by the same lock so every constrained write is one step.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;

use crate::error::FinanceError;
use crate::models::{Budget, BudgetId, BudgetKey, Money, OwnerId, Period};

use super::file_io::{read_json, write_json_atomic};

/// Serializable budget data
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct BudgetData {
    #[serde(default)]
    budgets: Vec<Budget>,
}

#[derive(Debug, Default)]
struct BudgetTable {
    records: HashMap<BudgetId, Budget>,
    /// Unique index: (owner, month, category) -> budget id
    by_key: HashMap<BudgetKey, BudgetId>,
}

impl BudgetTable {
    fn owned(&self, owner: &OwnerId, id: BudgetId) -> Option<&Budget> {
        self.records.get(&id).filter(|b| &b.owner == owner)
    }
}

/// Repository for budget persistence
pub struct BudgetRepository {
    path: PathBuf,
    table: RwLock<BudgetTable>,
}

impl BudgetRepository {
    /// Create a new budget repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            table: RwLock::new(BudgetTable::default()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, BudgetTable>, FinanceError> {
        self.table
            .read()
            .map_err(|e| FinanceError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, BudgetTable>, FinanceError> {
        self.table
            .write()
            .map_err(|e| FinanceError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    /// Load budgets from disk and rebuild the unique index
    pub fn load(&self) -> Result<(), FinanceError> {
        let file_data: BudgetData = read_json(&self.path)?;

        let mut records = HashMap::new();
        let mut by_key = HashMap::new();
        for budget in file_data.budgets {
            let key = budget.key();
            if by_key.insert(key.clone(), budget.id).is_some() {
                return Err(FinanceError::Storage(format!(
                    "Duplicate budget {} for owner {} in {}",
                    key,
                    key.owner,
                    self.path.display()
                )));
            }
            records.insert(budget.id, budget);
        }

        let mut table = self.write()?;
        table.records = records;
        table.by_key = by_key;

        tracing::debug!(path = %self.path.display(), count = table.records.len(), "loaded budgets");
        Ok(())
    }

    /// Save budgets to disk
    pub fn save(&self) -> Result<(), FinanceError> {
        let table = self.read()?;

        let mut budgets: Vec<_> = table.records.values().cloned().collect();
        budgets.sort_by(|a, b| {
            a.owner
                .cmp(&b.owner)
                .then_with(|| Budget::registry_order(a, b))
        });

        write_json_atomic(&self.path, &BudgetData { budgets })?;

        tracing::debug!(path = %self.path.display(), count = table.records.len(), "saved budgets");
        Ok(())
    }

    /// Insert a budget unless its `(owner, month, category)` is already taken
    pub fn insert_unique(&self, mut budget: Budget) -> Result<Budget, FinanceError> {
        let mut table = self.write()?;

        let key = budget.key();
        if table.by_key.contains_key(&key) {
            return Err(FinanceError::budget_conflict(key.to_string()));
        }

        let now = Utc::now();
        budget.created_at = now;
        budget.updated_at = now;

        table.by_key.insert(key, budget.id);
        table.records.insert(budget.id, budget.clone());
        Ok(budget)
    }

    /// Get a budget by ID if it belongs to `owner`
    pub fn get(&self, owner: &OwnerId, id: BudgetId) -> Result<Option<Budget>, FinanceError> {
        let table = self.read()?;
        Ok(table.owned(owner, id).cloned())
    }

    /// All budgets of an owner, newest month first
    pub fn list_for_owner(&self, owner: &OwnerId) -> Result<Vec<Budget>, FinanceError> {
        let table = self.read()?;

        let mut budgets: Vec<_> = table
            .records
            .values()
            .filter(|b| &b.owner == owner)
            .cloned()
            .collect();
        budgets.sort_by(Budget::registry_order);
        Ok(budgets)
    }

    /// Budgets of an owner for one month, general budget first then by category
    pub fn for_period(&self, owner: &OwnerId, month: Period) -> Result<Vec<Budget>, FinanceError> {
        let table = self.read()?;

        let mut budgets: Vec<_> = table
            .records
            .values()
            .filter(|b| &b.owner == owner && b.month == month)
            .cloned()
            .collect();
        budgets.sort_by(|a, b| a.category.cmp(&b.category));
        Ok(budgets)
    }

    /// Replace month, category and amount of a budget
    ///
    /// Existence check, uniqueness check and write happen under one write
    /// lock. On `NotFound` or `Conflict` the stored record is unchanged.
    /// Returns the record as it was before the change and as it is now.
    pub fn update_unique(
        &self,
        owner: &OwnerId,
        id: BudgetId,
        month: Period,
        category: Option<String>,
        amount: Money,
    ) -> Result<(Budget, Budget), FinanceError> {
        let mut table = self.write()?;

        let current = table
            .owned(owner, id)
            .cloned()
            .ok_or_else(|| FinanceError::budget_not_found(id.to_string()))?;

        let old_key = current.key();
        let new_key = BudgetKey::new(owner.clone(), month, category.clone());

        if new_key != old_key {
            if let Some(&holder) = table.by_key.get(&new_key) {
                if holder != id {
                    return Err(FinanceError::budget_conflict(new_key.to_string()));
                }
            }
        }

        let mut updated = current.clone();
        updated.month = month;
        updated.category = category;
        updated.amount = amount;
        updated.updated_at = Utc::now();

        table.by_key.remove(&old_key);
        table.by_key.insert(new_key, id);
        table.records.insert(id, updated.clone());
        Ok((current, updated))
    }

    /// Delete a budget owned by `owner`, returning the removed record
    pub fn delete(&self, owner: &OwnerId, id: BudgetId) -> Result<Option<Budget>, FinanceError> {
        let mut table = self.write()?;

        let key = match table.owned(owner, id) {
            Some(budget) => budget.key(),
            None => return Ok(None),
        };

        table.by_key.remove(&key);
        Ok(table.records.remove(&id))
    }

    /// Put a record back exactly as given, replacing any record with its ID
    ///
    /// Fails with `Conflict` when another budget holds its
    /// `(owner, month, category)` by now.
    pub fn restore(&self, budget: Budget) -> Result<(), FinanceError> {
        let mut table = self.write()?;

        let key = budget.key();
        if let Some(&holder) = table.by_key.get(&key) {
            if holder != budget.id {
                return Err(FinanceError::budget_conflict(key.to_string()));
            }
        }

        if let Some(current) = table.records.remove(&budget.id) {
            table.by_key.remove(&current.key());
        }
        table.by_key.insert(key, budget.id);
        table.records.insert(budget.id, budget);
        Ok(())
    }

    /// Count all stored budgets
    pub fn count(&self) -> Result<usize, FinanceError> {
        Ok(self.read()?.records.len())
    }
}
