//! Budget service
//!
//! Provides the budget registry: monthly limits per owner, either for one
//! category or for everything without a budget of its own. At most one
//! budget may exist per owner, month and category.

use crate::error::{FinanceError, FinanceResult};
use crate::models::{
    normalize_budget_category, Budget, BudgetId, BudgetLine, Money, OwnerId, Period,
};
use crate::storage::{BudgetRepository, Storage};

/// Service for budget management
pub struct BudgetService<'a> {
    storage: &'a Storage,
}

fn parse_month(month: &str) -> FinanceResult<Period> {
    Period::parse(month).map_err(|e| FinanceError::Validation(e.to_string()))
}

fn check_amount(amount: Money) -> FinanceResult<()> {
    if amount.is_negative() {
        return Err(FinanceError::Validation(format!(
            "Budget amount must not be negative (got {})",
            amount
        )));
    }
    Ok(())
}

impl<'a> BudgetService<'a> {
    /// Create a new budget service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Save the registry, undoing the in-memory change when the write fails
    fn save_or_undo<F>(&self, undo: F) -> FinanceResult<()>
    where
        F: FnOnce(&BudgetRepository) -> FinanceResult<()>,
    {
        let repo = &self.storage.budgets;
        if let Err(e) = repo.save() {
            if let Err(undo_err) = undo(repo) {
                tracing::error!(error = %undo_err, "failed to undo unsaved budget change");
            }
            return Err(e);
        }
        Ok(())
    }

    /// All of an owner's budgets, newest month first, general budget first within a month
    pub fn list(&self, owner: &OwnerId) -> FinanceResult<Vec<Budget>> {
        self.storage.budgets.list_for_owner(owner)
    }

    /// Create a budget
    ///
    /// A blank category creates the general budget. Returns a `Conflict`
    /// error when the owner already has a budget for that month and category.
    pub fn add(
        &self,
        owner: &OwnerId,
        month: &str,
        amount: Money,
        category: Option<&str>,
    ) -> FinanceResult<Budget> {
        let month = parse_month(month)?;
        let category = normalize_budget_category(category);

        let budget = Budget::new(owner.clone(), month, category, amount);
        budget
            .validate()
            .map_err(|e| FinanceError::Validation(e.to_string()))?;

        let budget = match self.storage.budgets.insert_unique(budget) {
            Ok(budget) => budget,
            Err(e) => {
                if e.is_conflict() {
                    tracing::warn!(owner = %owner, month = %month, "budget already exists");
                }
                return Err(e);
            }
        };
        let id = budget.id;
        self.save_or_undo(|repo| repo.delete(owner, id).map(|_| ()))?;

        tracing::info!(owner = %owner, id = %budget.id, month = %budget.month, "budget created");
        Ok(budget)
    }

    /// Get a budget by ID
    pub fn get(&self, owner: &OwnerId, id: BudgetId) -> FinanceResult<Option<Budget>> {
        self.storage.budgets.get(owner, id)
    }

    /// Get a budget by ID, failing with `NotFound`
    pub fn find(&self, owner: &OwnerId, id: BudgetId) -> FinanceResult<Budget> {
        self.get(owner, id)?
            .ok_or_else(|| FinanceError::budget_not_found(id.to_string()))
    }

    /// Replace a budget's month, amount and category
    pub fn update(
        &self,
        owner: &OwnerId,
        id: BudgetId,
        month: &str,
        amount: Money,
        category: Option<&str>,
    ) -> FinanceResult<Budget> {
        let month = parse_month(month)?;
        check_amount(amount)?;
        let category = normalize_budget_category(category);

        let (previous, budget) = match self
            .storage
            .budgets
            .update_unique(owner, id, month, category, amount)
        {
            Ok(change) => change,
            Err(e) => {
                if e.is_conflict() {
                    tracing::warn!(owner = %owner, id = %id, month = %month, "budget update collides");
                }
                return Err(e);
            }
        };
        self.save_or_undo(|repo| repo.restore(previous))?;

        tracing::info!(owner = %owner, id = %id, month = %budget.month, "budget updated");
        Ok(budget)
    }

    /// Delete a budget
    pub fn delete(&self, owner: &OwnerId, id: BudgetId) -> FinanceResult<()> {
        let removed = self
            .storage
            .budgets
            .delete(owner, id)?
            .ok_or_else(|| FinanceError::budget_not_found(id.to_string()))?;
        self.save_or_undo(|repo| repo.restore(removed))?;

        tracing::info!(owner = %owner, id = %id, "budget deleted");
        Ok(())
    }

    /// Budget lines of one month, general budget first then by category
    pub fn for_period(&self, owner: &OwnerId, month: Period) -> FinanceResult<Vec<BudgetLine>> {
        Ok(self
            .storage
            .budgets
            .for_period(owner, month)?
            .iter()
            .map(BudgetLine::from)
            .collect())
    }
}
