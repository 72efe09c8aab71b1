//! Budget model
//!
//! A spending limit for one owner, one month and either one category or,
//! when `category` is `None`, every category without a budget of its own.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{BudgetId, OwnerId};
use super::money::Money;
use super::period::Period;

/// Label used when printing the general (category-less) budget
pub const GENERAL_BUDGET_LABEL: &str = "(general)";

/// A monthly spending budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    /// Unique identifier
    pub id: BudgetId,

    pub owner: OwnerId,

    pub month: Period,

    /// `None` is the general budget
    pub category: Option<String>,

    pub amount: Money,

    /// When this budget was created
    pub created_at: DateTime<Utc>,

    /// When this budget was last modified
    pub updated_at: DateTime<Utc>,
}

impl Budget {
    /// Create a new budget
    pub fn new(owner: OwnerId, month: Period, category: Option<String>, amount: Money) -> Self {
        let now = Utc::now();
        Self {
            id: BudgetId::new(),
            owner,
            month,
            category,
            amount,
            created_at: now,
            updated_at: now,
        }
    }

    /// The uniqueness key of this budget
    pub fn key(&self) -> BudgetKey {
        BudgetKey::new(self.owner.clone(), self.month, self.category.clone())
    }

    pub fn is_general(&self) -> bool {
        self.category.is_none()
    }

    /// Category for display, with the general budget labelled
    pub fn category_label(&self) -> &str {
        self.category.as_deref().unwrap_or(GENERAL_BUDGET_LABEL)
    }

    /// Validate the budget
    pub fn validate(&self) -> Result<(), BudgetValidationError> {
        if self.amount.is_negative() {
            return Err(BudgetValidationError::NegativeAmount(self.amount));
        }

        Ok(())
    }

    /// Registry ordering: newest month first, then category with the general budget first
    pub fn registry_order(a: &Self, b: &Self) -> std::cmp::Ordering {
        b.month.cmp(&a.month).then_with(|| a.category.cmp(&b.category))
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.month, self.category_label(), self.amount)
    }
}

/// Trim a category; blank input means the general budget
pub fn normalize_budget_category(category: Option<&str>) -> Option<String> {
    category
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
}

/// The `(owner, month, category)` triple that may appear at most once
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BudgetKey {
    pub owner: OwnerId,
    pub month: Period,
    pub category: Option<String>,
}

impl BudgetKey {
    pub fn new(owner: OwnerId, month: Period, category: Option<String>) -> Self {
        Self {
            owner,
            month,
            category,
        }
    }
}

impl fmt::Display for BudgetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}",
            self.month,
            self.category.as_deref().unwrap_or(GENERAL_BUDGET_LABEL)
        )
    }
}

/// One budget line for a month, as shown on the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetLine {
    pub category: Option<String>,
    pub amount: Money,
}

impl From<&Budget> for BudgetLine {
    fn from(budget: &Budget) -> Self {
        Self {
            category: budget.category.clone(),
            amount: budget.amount,
        }
    }
}

/// Validation errors for budgets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BudgetValidationError {
    NegativeAmount(Money),
}

impl fmt::Display for BudgetValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeAmount(amount) => {
                write!(f, "Budget amount must not be negative (got {})", amount)
            }
        }
    }
}

impl std::error::Error for BudgetValidationError {}
