//! Dashboard snapshot
//!
//! Everything the dashboard shows for one owner: lifetime totals, the most
//! recent transactions and this month's budgets next to this month's
//! spending.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::display::report::{format_header, format_money_colored, separator};
use crate::display::transaction::format_transaction_register;
use crate::error::FinanceResult;
use crate::models::{Budget, BudgetLine, Money, OwnerId, Period, Transaction, GENERAL_BUDGET_LABEL};
use crate::services::{aggregation, PeriodService};
use crate::storage::Storage;

/// How much of one budget has been spent this month
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetUsage {
    /// `None` for the general budget
    pub category: Option<String>,
    pub amount: Money,
    pub spent: Money,
}

impl BudgetUsage {
    /// Budget amount minus spending; negative when over budget
    pub fn remaining(&self) -> Money {
        self.amount - self.spent
    }

    pub fn is_over(&self) -> bool {
        self.spent > self.amount
    }

    pub fn category_label(&self) -> &str {
        self.category.as_deref().unwrap_or(GENERAL_BUDGET_LABEL)
    }
}

/// Match this month's budgets against this month's spending
///
/// A category budget is charged with its own category's expenses. The
/// general budget is charged with every category that has no budget of its
/// own in the month.
pub fn budget_usage(budgets: &[Budget], spend: &BTreeMap<String, Money>) -> Vec<BudgetUsage> {
    let budgeted: BTreeSet<&str> = budgets
        .iter()
        .filter_map(|b| b.category.as_deref())
        .collect();

    let unbudgeted_spend: Money = spend
        .iter()
        .filter(|(category, _)| !budgeted.contains(category.as_str()))
        .map(|(_, amount)| *amount)
        .sum();

    budgets
        .iter()
        .map(|budget| {
            let spent = match &budget.category {
                Some(category) => spend.get(category).copied().unwrap_or_default(),
                None => unbudgeted_spend,
            };
            BudgetUsage {
                category: budget.category.clone(),
                amount: budget.amount,
                spent,
            }
        })
        .collect()
}

/// Snapshot view of one owner's finances
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    /// The month treated as "this month"
    pub month: Period,
    pub balance: Money,
    pub income_total: Money,
    pub expense_total: Money,
    /// Newest first
    pub recent: Vec<Transaction>,
    /// This month's budgets, general budget first then by category
    pub budgets: Vec<BudgetLine>,
    /// This month's expense per category
    pub spend_by_category: BTreeMap<String, Money>,
    pub budget_usage: Vec<BudgetUsage>,
}

impl DashboardSnapshot {
    /// Build the snapshot for `owner`
    pub fn generate(
        storage: &Storage,
        owner: &OwnerId,
        periods: &PeriodService,
        recent_limit: usize,
    ) -> FinanceResult<Self> {
        let month = periods.current_period();

        let ledger = storage.transactions.list_for_owner(owner)?;
        let totals = aggregation::totals(&ledger);
        let spend = aggregation::spend_by_category(&ledger, month);

        let month_budgets = storage.budgets.for_period(owner, month)?;
        let usage = budget_usage(&month_budgets, &spend);

        let mut recent = ledger;
        recent.truncate(recent_limit);

        tracing::debug!(owner = %owner, month = %month, "dashboard generated");

        Ok(Self {
            month,
            balance: totals.balance(),
            income_total: totals.income,
            expense_total: totals.expense,
            recent,
            budgets: month_budgets.iter().map(BudgetLine::from).collect(),
            spend_by_category: spend,
            budget_usage: usage,
        })
    }

    /// Format the snapshot for terminal display
    pub fn format_terminal(&self, symbol: &str) -> String {
        let mut output = String::new();

        output.push_str(&format_header(&format!("Dashboard: {}", self.month), 60));
        output.push('\n');
        output.push_str(&separator(60));
        output.push('\n');
        output.push_str(&format!(
            "Balance:  {}\n",
            format_money_colored(self.balance, symbol)
        ));
        output.push_str(&format!(
            "Income:   {}\n",
            self.income_total.format_with_symbol(symbol)
        ));
        output.push_str(&format!(
            "Expenses: {}\n\n",
            self.expense_total.format_with_symbol(symbol)
        ));

        output.push_str(&format!("Budgets for {}\n", self.month));
        if self.budget_usage.is_empty() {
            output.push_str("  No budgets set for this month.\n");
        } else {
            output.push_str(&format!(
                "  {:<20} {:>12} {:>12} {:>12}\n",
                "Category", "Budget", "Spent", "Remaining"
            ));
            for usage in &self.budget_usage {
                let marker = if usage.is_over() { " OVER" } else { "" };
                output.push_str(&format!(
                    "  {:<20} {:>12} {:>12} {:>12}{}\n",
                    usage.category_label(),
                    usage.amount.format_with_symbol(symbol),
                    usage.spent.format_with_symbol(symbol),
                    usage.remaining().format_with_symbol(symbol),
                    marker
                ));
            }
        }
        output.push('\n');

        output.push_str(&format!("Spending in {}\n", self.month));
        if self.spend_by_category.is_empty() {
            output.push_str("  No expenses this month.\n");
        } else {
            for (category, amount) in &self.spend_by_category {
                output.push_str(&format!(
                    "  {:<20} {:>12}\n",
                    category,
                    amount.format_with_symbol(symbol)
                ));
            }
        }
        output.push('\n');

        output.push_str("Recent transactions\n");
        output.push_str(&format_transaction_register(&self.recent, symbol));

        output
    }
}
