//! Trend report
//!
//! Income and expense for the last N months, plus the current month's
//! expense broken down by category. The series are positional: index `i`
//! of `month_income` and `month_expense` belongs to `months[i]`.

use serde::Serialize;

use crate::display::report::{format_bar, format_header, separator};
use crate::error::{FinanceError, FinanceResult};
use crate::models::{Money, OwnerId, Period};
use crate::services::{aggregation, PeriodService};
use crate::storage::Storage;

const BAR_WIDTH: usize = 20;

/// Longest trend a report will cover (one hundred years)
pub const MAX_TREND_MONTHS: usize = 1200;

/// Multi-month income/expense trend for one owner
#[derive(Debug, Clone, Serialize)]
pub struct TrendReport {
    /// Oldest first, ending at the current month
    pub months: Vec<Period>,
    pub month_income: Vec<Money>,
    pub month_expense: Vec<Money>,
    /// Current month's expense categories, largest total first
    pub categories: Vec<String>,
    pub category_totals: Vec<Money>,
    pub current_month: Period,
}

impl TrendReport {
    /// Build the trend over the last `months` months
    pub fn generate(
        storage: &Storage,
        owner: &OwnerId,
        periods: &PeriodService,
        months: usize,
    ) -> FinanceResult<Self> {
        if months == 0 {
            return Err(FinanceError::Validation(
                "Trend needs at least one month".into(),
            ));
        }
        if months > MAX_TREND_MONTHS {
            return Err(FinanceError::Validation(format!(
                "Trend covers at most {} months (got {})",
                MAX_TREND_MONTHS, months
            )));
        }

        let sequence = periods.last_n_months(months);
        let current_month = periods.current_period();

        let ledger = storage.transactions.list_for_owner(owner)?;
        let flows = aggregation::income_expense_by_month(&ledger, &sequence);

        let (month_income, month_expense): (Vec<Money>, Vec<Money>) = sequence
            .iter()
            .map(|m| {
                let flow = flows.get(m).copied().unwrap_or_default();
                (flow.income, flow.expense)
            })
            .unzip();

        let mut breakdown: Vec<(String, Money)> =
            aggregation::spend_by_category(&ledger, current_month)
                .into_iter()
                .collect();
        breakdown.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        let (categories, category_totals): (Vec<String>, Vec<Money>) = breakdown.into_iter().unzip();

        tracing::debug!(owner = %owner, months, "trend generated");

        Ok(Self {
            months: sequence,
            month_income,
            month_expense,
            categories,
            category_totals,
            current_month,
        })
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, symbol: &str) -> String {
        let mut output = String::new();

        let first = self.months.first().copied().unwrap_or(self.current_month);
        output.push_str(&format_header(
            &format!("Trend: {} to {}", first, self.current_month),
            60,
        ));
        output.push('\n');
        output.push_str(&separator(60));
        output.push('\n');

        output.push_str(&format!(
            "{:<8} {:>12} {:>12}\n",
            "Month", "Income", "Expense"
        ));
        for ((month, income), expense) in self
            .months
            .iter()
            .zip(&self.month_income)
            .zip(&self.month_expense)
        {
            output.push_str(&format!(
                "{:<8} {:>12} {:>12}\n",
                month.to_string(),
                income.format_with_symbol(symbol),
                expense.format_with_symbol(symbol)
            ));
        }
        output.push('\n');

        output.push_str(&format!("Spending by category in {}\n", self.current_month));
        if self.categories.is_empty() {
            output.push_str("  No expenses this month.\n");
            return output;
        }

        let max = self
            .category_totals
            .first()
            .map(|m| m.amount())
            .unwrap_or_default();
        for (category, total) in self.categories.iter().zip(&self.category_totals) {
            output.push_str(&format!(
                "  {:<20} {:>12} {}\n",
                category,
                total.format_with_symbol(symbol),
                format_bar(total.amount(), max, BAR_WIDTH)
            ));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::FinancePaths;
    use crate::models::{Transaction, TransactionKind, TxDate};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = FinancePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).unwrap();
        (temp_dir, storage)
    }

    fn insert(
        storage: &Storage,
        owner: &OwnerId,
        date: &str,
        kind: TransactionKind,
        amount: Decimal,
        category: &str,
    ) {
        storage
            .transactions
            .insert(Transaction::new(
                owner.clone(),
                TxDate::parse(date).unwrap(),
                kind,
                Money::new(amount),
                category,
            ))
            .unwrap();
    }

    fn at(y: i32, m: u32, d: u32) -> PeriodService {
        PeriodService::at(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn test_series_are_aligned_and_zero_filled() {
        let (_temp_dir, storage) = create_test_storage();
        let u1 = OwnerId::new("u1").unwrap();

        insert(&storage, &u1, "2023-12-24", TransactionKind::Expense, dec!(40), "gifts");
        insert(&storage, &u1, "2024-01-05", TransactionKind::Income, dec!(900), "salary");

        let report = TrendReport::generate(&storage, &u1, &at(2024, 1, 20), 3).unwrap();

        let labels: Vec<_> = report.months.iter().map(|m| m.to_string()).collect();
        assert_eq!(labels, vec!["2023-11", "2023-12", "2024-01"]);
        assert_eq!(
            report.month_income,
            vec![Money::zero(), Money::zero(), Money::new(dec!(900))]
        );
        assert_eq!(
            report.month_expense,
            vec![Money::zero(), Money::new(dec!(40)), Money::zero()]
        );
        assert_eq!(report.current_month.to_string(), "2024-01");
        assert!(report.categories.is_empty());
    }

    #[test]
    fn test_category_breakdown_sorted_by_total_then_name() {
        let (_temp_dir, storage) = create_test_storage();
        let u1 = OwnerId::new("u1").unwrap();

        insert(&storage, &u1, "2024-05-01", TransactionKind::Expense, dec!(20), "taxi");
        insert(&storage, &u1, "2024-05-02", TransactionKind::Expense, dec!(50), "rent");
        insert(&storage, &u1, "2024-05-03", TransactionKind::Expense, dec!(20), "books");
        insert(&storage, &u1, "2024-05-04", TransactionKind::Income, dec!(500), "salary");
        insert(&storage, &u1, "2024-04-04", TransactionKind::Expense, dec!(999), "old");

        let report = TrendReport::generate(&storage, &u1, &at(2024, 5, 31), 6).unwrap();
        assert_eq!(report.months.len(), 6);
        assert_eq!(report.categories, vec!["rent", "books", "taxi"]);
        assert_eq!(
            report.category_totals,
            vec![
                Money::new(dec!(50)),
                Money::new(dec!(20)),
                Money::new(dec!(20))
            ]
        );
    }

    #[test]
    fn test_owner_without_transactions() {
        let (_temp_dir, storage) = create_test_storage();
        let u1 = OwnerId::new("u1").unwrap();

        let report = TrendReport::generate(&storage, &u1, &at(2024, 5, 1), 6).unwrap();
        assert_eq!(report.months.len(), 6);
        assert!(report.month_income.iter().all(Money::is_zero));
        assert!(report.month_expense.iter().all(Money::is_zero));

        let text = report.format_terminal("$");
        assert!(text.contains("No expenses this month."));
    }

    #[test]
    fn test_zero_months_is_validation_error() {
        let (_temp_dir, storage) = create_test_storage();
        let u1 = OwnerId::new("u1").unwrap();

        let err = TrendReport::generate(&storage, &u1, &at(2024, 5, 1), 0).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_month_count_above_limit_is_validation_error() {
        let (_temp_dir, storage) = create_test_storage();
        let u1 = OwnerId::new("u1").unwrap();
        let periods = at(2024, 5, 1);

        let report = TrendReport::generate(&storage, &u1, &periods, MAX_TREND_MONTHS).unwrap();
        assert_eq!(report.months.len(), MAX_TREND_MONTHS);

        for months in [MAX_TREND_MONTHS + 1, usize::MAX] {
            let err = TrendReport::generate(&storage, &u1, &periods, months).unwrap_err();
            assert!(err.is_validation());
        }
    }

    #[test]
    fn test_early_anchor_yields_only_valid_months() {
        let (_temp_dir, storage) = create_test_storage();
        let u1 = OwnerId::new("u1").unwrap();

        let report = TrendReport::generate(&storage, &u1, &at(0, 2, 1), 6).unwrap();
        let labels: Vec<_> = report.months.iter().map(|m| m.to_string()).collect();
        assert_eq!(labels, vec!["0000-01", "0000-02"]);
        assert_eq!(report.month_income.len(), 2);
        assert_eq!(report.month_expense.len(), 2);
    }
}
