//! Period sequencing service
//!
//! Works out "this month" and contiguous runs of months ending at it. The
//! reference date is captured at construction so reports built from one
//! service agree on what "now" is.

use chrono::{Local, NaiveDate};

use crate::error::{FinanceError, FinanceResult};
use crate::models::{Period, TxDate};

/// Service for calendar-month periods relative to a fixed "today"
#[derive(Debug, Clone, Copy)]
pub struct PeriodService {
    today: NaiveDate,
}

impl PeriodService {
    /// Create a period service anchored at the local date
    pub fn new() -> Self {
        Self::at(Local::now().date_naive())
    }

    /// Create a period service anchored at a given date
    pub fn at(today: NaiveDate) -> Self {
        Self { today }
    }

    /// The anchor date in canonical ledger form
    pub fn today_date(&self) -> FinanceResult<TxDate> {
        TxDate::from_naive(self.today).ok_or_else(|| {
            FinanceError::Validation(format!("Date out of range: {}", self.today))
        })
    }

    /// The month containing the anchor date
    pub fn current_period(&self) -> Period {
        Period::containing(self.today)
    }

    /// The last `count` months, oldest first, ending at the current month
    ///
    /// The run never reaches back past `0000-01`, so fewer than `count`
    /// periods come back when the anchor is that early.
    pub fn last_n_months(&self, count: usize) -> Vec<Period> {
        let mut periods: Vec<Period> =
            std::iter::successors(Some(self.current_period()), Period::prev)
                .take(count)
                .collect();
        periods.reverse();
        periods
    }

    /// Parse a `YYYY-MM` label, or use the current month when absent
    pub fn parse_or_current(&self, label: Option<&str>) -> FinanceResult<Period> {
        match label {
            Some(s) => Period::parse(s).map_err(|e| FinanceError::Validation(e.to_string())),
            None => Ok(self.current_period()),
        }
    }
}

impl Default for PeriodService {
    fn default() -> Self {
        Self::new()
    }
}
