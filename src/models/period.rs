//! Calendar-month periods and canonical transaction dates
//!
//! A `Period` is one calendar month, written as a `YYYY-MM` label. A
//! `TxDate` is a calendar date kept in canonical `YYYY-MM-DD` text form;
//! month membership is decided by comparing the first seven characters of
//! the date with the period label, which is sound only because every
//! `TxDate` is validated and normalized on construction.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// One calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    /// Create a period, validating the month and the four-digit year range
    pub fn new(year: i32, month: u32) -> Result<Self, PeriodParseError> {
        if !(1..=12).contains(&month) {
            return Err(PeriodParseError::InvalidMonth(month));
        }
        if !(0..=9999).contains(&year) {
            return Err(PeriodParseError::InvalidYear(year));
        }
        Ok(Self { year, month })
    }

    /// The period containing the given date
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Get the previous period, or `None` before `0000-01`
    pub fn prev(&self) -> Option<Self> {
        if self.month == 1 {
            if self.year <= 0 {
                return None;
            }
            Some(Self {
                year: self.year - 1,
                month: 12,
            })
        } else {
            Some(Self {
                year: self.year,
                month: self.month - 1,
            })
        }
    }

    /// The `YYYY-MM` label
    pub fn label(&self) -> String {
        self.to_string()
    }

    /// Check whether a canonical date falls in this period
    pub fn contains(&self, date: &TxDate) -> bool {
        date.month_label() == self.label()
    }

    /// Parse a `YYYY-MM` label
    pub fn parse(s: &str) -> Result<Self, PeriodParseError> {
        let s = s.trim();
        let bytes = s.as_bytes();
        if bytes.len() != 7 || bytes[4] != b'-' {
            return Err(PeriodParseError::InvalidFormat(s.to_string()));
        }
        if !s[..4].bytes().all(|b| b.is_ascii_digit()) || !s[5..].bytes().all(|b| b.is_ascii_digit())
        {
            return Err(PeriodParseError::InvalidFormat(s.to_string()));
        }

        let year: i32 = s[..4]
            .parse()
            .map_err(|_| PeriodParseError::InvalidFormat(s.to_string()))?;
        let month: u32 = s[5..]
            .parse()
            .map_err(|_| PeriodParseError::InvalidFormat(s.to_string()))?;

        Self::new(year, month)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Period {
    type Err = PeriodParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Period {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Period {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Error type for period parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodParseError {
    InvalidFormat(String),
    InvalidMonth(u32),
    InvalidYear(i32),
}

impl fmt::Display for PeriodParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFormat(s) => write!(f, "Invalid month '{}', expected YYYY-MM", s),
            Self::InvalidMonth(m) => write!(f, "Invalid month number: {}", m),
            Self::InvalidYear(y) => write!(f, "Year out of range: {}", y),
        }
    }
}

impl std::error::Error for PeriodParseError {}

/// A calendar date stored in canonical `YYYY-MM-DD` form
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct TxDate(String);

impl TxDate {
    /// Validate and normalize a date string
    ///
    /// Accepts `YYYY-MM-DD` (single-digit month/day are padded) and rejects
    /// impossible dates such as `2024-02-30`.
    pub fn parse(s: &str) -> Result<Self, DateParseError> {
        let trimmed = s.trim();
        let date = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .map_err(|_| DateParseError::InvalidFormat(s.to_string()))?;
        Self::from_naive(date).ok_or_else(|| DateParseError::OutOfRange(s.to_string()))
    }

    /// Build from a calendar date; `None` outside years 0000..=9999
    pub fn from_naive(date: NaiveDate) -> Option<Self> {
        if !(0..=9999).contains(&date.year()) {
            return None;
        }
        Some(Self(date.format("%Y-%m-%d").to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The `YYYY-MM` prefix
    pub fn month_label(&self) -> &str {
        &self.0[..7]
    }

    /// The period this date belongs to
    pub fn period(&self) -> Period {
        // Canonical form guarantees the prefix parses
        Period::parse(self.month_label()).unwrap_or(Period { year: 0, month: 1 })
    }
}

impl fmt::Display for TxDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TxDate {
    type Err = DateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<'de> Deserialize<'de> for TxDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Error type for date parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateParseError {
    InvalidFormat(String),
    OutOfRange(String),
}

impl fmt::Display for DateParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFormat(s) => write!(f, "Invalid date '{}', expected YYYY-MM-DD", s),
            Self::OutOfRange(s) => write!(f, "Date out of range: '{}'", s),
        }
    }
}

impl std::error::Error for DateParseError {}
