//! Transaction model
//!
//! Represents a single income or expense entry in an owner's ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::{OwnerId, TransactionId};
use super::money::Money;
use super::period::TxDate;
use crate::error::FinanceError;

/// Whether money came in or went out
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = FinanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(FinanceError::Validation(format!(
                "Invalid transaction kind '{}', expected income or expense",
                other
            ))),
        }
    }
}

/// A ledger entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,

    /// The user this entry belongs to
    pub owner: OwnerId,

    /// Canonical `YYYY-MM-DD` date
    pub date: TxDate,

    pub kind: TransactionKind,

    /// Never negative; direction comes from `kind`
    pub amount: Money,

    pub category: String,

    #[serde(default)]
    pub description: String,

    /// Insertion order assigned by the store
    #[serde(default)]
    pub seq: u64,

    /// When the transaction was created
    pub created_at: DateTime<Utc>,

    /// When the transaction was last modified
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a new transaction
    pub fn new(
        owner: OwnerId,
        date: TxDate,
        kind: TransactionKind,
        amount: Money,
        category: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: TransactionId::new(),
            owner,
            date,
            kind,
            amount,
            category: category.into(),
            description: String::new(),
            seq: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    /// Validate the transaction
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if self.amount.is_negative() {
            return Err(TransactionValidationError::NegativeAmount(self.amount));
        }

        if self.category.trim().is_empty() {
            return Err(TransactionValidationError::EmptyCategory);
        }

        Ok(())
    }

    /// Ledger ordering: newest date first, then most recently inserted first
    pub fn ledger_order(a: &Self, b: &Self) -> std::cmp::Ordering {
        b.date.cmp(&a.date).then(b.seq.cmp(&a.seq))
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.date, self.kind, self.category, self.amount
        )
    }
}

/// A partial update; `None` fields are left untouched
#[derive(Debug, Clone, Default)]
pub struct TransactionPatch {
    pub date: Option<String>,
    pub kind: Option<TransactionKind>,
    pub amount: Option<Money>,
    pub category: Option<String>,
    pub description: Option<String>,
}

impl TransactionPatch {
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.kind.is_none()
            && self.amount.is_none()
            && self.category.is_none()
            && self.description.is_none()
    }
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    NegativeAmount(Money),
    EmptyCategory,
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeAmount(amount) => {
                write!(f, "Amount must not be negative (got {})", amount)
            }
            Self::EmptyCategory => write!(f, "Category must not be empty"),
        }
    }
}

impl std::error::Error for TransactionValidationError {}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn owner() -> OwnerId {
        OwnerId::new("u1").unwrap()
    }

    fn date(s: &str) -> TxDate {
        TxDate::parse(s).unwrap()
    }

    #[test]
    fn test_new_transaction() {
        let txn = Transaction::new(
            owner(),
            date("2024-05-01"),
            TransactionKind::Expense,
            Money::new(dec!(50)),
            "food",
        );

        assert_eq!(txn.owner, owner());
        assert_eq!(txn.category, "food");
        assert!(txn.description.is_empty());
        assert!(txn.is_expense());
        assert!(txn.validate().is_ok());
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("income".parse::<TransactionKind>().unwrap(), TransactionKind::Income);
        assert_eq!(" Expense ".parse::<TransactionKind>().unwrap(), TransactionKind::Expense);
        assert!("transfer".parse::<TransactionKind>().unwrap_err().is_validation());
    }

    #[test]
    fn test_validation_rejects_negative_amount() {
        let txn = Transaction::new(
            owner(),
            date("2024-05-01"),
            TransactionKind::Income,
            Money::new(dec!(-1)),
            "salary",
        );
        assert!(matches!(
            txn.validate(),
            Err(TransactionValidationError::NegativeAmount(_))
        ));
    }

    #[test]
    fn test_validation_rejects_blank_category() {
        let txn = Transaction::new(
            owner(),
            date("2024-05-01"),
            TransactionKind::Income,
            Money::zero(),
            "  ",
        );
        assert_eq!(txn.validate(), Err(TransactionValidationError::EmptyCategory));
    }

    #[test]
    fn test_ledger_order() {
        let mut older = Transaction::new(
            owner(),
            date("2024-05-01"),
            TransactionKind::Expense,
            Money::zero(),
            "a",
        );
        older.seq = 5;
        let mut same_day_later = older.clone();
        same_day_later.seq = 6;
        let mut newer_date = older.clone();
        newer_date.date = date("2024-05-02");
        newer_date.seq = 1;

        let mut rows = vec![older.clone(), newer_date.clone(), same_day_later.clone()];
        rows.sort_by(Transaction::ledger_order);

        let seqs: Vec<_> = rows.iter().map(|t| t.seq).collect();
        assert_eq!(seqs, vec![1, 6, 5]);
    }

    #[test]
    fn test_serialization() {
        let mut txn = Transaction::new(
            owner(),
            date("2024-05-15"),
            TransactionKind::Income,
            Money::new(dec!(1000)),
            "salary",
        );
        txn.description = "May pay".into();

        let json = serde_json::to_string(&txn).unwrap();
        assert!(json.contains("\"kind\":\"income\""));
        let deserialized: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(txn, deserialized);
    }

    #[test]
    fn test_patch_is_empty() {
        assert!(TransactionPatch::default().is_empty());
        let patch = TransactionPatch {
            description: Some(String::new()),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }
}
