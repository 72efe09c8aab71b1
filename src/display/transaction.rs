//! Transaction display formatting
//!
//! Provides utilities for formatting ledger entries for terminal display.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::report::truncate;
use crate::models::Transaction;

#[derive(Tabled)]
struct RegisterRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl RegisterRow {
    fn new(txn: &Transaction, symbol: &str) -> Self {
        Self {
            id: txn.id.to_string(),
            date: txn.date.to_string(),
            kind: txn.kind.to_string(),
            category: truncate(&txn.category, 20),
            amount: txn.amount.format_with_symbol(symbol),
            description: truncate(&txn.description, 30),
        }
    }
}

/// Format a list of transactions as a register table
pub fn format_transaction_register(transactions: &[Transaction], symbol: &str) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let rows: Vec<_> = transactions
        .iter()
        .map(|t| RegisterRow::new(t, symbol))
        .collect();

    let mut output = Table::new(rows).with(Style::rounded()).to_string();
    output.push('\n');
    output
}

/// Format transaction details for display
pub fn format_transaction_details(txn: &Transaction, symbol: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.id));
    output.push_str(&format!("Date:        {}\n", txn.date));
    output.push_str(&format!("Kind:        {}\n", txn.kind));
    output.push_str(&format!(
        "Amount:      {}\n",
        txn.amount.format_with_symbol(symbol)
    ));
    output.push_str(&format!("Category:    {}\n", txn.category));

    if !txn.description.is_empty() {
        output.push_str(&format!("Description: {}\n", txn.description));
    }

    output.push_str(&format!(
        "Created:     {}\n",
        txn.created_at.format("%Y-%m-%d %H:%M")
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, OwnerId, TransactionKind, TxDate};
    use rust_decimal_macros::dec;

    fn sample() -> Transaction {
        let mut txn = Transaction::new(
            OwnerId::new("u1").unwrap(),
            TxDate::parse("2024-05-02").unwrap(),
            TransactionKind::Expense,
            Money::new(dec!(42.5)),
            "food",
        );
        txn.description = "groceries".into();
        txn
    }

    #[test]
    fn test_empty_register() {
        assert_eq!(format_transaction_register(&[], "$"), "No transactions found.\n");
    }

    #[test]
    fn test_register_contains_rows() {
        let txn = sample();
        let output = format_transaction_register(std::slice::from_ref(&txn), "$");

        assert!(output.contains("Date"));
        assert!(output.contains("2024-05-02"));
        assert!(output.contains("$42.50"));
        assert!(output.contains(&txn.id.to_string()));
    }

    #[test]
    fn test_details() {
        let output = format_transaction_details(&sample(), "€");
        assert!(output.contains("Kind:        expense"));
        assert!(output.contains("Amount:      €42.50"));
        assert!(output.contains("Description: groceries"));
    }
}
