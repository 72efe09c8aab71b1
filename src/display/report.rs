//! Report formatting utilities for terminal output
//!
//! Provides formatting helpers shared by the dashboard and trend reports.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::models::Money;

/// Format a money amount with color hints for terminal display
pub fn format_money_colored(amount: Money, symbol: &str) -> String {
    let text = amount.format_with_symbol(symbol);
    if amount.is_negative() {
        format!("\x1b[31m{}\x1b[0m", text) // Red for negative
    } else if amount.is_positive() {
        format!("\x1b[32m{}\x1b[0m", text) // Green for positive
    } else {
        text
    }
}

/// Create a simple bar chart representation
pub fn format_bar(value: Decimal, max_value: Decimal, width: usize) -> String {
    if max_value <= Decimal::ZERO || value <= Decimal::ZERO {
        return " ".repeat(width);
    }

    let filled = (value / max_value * Decimal::from(width))
        .round()
        .to_usize()
        .unwrap_or(width)
        .min(width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Format a header line with padding
pub fn format_header(title: &str, width: usize) -> String {
    let len = title.chars().count();
    let padding = if len >= width { 0 } else { (width - len) / 2 };
    format!("{}{}", " ".repeat(padding), title)
}

/// Format a separator line
pub fn separator(width: usize) -> String {
    "─".repeat(width)
}

/// Truncate a string to a maximum number of characters with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        "...".chars().take(max_len).collect()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_bar() {
        let bar = format_bar(dec!(50), dec!(100), 10);
        assert_eq!(bar.chars().filter(|c| *c == '█').count(), 5);
        assert_eq!(bar.chars().count(), 10);
    }

    #[test]
    fn test_format_bar_empty_max() {
        assert_eq!(format_bar(dec!(5), Decimal::ZERO, 4), "    ");
    }

    #[test]
    fn test_money_colors() {
        assert!(format_money_colored(Money::new(dec!(-1)), "$").starts_with("\x1b[31m"));
        assert!(format_money_colored(Money::new(dec!(1)), "$").starts_with("\x1b[32m"));
        assert_eq!(format_money_colored(Money::zero(), "€"), "€0.00");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Hello World", 5), "He...");
        assert_eq!(truncate("Hi", 5), "Hi");
        assert_eq!(truncate("Test", 4), "Test");
        assert_eq!(truncate("café au lait", 6), "caf...");
    }
}
