//! Budget display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{Budget, BudgetLine, Period, GENERAL_BUDGET_LABEL};

#[derive(Tabled)]
struct BudgetRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Month")]
    month: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

/// Format an owner's budgets as a table
pub fn format_budget_list(budgets: &[Budget], symbol: &str) -> String {
    if budgets.is_empty() {
        return "No budgets found.\n".to_string();
    }

    let rows: Vec<_> = budgets
        .iter()
        .map(|b| BudgetRow {
            id: b.id.to_string(),
            month: b.month.to_string(),
            category: b.category_label().to_string(),
            amount: b.amount.format_with_symbol(symbol),
        })
        .collect();

    let mut output = Table::new(rows).with(Style::rounded()).to_string();
    output.push('\n');
    output
}

/// Format budget details for display
pub fn format_budget_details(budget: &Budget, symbol: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Budget:   {}\n", budget.id));
    output.push_str(&format!("Month:    {}\n", budget.month));
    output.push_str(&format!("Category: {}\n", budget.category_label()));
    output.push_str(&format!(
        "Amount:   {}\n",
        budget.amount.format_with_symbol(symbol)
    ));

    output
}

/// Format the budget lines of one month
pub fn format_budget_lines(month: Period, lines: &[BudgetLine], symbol: &str) -> String {
    let mut output = format!("Budgets for {}\n", month);

    if lines.is_empty() {
        output.push_str("  No budgets set for this month.\n");
        return output;
    }

    for line in lines {
        output.push_str(&format!(
            "  {:<20} {:>12}\n",
            line.category.as_deref().unwrap_or(GENERAL_BUDGET_LABEL),
            line.amount.format_with_symbol(symbol)
        ));
    }

    output
}
