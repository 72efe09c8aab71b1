//! Budget CLI commands
//!
//! Implements CLI commands for monthly budgets.

use clap::Subcommand;

use super::{parse_amount, CommandContext};
use crate::display::budget::{format_budget_details, format_budget_lines, format_budget_list};
use crate::error::{FinanceError, FinanceResult};
use crate::models::BudgetId;
use crate::services::BudgetService;

/// Budget subcommands
#[derive(Subcommand, Debug)]
pub enum BudgetCommands {
    /// Set a budget for a month
    Add {
        /// Month (YYYY-MM)
        month: String,
        /// Amount (e.g., "400", "120.50")
        amount: String,
        /// Category; omit for the general budget
        #[arg(short, long)]
        category: Option<String>,
    },
    /// List all budgets
    List,
    /// Show budget details
    Show {
        /// Budget ID
        id: String,
    },
    /// Replace a budget's month, amount and category
    Edit {
        /// Budget ID
        id: String,
        /// Month (YYYY-MM)
        month: String,
        /// Amount
        amount: String,
        /// Category; omit for the general budget
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Delete a budget
    Delete {
        /// Budget ID
        id: String,
    },
    /// Show the budgets of one month
    Month {
        /// Month (YYYY-MM), defaults to the current month
        month: Option<String>,
    },
}

fn parse_id(id: &str) -> FinanceResult<BudgetId> {
    BudgetId::parse(id).map_err(|_| FinanceError::Validation(format!("Invalid budget ID: {}", id)))
}

/// Handle a budget command
pub fn handle_budget_command(ctx: &CommandContext<'_>, cmd: BudgetCommands) -> FinanceResult<()> {
    let service = BudgetService::new(ctx.storage);

    match cmd {
        BudgetCommands::Add {
            month,
            amount,
            category,
        } => {
            let amount = parse_amount(&amount)?;
            let budget = service.add(&ctx.owner, &month, amount, category.as_deref())?;

            println!(
                "Budget of {} set for {} ({})",
                budget.amount.format_with_symbol(ctx.symbol()),
                budget.category_label(),
                budget.month
            );
            println!("  ID: {}", budget.id);
        }

        BudgetCommands::List => {
            let budgets = service.list(&ctx.owner)?;
            print!("{}", format_budget_list(&budgets, ctx.symbol()));
        }

        BudgetCommands::Show { id } => {
            let budget = service.find(&ctx.owner, parse_id(&id)?)?;
            print!("{}", format_budget_details(&budget, ctx.symbol()));
        }

        BudgetCommands::Edit {
            id,
            month,
            amount,
            category,
        } => {
            let amount = parse_amount(&amount)?;
            let budget = service.update(
                &ctx.owner,
                parse_id(&id)?,
                &month,
                amount,
                category.as_deref(),
            )?;
            println!("Updated budget {}", budget.id);
            print!("{}", format_budget_details(&budget, ctx.symbol()));
        }

        BudgetCommands::Delete { id } => {
            let id = parse_id(&id)?;
            service.delete(&ctx.owner, id)?;
            println!("Deleted budget {}", id);
        }

        BudgetCommands::Month { month } => {
            let month = ctx.periods.parse_or_current(month.as_deref())?;
            let lines = service.for_period(&ctx.owner, month)?;
            print!("{}", format_budget_lines(month, &lines, ctx.symbol()));
        }
    }

    Ok(())
}
