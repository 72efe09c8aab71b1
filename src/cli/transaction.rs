//! Transaction CLI commands
//!
//! Implements CLI commands for ledger management.

use clap::Subcommand;

use super::{parse_amount, CommandContext};
use crate::display::transaction::{format_transaction_details, format_transaction_register};
use crate::error::{FinanceError, FinanceResult};
use crate::models::{TransactionId, TransactionKind, TransactionPatch};
use crate::services::{CreateTransactionInput, TransactionService};

/// Transaction subcommands
#[derive(Subcommand, Debug)]
pub enum TransactionCommands {
    /// Record a new transaction
    Add {
        /// income or expense
        kind: String,
        /// Amount (e.g., "50", "12.99")
        amount: String,
        /// Category name, defaults to the configured default category
        #[arg(short, long)]
        category: Option<String>,
        /// Transaction date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        /// Free-text description
        #[arg(short = 'm', long)]
        description: Option<String>,
    },
    /// List transactions, newest first
    List {
        /// Number of transactions to show
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Show transaction details
    Show {
        /// Transaction ID
        id: String,
    },
    /// Edit a transaction; only the given fields change
    Edit {
        /// Transaction ID
        id: String,
        /// New kind (income or expense)
        #[arg(short, long)]
        kind: Option<String>,
        /// New amount
        #[arg(short, long)]
        amount: Option<String>,
        /// New category
        #[arg(short, long)]
        category: Option<String>,
        /// New date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,
        /// New description
        #[arg(short = 'm', long)]
        description: Option<String>,
    },
    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: String,
    },
}

fn parse_id(id: &str) -> FinanceResult<TransactionId> {
    TransactionId::parse(id)
        .map_err(|_| FinanceError::Validation(format!("Invalid transaction ID: {}", id)))
}

/// Handle a transaction command
pub fn handle_transaction_command(
    ctx: &CommandContext<'_>,
    cmd: TransactionCommands,
) -> FinanceResult<()> {
    let service = TransactionService::new(ctx.storage);

    match cmd {
        TransactionCommands::Add {
            kind,
            amount,
            category,
            date,
            description,
        } => {
            let kind: TransactionKind = kind.parse()?;
            let amount = parse_amount(&amount)?;
            let date = match date {
                Some(d) => d,
                None => ctx.periods.today_date()?.to_string(),
            };
            let category = category.unwrap_or_else(|| ctx.settings.default_category.clone());

            let txn = service.create(
                &ctx.owner,
                CreateTransactionInput {
                    date,
                    kind,
                    amount,
                    category,
                    description: description.unwrap_or_default(),
                },
            )?;

            println!(
                "Recorded {} of {} in '{}' on {}",
                txn.kind,
                txn.amount.format_with_symbol(ctx.symbol()),
                txn.category,
                txn.date
            );
            println!("  ID: {}", txn.id);
        }

        TransactionCommands::List { limit } => {
            let transactions = match limit {
                Some(limit) => service.recent(&ctx.owner, limit)?,
                None => service.list(&ctx.owner)?,
            };
            print!("{}", format_transaction_register(&transactions, ctx.symbol()));
        }

        TransactionCommands::Show { id } => {
            let txn = service.find(&ctx.owner, parse_id(&id)?)?;
            print!("{}", format_transaction_details(&txn, ctx.symbol()));
        }

        TransactionCommands::Edit {
            id,
            kind,
            amount,
            category,
            date,
            description,
        } => {
            let patch = TransactionPatch {
                date,
                kind: kind
                    .as_deref()
                    .map(str::parse::<TransactionKind>)
                    .transpose()?,
                amount: amount.as_deref().map(parse_amount).transpose()?,
                category,
                description,
            };

            if patch.is_empty() {
                println!("Nothing to change.");
                return Ok(());
            }

            let txn = service.update(&ctx.owner, parse_id(&id)?, patch)?;
            println!("Updated transaction {}", txn.id);
            print!("{}", format_transaction_details(&txn, ctx.symbol()));
        }

        TransactionCommands::Delete { id } => {
            let id = parse_id(&id)?;
            service.delete(&ctx.owner, id)?;
            println!("Deleted transaction {}", id);
        }
    }

    Ok(())
}
