//! CLI commands for reports
//!
//! Prints the dashboard snapshot and the multi-month trend.

use clap::Subcommand;

use super::CommandContext;
use crate::error::FinanceResult;
use crate::reports::{DashboardSnapshot, TrendReport};

/// Report subcommands
#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Income and expense over recent months
    Trend {
        /// Number of months, ending at the current month
        #[arg(short, long)]
        months: Option<usize>,
    },
}

/// Print the dashboard snapshot
pub fn handle_dashboard(ctx: &CommandContext<'_>) -> FinanceResult<()> {
    let snapshot = DashboardSnapshot::generate(
        ctx.storage,
        &ctx.owner,
        &ctx.periods,
        ctx.settings.recent_limit,
    )?;
    print!("{}", snapshot.format_terminal(ctx.symbol()));
    Ok(())
}

/// Handle a report command
pub fn handle_report_command(ctx: &CommandContext<'_>, cmd: ReportCommands) -> FinanceResult<()> {
    match cmd {
        ReportCommands::Trend { months } => {
            let months = months.unwrap_or(ctx.settings.trend_months);
            let report = TrendReport::generate(ctx.storage, &ctx.owner, &ctx.periods, months)?;
            print!("{}", report.format_terminal(ctx.symbol()));
        }
    }

    Ok(())
}
