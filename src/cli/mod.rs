//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod budget;
pub mod report;
pub mod transaction;

pub use budget::{handle_budget_command, BudgetCommands};
pub use report::{handle_dashboard, handle_report_command, ReportCommands};
pub use transaction::{handle_transaction_command, TransactionCommands};

use crate::config::settings::Settings;
use crate::error::{FinanceError, FinanceResult};
use crate::models::{Money, OwnerId};
use crate::services::PeriodService;
use crate::storage::Storage;

/// Environment variable naming the owner when `--owner` is absent
pub const OWNER_ENV: &str = "FINTRACK_OWNER";

/// Everything a command handler needs
pub struct CommandContext<'a> {
    pub storage: &'a Storage,
    pub settings: &'a Settings,
    pub owner: OwnerId,
    pub periods: PeriodService,
}

impl CommandContext<'_> {
    pub(crate) fn symbol(&self) -> &str {
        &self.settings.currency_symbol
    }
}

/// Pick the owner from the command line, falling back to the settings file
pub fn resolve_owner(flag: Option<&str>, settings: &Settings) -> FinanceResult<OwnerId> {
    match flag.or(settings.default_owner.as_deref()) {
        Some(owner) => OwnerId::new(owner),
        None => Err(FinanceError::Config(format!(
            "No owner given; pass --owner, set {} or add default_owner to the settings file",
            OWNER_ENV
        ))),
    }
}

pub(crate) fn parse_amount(s: &str) -> FinanceResult<Money> {
    Money::parse(s).map_err(|e| FinanceError::Validation(format!("Invalid amount: {}", e)))
}
