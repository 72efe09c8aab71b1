//! User settings for fintrack
//!
//! Manages display preferences and the defaults the command line applies
//! before calling into the ledger.

use serde::{Deserialize, Serialize};

use super::paths::FinancePaths;
use crate::error::FinanceError;

/// User settings for fintrack
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency symbol used when printing amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Number of transactions shown on the dashboard
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,

    /// Number of months in the trend report
    #[serde(default = "default_trend_months")]
    pub trend_months: usize,

    /// Category applied when a transaction is added without one
    #[serde(default = "default_category")]
    pub default_category: String,

    /// Owner used when neither `--owner` nor `FINTRACK_OWNER` is given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_owner: Option<String>,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_recent_limit() -> usize {
    10
}

fn default_trend_months() -> usize {
    6
}

fn default_category() -> String {
    "General".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            recent_limit: default_recent_limit(),
            trend_months: default_trend_months(),
            default_category: default_category(),
            default_owner: None,
        }
    }
}

impl Settings {
    /// Load settings from disk, or fall back to defaults if the file doesn't exist
    pub fn load_or_create(paths: &FinancePaths) -> Result<Self, FinanceError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| FinanceError::Io(format!("Failed to read settings file: {}", e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| FinanceError::Config(format!("Failed to parse settings file: {}", e)))
    }

    /// Save settings to disk
    pub fn save(&self, paths: &FinancePaths) -> Result<(), FinanceError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| FinanceError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| FinanceError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}
