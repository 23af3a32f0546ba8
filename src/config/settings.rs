//! User settings for budget-goals
//!
//! Manages display preferences and the fund/defund step used by row actions.

use serde::{Deserialize, Serialize};

use super::paths::GoalPaths;
use crate::error::GoalError;
use crate::models::Money;

/// User settings for budget-goals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency symbol used when displaying amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Amount moved by a single fund/defund action (in cents)
    #[serde(default = "default_fund_step")]
    pub fund_step: Money,

    /// Whether a new session starts with the sample goals
    #[serde(default = "default_seed_demo_goals")]
    pub seed_demo_goals: bool,

    /// Width of the text progress bar, in characters
    #[serde(default = "default_progress_bar_width")]
    pub progress_bar_width: usize,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_fund_step() -> Money {
    Money::from_dollars(100)
}

fn default_seed_demo_goals() -> bool {
    true
}

fn default_progress_bar_width() -> usize {
    20
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            fund_step: default_fund_step(),
            seed_demo_goals: default_seed_demo_goals(),
            progress_bar_width: default_progress_bar_width(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or use defaults if the file doesn't exist
    pub fn load_or_create(paths: &GoalPaths) -> Result<Self, GoalError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Don't save yet - let caller decide when to persist
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| GoalError::Io(format!("Failed to read settings file: {}", e)))?;

        let settings: Settings = serde_json::from_str(&contents)
            .map_err(|e| GoalError::Config(format!("Failed to parse settings file: {}", e)))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &GoalPaths) -> Result<(), GoalError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| GoalError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| GoalError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    pub fn validate(&self) -> Result<(), GoalError> {
        if self.fund_step.is_negative() {
            return Err(GoalError::Config(format!(
                "fund_step cannot be negative: {}",
                self.fund_step
            )));
        }
        if self.progress_bar_width == 0 {
            return Err(GoalError::Config(
                "progress_bar_width must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
