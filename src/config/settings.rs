//! User settings for finance-tracker
//!
//! Display preferences, report defaults and the ordered categorization
//! rule set. Settings are the rule source handed to the categorizer.

use serde::{Deserialize, Serialize};

use super::paths::TrackerPaths;
use crate::error::{TrackerError, TrackerResult};
use crate::models::{default_rules, CategorizationRule, OwnerId};
use crate::reports::{DEFAULT_CASHFLOW_MONTHS, DEFAULT_TOP_MERCHANTS};
use crate::services::categorize::{Categorizer, DEFAULT_CATEGORY};
use crate::storage::RuleSource;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Owner used when `--owner` is not given
    #[serde(default = "default_owner")]
    pub default_owner: String,

    #[serde(default = "default_top_merchants")]
    pub top_merchants_limit: usize,

    #[serde(default = "default_cashflow_months")]
    pub cashflow_months: usize,

    /// Category assigned when no rule matches
    #[serde(default = "default_category")]
    pub default_category: String,

    /// Ordered; the first matching rule wins
    #[serde(default = "default_rules")]
    pub rules: Vec<CategorizationRule>,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "₹".to_string()
}

fn default_owner() -> String {
    "local".to_string()
}

fn default_top_merchants() -> usize {
    DEFAULT_TOP_MERCHANTS
}

fn default_cashflow_months() -> usize {
    DEFAULT_CASHFLOW_MONTHS
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            default_owner: default_owner(),
            top_merchants_limit: default_top_merchants(),
            cashflow_months: default_cashflow_months(),
            default_category: default_category(),
            rules: default_rules(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or defaults if the file doesn't exist
    pub fn load_or_create(paths: &TrackerPaths) -> TrackerResult<Self> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Not persisted until `init` or an explicit save
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| TrackerError::Io(format!("Failed to read settings file: {}", e)))?;

        let settings: Settings = serde_json::from_str(&contents)
            .map_err(|e| TrackerError::Config(format!("Failed to parse settings file: {}", e)))?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn save(&self, paths: &TrackerPaths) -> TrackerResult<()> {
        self.validate()?;
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| TrackerError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| TrackerError::Io(format!("Failed to write settings file: {}", e)))?;

        tracing::info!(path = %paths.settings_file().display(), "settings saved");
        Ok(())
    }

    pub fn validate(&self) -> TrackerResult<()> {
        if self.default_owner.trim().is_empty() {
            return Err(TrackerError::Config("default_owner cannot be blank".into()));
        }
        if self.default_category.trim().is_empty() {
            return Err(TrackerError::Config("default_category cannot be blank".into()));
        }
        if self.top_merchants_limit == 0 {
            return Err(TrackerError::Config(
                "top_merchants_limit must be at least 1".into(),
            ));
        }
        if self.cashflow_months == 0 {
            return Err(TrackerError::Config("cashflow_months must be at least 1".into()));
        }
        for rule in &self.rules {
            rule.validate().map_err(TrackerError::Config)?;
        }
        Ok(())
    }

    pub fn default_owner(&self) -> OwnerId {
        OwnerId::new(self.default_owner.trim())
    }

    /// Categorizer over the configured rules and fallback
    pub fn categorizer(&self) -> Categorizer {
        Categorizer::new(self.rules.clone()).with_fallback(self.default_category.clone())
    }
}

impl RuleSource for Settings {
    fn list_rules(&self) -> TrackerResult<Vec<CategorizationRule>> {
        Ok(self.rules.clone())
    }
}
