//! Engine configuration.
//!
//! Scoring weights and the default-assignment policy, loadable from TOML.
//! The defaults reproduce the standard ranking formula exactly.
//!
//! ```
//! use u_substitute::EngineConfig;
//!
//! let config = EngineConfig::from_toml_str(r#"
//!     history_weight = 8
//!     one_default_per_day = false
//! "#).unwrap();
//!
//! assert_eq!(config.continuity_bonus, 1000);
//! assert_eq!(config.history_weight, 8);
//! assert!(!config.one_default_per_day);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SubstituteError};

/// Largest accepted value for any scoring weight.
pub const MAX_WEIGHT: i64 = 1_000_000;

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Subtracted from the score of a candidate who already teaches the
    /// affected class.
    pub continuity_bonus: i64,
    /// Score per period the candidate teaches that weekday.
    pub load_weight: i64,
    /// Score per substitution the candidate has done this term.
    pub history_weight: i64,
    /// Exclude a teacher already defaulted into one period of the run from
    /// being defaulted into another. Affects defaults only; manual choices
    /// may still reuse a teacher across periods.
    pub one_default_per_day: bool,
    /// Reason stamped on substitution records when none is given.
    pub default_reason: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            continuity_bonus: 1000,
            load_weight: 10,
            history_weight: 5,
            one_default_per_day: true,
            default_reason: None,
        }
    }
}

impl EngineConfig {
    /// Parses and validates configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(s).map_err(|e| SubstituteError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| SubstituteError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Rejects weights outside `0..=MAX_WEIGHT`.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("continuity_bonus", self.continuity_bonus),
            ("load_weight", self.load_weight),
            ("history_weight", self.history_weight),
        ] {
            if value < 0 {
                return Err(SubstituteError::Config(format!(
                    "{name} must be non-negative, got {value}"
                )));
            }
            if value > MAX_WEIGHT {
                return Err(SubstituteError::Config(format!(
                    "{name} must be at most {MAX_WEIGHT}, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Sets the continuity bonus.
    pub fn with_continuity_bonus(mut self, bonus: i64) -> Self {
        self.continuity_bonus = bonus;
        self
    }

    /// Sets the day-load weight.
    pub fn with_load_weight(mut self, weight: i64) -> Self {
        self.load_weight = weight;
        self
    }

    /// Sets the history weight.
    pub fn with_history_weight(mut self, weight: i64) -> Self {
        self.history_weight = weight;
        self
    }

    /// Enables or disables the one-default-per-day bias.
    pub fn with_one_default_per_day(mut self, enabled: bool) -> Self {
        self.one_default_per_day = enabled;
        self
    }

    /// Sets the default reason for substitution records.
    pub fn with_default_reason(mut self, reason: impl Into<String>) -> Self {
        self.default_reason = Some(reason.into());
        self
    }
}
