//! Evaluator configuration.
//!
//! Settings come from JSON (all keys optional) or from environment variables,
//! falling back to the defaults below.

use std::env;

use anyhow::Context;
use serde::{Deserialize, Serialize};

pub const DECIMAL_PLACES_ENV: &str = "BR_INSTALLMENTS_DECIMAL_PLACES";
pub const ALLOW_NEGATIVE_ENV: &str = "BR_INSTALLMENTS_ALLOW_NEGATIVE";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Decimal places summary values are rounded to. Ledger rows are not rounded.
    pub summary_decimal_places: u32,
    /// Reject negative amounts and rates instead of computing with them.
    pub reject_negative_amounts: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            summary_decimal_places: 2,
            reject_negative_amounts: true,
        }
    }
}

impl Settings {
    pub fn from_json_str(text: &str) -> Result<Self, anyhow::Error> {
        let settings = serde_json::from_str(text).context("Failed to parse settings")?;
        Ok(settings)
    }

    /// Defaults overridden by any of the recognised environment variables.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, anyhow::Error> {
        let mut settings = Self::default();

        if let Some(value) = lookup(DECIMAL_PLACES_ENV) {
            settings.summary_decimal_places = value.trim().parse().with_context(|| {
                format!("{DECIMAL_PLACES_ENV} must be a whole number, got '{value}'")
            })?;
        }
        if let Some(value) = lookup(ALLOW_NEGATIVE_ENV) {
            let allow = match value.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => anyhow::bail!("{ALLOW_NEGATIVE_ENV} must be true or false, got '{value}'"),
            };
            settings.reject_negative_amounts = !allow;
        }

        Ok(settings)
    }
}
