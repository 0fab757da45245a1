//! Report settings shared by the exporters and chart commands.
//!
//! Defaults reproduce the published reports; `POLYREPORT_MARGIN`,
//! `POLYREPORT_PRECISION` and `POLYREPORT_LOG` override them per run.

use std::env;

use serde::{Deserialize, Serialize};
use tracing::Level;

use crate::{
    ReportError,
    compare::{CompareOptions, DEFAULT_MARGIN, IMPROVEMENT_SYMBOL},
    humanize::DEFAULT_PRECISION,
};

pub const MARGIN_ENV: &str = "POLYREPORT_MARGIN";
pub const PRECISION_ENV: &str = "POLYREPORT_PRECISION";
pub const LOG_ENV: &str = "POLYREPORT_LOG";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Ratio a winner must exceed before it counts as outperforming.
    pub margin: f64,
    /// Decimal digits used when humanizing durations.
    pub precision: usize,
    /// Suffix appended to ratios in `.tex` output.
    pub improvement_symbol: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            margin: DEFAULT_MARGIN,
            precision: DEFAULT_PRECISION,
            improvement_symbol: IMPROVEMENT_SYMBOL.to_string(),
        }
    }
}

impl ReportConfig {
    pub fn from_env() -> Result<Self, ReportError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ReportError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(raw) = lookup(MARGIN_ENV) {
            config.margin = raw.trim().parse::<f64>().map_err(|e| {
                ReportError::invalid_input(format!("{MARGIN_ENV}='{raw}': {e}"))
            })?;
            if !config.margin.is_finite() || config.margin <= 0.0 {
                return Err(ReportError::invalid_input(format!(
                    "{MARGIN_ENV} must be a positive number, got {raw}"
                )));
            }
        }
        if let Some(raw) = lookup(PRECISION_ENV) {
            config.precision = raw.trim().parse::<usize>().map_err(|e| {
                ReportError::invalid_input(format!("{PRECISION_ENV}='{raw}': {e}"))
            })?;
        }
        Ok(config)
    }

    pub fn compare_options(&self, min_independent_value: f64) -> CompareOptions {
        CompareOptions {
            margin: self.margin,
            min_independent_value,
        }
    }
}

/// Log level from `POLYREPORT_LOG`, defaulting to `info`.
pub fn log_level_from_env() -> Level {
    env::var(LOG_ENV)
        .ok()
        .and_then(|raw| raw.trim().parse::<Level>().ok())
        .unwrap_or(Level::INFO)
}
