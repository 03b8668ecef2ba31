use crate::error::{Result, WxError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunable parameters of the imputation cascade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImputeConfig {
    /// Longest run of missing neighbours counted on each side of a target.
    pub probe_limit: usize,
    /// Largest gap on either side that still qualifies for interpolation;
    /// also the longest run the interpolator will fill.
    pub interpolation_bound: usize,
    /// Predictors missing at or above this rate for a station are dropped.
    pub reliability_threshold: f64,
    /// A station needs more complete rows than this for its own model.
    pub sample_size_threshold: usize,
    /// Readings with a larger magnitude are treated as missing.
    pub input_bound: f64,
    /// Estimates with a larger magnitude are replaced by `neutral_value`.
    pub output_bound: f64,
    pub neutral_value: f64,
}

impl Default for ImputeConfig {
    fn default() -> Self {
        ImputeConfig {
            probe_limit: 20,
            interpolation_bound: 6,
            reliability_threshold: 0.4,
            sample_size_threshold: 500,
            input_bound: 4.0,
            output_bound: 5.0,
            neutral_value: 0.0,
        }
    }
}

impl ImputeConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: ImputeConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if self.interpolation_bound > self.probe_limit {
            return Err(WxError::InvalidConfig(format!(
                "interpolation_bound ({}) exceeds probe_limit ({})",
                self.interpolation_bound, self.probe_limit
            )));
        }
        if !(self.reliability_threshold > 0.0 && self.reliability_threshold <= 1.0) {
            return Err(WxError::InvalidConfig(format!(
                "reliability_threshold must be in (0, 1], got {}",
                self.reliability_threshold
            )));
        }
        if !(self.input_bound > 0.0) || !(self.output_bound > 0.0) {
            return Err(WxError::InvalidConfig(
                "input_bound and output_bound must be positive".to_string(),
            ));
        }
        if self.neutral_value.abs() > self.output_bound {
            return Err(WxError::InvalidConfig(format!(
                "neutral_value {} lies outside output_bound {}",
                self.neutral_value, self.output_bound
            )));
        }
        Ok(())
    }

    /// Apply the output clamp to a final estimate.
    pub fn clamp_output(&self, value: f64) -> f64 {
        if value.is_finite() && value.abs() <= self.output_bound {
            value
        } else {
            self.neutral_value
        }
    }
}
