//! Analysis settings

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::correlation::CorrelationMethod;
use crate::summary::SummaryStyle;
use crate::StatsError;

/// Parameters of a full analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub style: SummaryStyle,
    /// Fence multiplier for the IQR rule
    pub iqr_multiplier: f64,
    pub zscore_threshold: f64,
    /// Minimum |coefficient| reported as a correlated pair
    pub correlation_threshold: f64,
    pub correlation_method: CorrelationMethod,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            style: SummaryStyle::Full,
            iqr_multiplier: 1.5,
            zscore_threshold: 3.0,
            correlation_threshold: 0.8,
            correlation_method: CorrelationMethod::Pearson,
        }
    }
}

impl AnalysisConfig {
    pub fn from_json_str(json: &str) -> Result<Self, StatsError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| StatsError::InvalidParameter(format!("analysis config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, StatsError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| StatsError::InvalidParameter(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), StatsError> {
        if !self.iqr_multiplier.is_finite() || self.iqr_multiplier < 0.0 {
            return Err(StatsError::InvalidParameter(format!(
                "iqr_multiplier must be non-negative, got {}",
                self.iqr_multiplier
            )));
        }
        if !self.zscore_threshold.is_finite() || self.zscore_threshold < 0.0 {
            return Err(StatsError::InvalidParameter(format!(
                "zscore_threshold must be non-negative, got {}",
                self.zscore_threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.correlation_threshold) {
            return Err(StatsError::InvalidParameter(format!(
                "correlation_threshold must be within [0, 1], got {}",
                self.correlation_threshold
            )));
        }
        Ok(())
    }
}
