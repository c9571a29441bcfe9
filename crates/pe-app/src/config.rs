//! Application settings file

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use pe_data::LoadConfig;
use pe_stats::AnalysisConfig;

use crate::cli::Args;

/// Contents of the `--config` JSON file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub load: LoadConfig,
    pub analysis: AnalysisConfig,
}

impl AppConfig {
    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json_str(&json).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.analysis.validate()?;
        Ok(config)
    }

    /// Command-line flags win over file values
    pub fn apply_args(&mut self, args: &Args) -> Result<()> {
        let analysis = &mut self.analysis;
        if let Some(style) = args.style {
            analysis.style = style;
        }
        if let Some(threshold) = args.threshold {
            analysis.correlation_threshold = threshold;
        }
        if let Some(method) = args.method {
            analysis.correlation_method = method;
        }
        if let Some(multiplier) = args.outliers {
            analysis.iqr_multiplier = multiplier;
        }
        analysis.validate()?;
        Ok(())
    }
}
