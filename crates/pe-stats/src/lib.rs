//! Statistical summaries, outlier detection and correlation scans over a [`Dataset`]
//!
//! Every operation is a pure function of an immutable dataset snapshot.

pub mod comparison;
pub mod config;
pub mod correlation;
pub mod format;
pub mod outliers;
pub mod quality;
pub mod quantile;
pub mod summary;
pub mod table;

use thiserror::Error;

pub use pe_data::{Column, ColumnKind, Dataset};

// Re-exports
pub use comparison::{r_squared, ModelComparison};
pub use config::AnalysisConfig;
pub use correlation::{
    correlation_matrix, find_correlated_pairs, find_highly_correlated_pairs, CorrelationMatrix,
    CorrelationMethod, CorrelationPair,
};
pub use outliers::{detect_outliers_iqr, detect_outliers_zscore, OutlierReport, ZScoreReport};
pub use quality::DataQualityReport;
pub use summary::{
    calculate_statistics, compute_summary, compute_summary_for, describe, describe_by_group, CategoricalSummary,
    ColumnSummary, DatasetSummary, Description, NumericSummary, SummaryStyle,
};
pub use table::SummaryTable;

/// Column names listed when a lookup fails
const SUGGESTED_COLUMNS: usize = 5;

/// Errors produced by the statistics engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    #[error("Insufficient data: need at least {required} non-missing values, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("Invalid column '{column}': {reason}")]
    InvalidColumn { column: String, reason: String },

    #[error("Empty dataset ({rows} rows, {columns} columns)")]
    EmptyDataset { rows: usize, columns: usize },

    #[error("Metric '{metric}' not found. Available metrics: {available:?}")]
    UnknownMetric { metric: String, available: Vec<String> },

    #[error("Model '{0}' not found")]
    UnknownModel(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Export error: {0}")]
    Export(String),
}

impl StatsError {
    /// Names up to [`SUGGESTED_COLUMNS`] of the dataset's columns as a hint
    pub(crate) fn column_not_found(column: &str, dataset: &Dataset) -> Self {
        let names = dataset.column_names();
        let mut available = names.iter().take(SUGGESTED_COLUMNS).copied().collect::<Vec<_>>().join(", ");
        if names.len() > SUGGESTED_COLUMNS {
            available.push_str(", ...");
        }
        let reason = if names.is_empty() {
            "column not found".to_string()
        } else {
            format!("column not found (available: {available})")
        };
        StatsError::InvalidColumn {
            column: column.to_string(),
            reason,
        }
    }

    pub(crate) fn not_numeric(column: &str) -> Self {
        StatsError::InvalidColumn {
            column: column.to_string(),
            reason: "column is not numeric".to_string(),
        }
    }

    /// Fails with `EmptyDataset` when the dataset has no rows or no columns
    pub(crate) fn check_not_empty(dataset: &Dataset) -> Result<(), Self> {
        if dataset.is_empty() {
            return Err(StatsError::EmptyDataset {
                rows: dataset.row_count(),
                columns: dataset.column_count(),
            });
        }
        Ok(())
    }
}

impl From<csv::Error> for StatsError {
    fn from(error: csv::Error) -> Self {
        StatsError::Export(error.to_string())
    }
}

impl From<std::io::Error> for StatsError {
    fn from(error: std::io::Error) -> Self {
        StatsError::Export(error.to_string())
    }
}
