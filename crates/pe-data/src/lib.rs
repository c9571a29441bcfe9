//! Tabular data model and loading for the statistics engine

pub mod config;
pub mod dataset;
pub mod schema;
pub mod sources;

use arrow::error::ArrowError;
use thiserror::Error;

// Re-exports
pub use config::{LoadConfig, NullConfig};
pub use dataset::{Column, ColumnData, ColumnKind, Dataset};
pub use schema::SchemaDetector;
pub use sources::CsvSource;

/// Errors that can occur in data operations
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Arrow error: {0}")]
    Arrow(ArrowError),

    #[error("CSV parsing error: {0}")]
    Csv(String),

    #[error("Duplicate column name '{0}'")]
    DuplicateColumn(String),

    #[error("Column '{column}' has {actual} rows, expected {expected}")]
    RowCountMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid column '{column}': {reason}")]
    InvalidColumn { column: String, reason: String },

    #[error("Unsupported data type {data_type} for column '{column}'")]
    UnsupportedType { column: String, data_type: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<csv::Error> for DataError {
    fn from(error: csv::Error) -> Self {
        match error.kind() {
            csv::ErrorKind::Io(io_err) => DataError::Io(std::io::Error::new(io_err.kind(), error.to_string())),
            _ => DataError::Csv(error.to_string()),
        }
    }
}

impl From<ArrowError> for DataError {
    fn from(error: ArrowError) -> Self {
        DataError::Arrow(error)
    }
}

impl From<serde_json::Error> for DataError {
    fn from(error: serde_json::Error) -> Self {
        DataError::Config(error.to_string())
    }
}
