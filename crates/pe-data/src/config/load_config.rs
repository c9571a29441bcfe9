//! Configuration for loading tabular text data

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::null_handling::NullConfig;
use crate::dataset::ColumnKind;
use crate::DataError;

/// Configuration for reading a delimited text file into a dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadConfig {
    /// Header line number (0-indexed)
    pub header_line: usize,

    /// Field delimiter
    pub delimiter: char,

    /// Selected columns; empty selects every column
    pub selected_columns: HashSet<String>,

    /// Column kind overrides
    pub column_kinds: HashMap<String, ColumnKind>,

    /// Missing-marker configuration
    pub null_config: NullConfig,

    /// Sample size for kind inference; 0 inspects every row
    pub sample_size: usize,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            header_line: 0,
            delimiter: ',',
            selected_columns: HashSet::new(),
            column_kinds: HashMap::new(),
            null_config: NullConfig::default(),
            sample_size: 0,
        }
    }
}

impl LoadConfig {
    /// Parse a configuration from JSON text
    pub fn from_json_str(json: &str) -> Result<Self, DataError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a configuration from a JSON file
    pub fn from_path(path: &Path) -> Result<Self, DataError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Delimiter as the single byte the CSV reader expects
    pub fn delimiter_byte(&self) -> Result<u8, DataError> {
        u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| DataError::Config(format!("delimiter {:?} is not a single ASCII character", self.delimiter)))
    }

    /// Whether a column takes part in the load
    pub fn is_selected(&self, column: &str) -> bool {
        self.selected_columns.is_empty() || self.selected_columns.contains(column)
    }

    /// Get column kind with override
    pub fn column_kind(&self, column: &str, detected: ColumnKind) -> ColumnKind {
        self.column_kinds.get(column).copied().unwrap_or(detected)
    }

    /// Force a column to a kind regardless of inference
    pub fn with_kind(mut self, column: impl Into<String>, kind: ColumnKind) -> Self {
        self.column_kinds.insert(column.into(), kind);
        self
    }

    /// Restrict the load to the given columns
    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected_columns = columns.into_iter().map(Into::into).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = LoadConfig::from_json_str(r#"{ "delimiter": ";", "column_kinds": { "zip": "categorical" } }"#).unwrap();
        assert_eq!(config.delimiter_byte().unwrap(), b';');
        assert_eq!(config.header_line, 0);
        assert_eq!(config.column_kind("zip", ColumnKind::Numeric), ColumnKind::Categorical);
        assert_eq!(config.column_kind("age", ColumnKind::Numeric), ColumnKind::Numeric);
        assert!(config.null_config.is_null("NA"));
    }

    #[test]
    fn test_non_ascii_delimiter_rejected() {
        let config = LoadConfig {
            delimiter: '→',
            ..LoadConfig::default()
        };
        assert!(matches!(config.delimiter_byte(), Err(DataError::Config(_))));
    }

    #[test]
    fn test_column_selection() {
        let config = LoadConfig::default();
        assert!(config.is_selected("anything"));

        let config = config.with_columns(["a", "b"]);
        assert!(config.is_selected("a"));
        assert!(!config.is_selected("c"));
    }
}
