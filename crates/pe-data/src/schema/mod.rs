//! Column kind inference for raw text data

use ahash::AHashSet;

use crate::config::NullConfig;
use crate::dataset::ColumnKind;

/// Schema detector for analyzing raw text and classifying columns
pub struct SchemaDetector {
    sample_size: usize,
    null_config: NullConfig,
}

/// Information about a detected schema
#[derive(Debug, Clone)]
pub struct SchemaInfo {
    pub columns: Vec<DetectedColumn>,
}

/// Detection result for a single column
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedColumn {
    pub name: String,
    pub kind: ColumnKind,
    /// Missing markers seen in the sampled rows
    pub null_count: usize,
    /// Distinct non-missing values seen in the sampled rows
    pub distinct_count: usize,
}

impl SchemaInfo {
    /// Kind detected for a column, if the column was analyzed
    pub fn kind_of(&self, name: &str) -> Option<ColumnKind> {
        self.columns.iter().find(|c| c.name == name).map(|c| c.kind)
    }
}

/// Coerce raw text to a finite floating-point number
pub fn parse_numeric(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

impl SchemaDetector {
    /// Create a new schema detector that inspects every row
    pub fn new() -> Self {
        Self {
            sample_size: 0,
            null_config: NullConfig::default(),
        }
    }

    /// Set the sample size for detection; 0 inspects every row
    pub fn with_sample_size(mut self, size: usize) -> Self {
        self.sample_size = size;
        self
    }

    /// Set the missing markers used while sampling
    pub fn with_null_config(mut self, null_config: NullConfig) -> Self {
        self.null_config = null_config;
        self
    }

    /// Detect column kinds from sample rows
    pub fn detect_from_samples(&self, headers: &[String], samples: &[Vec<String>]) -> SchemaInfo {
        let limit = if self.sample_size == 0 {
            samples.len()
        } else {
            self.sample_size.min(samples.len())
        };
        let samples = &samples[..limit];

        let columns = headers
            .iter()
            .enumerate()
            .map(|(col_idx, header)| self.analyze_column(header, samples, col_idx))
            .collect();

        SchemaInfo { columns }
    }

    /// Analyze a single column
    fn analyze_column(&self, name: &str, samples: &[Vec<String>], col_idx: usize) -> DetectedColumn {
        let mut null_count = 0;
        let mut present = 0;
        let mut is_numeric = true;
        let mut unique = AHashSet::new();

        for row in samples {
            match row.get(col_idx) {
                Some(value) if !self.null_config.is_null(value) => {
                    present += 1;
                    if is_numeric && parse_numeric(value).is_none() {
                        is_numeric = false;
                    }
                    unique.insert(value.trim());
                }
                _ => null_count += 1,
            }
        }

        // An all-missing column carries no evidence of being numeric
        let kind = if is_numeric && present > 0 {
            ColumnKind::Numeric
        } else {
            ColumnKind::Categorical
        };

        DetectedColumn {
            name: name.to_string(),
            kind,
            null_count,
            distinct_count: unique.len(),
        }
    }
}

impl Default for SchemaDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
        data.iter()
            .map(|row| row.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_numeric_and_categorical_detection() {
        let headers = vec!["x".to_string(), "dept".to_string(), "mixed".to_string()];
        let samples = rows(&[
            &["1", "Sales", "3"],
            &["2.5", "HR", "n/a"],
            &["NA", "Sales", "three"],
        ]);

        let info = SchemaDetector::new().detect_from_samples(&headers, &samples);
        assert_eq!(info.kind_of("x"), Some(ColumnKind::Numeric));
        assert_eq!(info.kind_of("dept"), Some(ColumnKind::Categorical));
        assert_eq!(info.kind_of("mixed"), Some(ColumnKind::Categorical));
        assert_eq!(info.columns[0].null_count, 1);
        assert_eq!(info.columns[1].distinct_count, 2);
    }

    #[test]
    fn test_all_missing_column_is_categorical() {
        let headers = vec!["empty".to_string()];
        let samples = rows(&[&[""], &["NA"]]);
        let info = SchemaDetector::new().detect_from_samples(&headers, &samples);
        assert_eq!(info.kind_of("empty"), Some(ColumnKind::Categorical));
    }

    #[test]
    fn test_sample_size_limits_inspection() {
        let headers = vec!["v".to_string()];
        let samples = rows(&[&["1"], &["2"], &["oops"]]);
        let info = SchemaDetector::new()
            .with_sample_size(2)
            .detect_from_samples(&headers, &samples);
        assert_eq!(info.kind_of("v"), Some(ColumnKind::Numeric));
    }

    #[test]
    fn test_parse_numeric_rejects_non_finite() {
        assert_eq!(parse_numeric(" 4.5 "), Some(4.5));
        assert_eq!(parse_numeric("1e3"), Some(1000.0));
        assert_eq!(parse_numeric("inf"), None);
        assert_eq!(parse_numeric("abc"), None);
    }
}
