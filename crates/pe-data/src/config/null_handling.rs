//! Missing-value markers for raw text input

use serde::{Deserialize, Serialize};

/// Missing-marker configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NullConfig {
    /// Patterns to treat as missing
    pub patterns: Vec<String>,

    /// Whether to trim whitespace before checking
    pub trim_whitespace: bool,

    /// Case sensitive matching
    pub case_sensitive: bool,
}

impl Default for NullConfig {
    fn default() -> Self {
        Self {
            patterns: vec![
                String::new(),      // Empty string
                "-".to_string(),
                "NA".to_string(),
                "N/A".to_string(),
                "#N/A".to_string(),
                "NaN".to_string(),
                "null".to_string(),
                "None".to_string(),
                "<NA>".to_string(),
            ],
            trim_whitespace: true,
            case_sensitive: false,
        }
    }
}

impl NullConfig {
    /// Check if a value should be treated as missing
    pub fn is_null(&self, value: &str) -> bool {
        let test_value = if self.trim_whitespace {
            value.trim()
        } else {
            value
        };

        self.patterns.iter().any(|pattern| {
            if self.case_sensitive {
                test_value == pattern
            } else {
                test_value.eq_ignore_ascii_case(pattern)
            }
        })
    }

    /// Add a missing marker
    pub fn add_pattern(&mut self, pattern: String) {
        if !self.patterns.contains(&pattern) {
            self.patterns.push(pattern);
        }
    }

    /// Return the value as an owned cell, or `None` when it is a missing marker
    pub fn cell(&self, value: &str) -> Option<String> {
        if self.is_null(value) {
            None
        } else if self.trim_whitespace {
            Some(value.trim().to_string())
        } else {
            Some(value.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_markers() {
        let config = NullConfig::default();
        assert!(config.is_null(""));
        assert!(config.is_null("  "));
        assert!(config.is_null("NA"));
        assert!(config.is_null("nan"));
        assert!(config.is_null(" null "));
        assert!(!config.is_null("0"));
        assert!(!config.is_null("Nancy"));
    }

    #[test]
    fn test_case_sensitive_matching() {
        let config = NullConfig {
            case_sensitive: true,
            ..NullConfig::default()
        };
        assert!(config.is_null("NaN"));
        assert!(!config.is_null("nan"));
    }

    #[test]
    fn test_add_pattern_and_cell() {
        let mut config = NullConfig::default();
        config.add_pattern("missing".to_string());
        config.add_pattern("missing".to_string());
        assert_eq!(config.patterns.iter().filter(|p| *p == "missing").count(), 1);
        assert_eq!(config.cell("missing"), None);
        assert_eq!(config.cell(" Sales "), Some("Sales".to_string()));
    }
}
