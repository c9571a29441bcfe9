//! Per-column descriptive statistics
//!
//! [`compute_summary`] walks a dataset in column order and produces one
//! [`ColumnSummary`] per column that matches the requested
//! [`SummaryStyle`]. Numeric columns get count / missing / unique / mean /
//! std / min / median / max; categorical columns get count / missing /
//! unique / top value.

mod describe;

use std::str::FromStr;

use ahash::AHashSet;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};
use tracing::debug;

use pe_data::{Column, ColumnData, ColumnKind, Dataset};

use crate::quantile::{quantile_sorted, sorted, Moments};
use crate::StatsError;

pub use describe::{describe, describe_by_group, Description};

/// Which columns a summary covers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryStyle {
    Numeric,
    Categorical,
    #[default]
    Full,
}

impl SummaryStyle {
    pub fn includes(&self, kind: ColumnKind) -> bool {
        match self {
            SummaryStyle::Numeric => kind == ColumnKind::Numeric,
            SummaryStyle::Categorical => kind == ColumnKind::Categorical,
            SummaryStyle::Full => true,
        }
    }
}

impl FromStr for SummaryStyle {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "numeric" => Ok(SummaryStyle::Numeric),
            "categorical" => Ok(SummaryStyle::Categorical),
            "full" => Ok(SummaryStyle::Full),
            other => Err(StatsError::InvalidParameter(format!(
                "unknown summary style '{other}' (expected numeric, categorical or full)"
            ))),
        }
    }
}

/// Statistics of a numeric column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericSummary {
    pub count: usize,
    pub missing_count: usize,
    /// Distinct values, compared bit for bit
    pub unique_count: usize,
    /// Absent when the column has no values
    pub mean: Option<f64>,
    /// Sample standard deviation; absent with fewer than two values
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub median: Option<f64>,
    pub max: Option<f64>,
}

impl NumericSummary {
    /// Sample standard deviation, failing when fewer than two values exist
    pub fn std_dev(&self) -> Result<f64, StatsError> {
        self.std.ok_or(StatsError::InsufficientData {
            required: 2,
            actual: self.count,
        })
    }

    pub fn missing_ratio(&self) -> f64 {
        ratio(self.missing_count, self.count + self.missing_count)
    }
}

/// Statistics of a categorical column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoricalSummary {
    pub count: usize,
    pub missing_count: usize,
    pub unique_count: usize,
    /// Most frequent value; the first one seen wins a tie
    pub top_value: Option<String>,
    pub top_frequency: usize,
}

impl CategoricalSummary {
    pub fn missing_ratio(&self) -> f64 {
        ratio(self.missing_count, self.count + self.missing_count)
    }
}

fn ratio(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64
    }
}

/// Summary of one column
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ColumnSummary {
    Numeric(NumericSummary),
    Categorical(CategoricalSummary),
}

impl ColumnSummary {
    pub fn kind(&self) -> ColumnKind {
        match self {
            ColumnSummary::Numeric(_) => ColumnKind::Numeric,
            ColumnSummary::Categorical(_) => ColumnKind::Categorical,
        }
    }

    pub fn count(&self) -> usize {
        match self {
            ColumnSummary::Numeric(s) => s.count,
            ColumnSummary::Categorical(s) => s.count,
        }
    }

    pub fn missing_count(&self) -> usize {
        match self {
            ColumnSummary::Numeric(s) => s.missing_count,
            ColumnSummary::Categorical(s) => s.missing_count,
        }
    }

    pub fn missing_ratio(&self) -> f64 {
        match self {
            ColumnSummary::Numeric(s) => s.missing_ratio(),
            ColumnSummary::Categorical(s) => s.missing_ratio(),
        }
    }

    pub fn as_numeric(&self) -> Option<&NumericSummary> {
        match self {
            ColumnSummary::Numeric(s) => Some(s),
            ColumnSummary::Categorical(_) => None,
        }
    }

    pub fn as_categorical(&self) -> Option<&CategoricalSummary> {
        match self {
            ColumnSummary::Numeric(_) => None,
            ColumnSummary::Categorical(s) => Some(s),
        }
    }
}

/// Summaries of a dataset, keyed by column name in dataset order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub style: SummaryStyle,
    pub row_count: usize,
    pub columns: IndexMap<String, ColumnSummary>,
    /// Columns that could not be summarized, with the reason
    #[serde(serialize_with = "serialize_failures")]
    pub failures: IndexMap<String, StatsError>,
}

impl DatasetSummary {
    pub fn get(&self, column: &str) -> Option<&ColumnSummary> {
        self.columns.get(column)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ColumnSummary)> {
        self.columns.iter().map(|(name, summary)| (name.as_str(), summary))
    }
}

fn serialize_failures<S: Serializer>(
    failures: &IndexMap<String, StatsError>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_map(failures.iter().map(|(name, err)| (name, err.to_string())))
}

/// Count, missing, unique, mean, std, min, median and max (numeric) or
/// count, missing, unique and top value (categorical) for a single column
pub fn calculate_statistics(column: &Column) -> ColumnSummary {
    match column.data() {
        ColumnData::Numeric(cells) => {
            let values: Vec<f64> = cells.iter().flatten().copied().collect();
            let moments = Moments::from_values(values.iter().copied());
            let distinct: AHashSet<u64> = values.iter().map(|v| v.to_bits()).collect();
            ColumnSummary::Numeric(NumericSummary {
                count: moments.count(),
                missing_count: cells.len() - moments.count(),
                unique_count: distinct.len(),
                mean: moments.mean(),
                std: moments.std_dev(),
                min: moments.min(),
                median: quantile_sorted(&sorted(&values), 0.5),
                max: moments.max(),
            })
        }
        ColumnData::Categorical(cells) => {
            // Insertion order keeps the first-seen value ahead on ties
            let mut frequencies: IndexMap<&str, usize> = IndexMap::new();
            for value in cells.iter().flatten() {
                *frequencies.entry(value.as_str()).or_insert(0) += 1;
            }

            let mut top: Option<(&str, usize)> = None;
            for (&value, &frequency) in &frequencies {
                if top.map_or(true, |(_, best)| frequency > best) {
                    top = Some((value, frequency));
                }
            }

            let count = frequencies.values().sum::<usize>();
            ColumnSummary::Categorical(CategoricalSummary {
                count,
                missing_count: cells.len() - count,
                unique_count: frequencies.len(),
                top_value: top.map(|(value, _)| value.to_string()),
                top_frequency: top.map_or(0, |(_, frequency)| frequency),
            })
        }
    }
}

/// Summarize every column of the dataset that matches `style`
pub fn compute_summary(dataset: &Dataset, style: SummaryStyle) -> Result<DatasetSummary, StatsError> {
    StatsError::check_not_empty(dataset)?;

    let columns: IndexMap<String, ColumnSummary> = dataset
        .columns()
        .iter()
        .filter(|column| style.includes(column.kind()))
        .map(|column| (column.name().to_string(), calculate_statistics(column)))
        .collect();

    debug!("Summarized {} of {} columns ({:?})", columns.len(), dataset.column_count(), style);

    Ok(DatasetSummary {
        style,
        row_count: dataset.row_count(),
        columns,
        failures: IndexMap::new(),
    })
}

/// Summarize the named columns that match `style`.
///
/// Unknown names are reported in [`DatasetSummary::failures`] without
/// affecting the other columns.
pub fn compute_summary_for(
    dataset: &Dataset,
    style: SummaryStyle,
    names: &[&str],
) -> Result<DatasetSummary, StatsError> {
    StatsError::check_not_empty(dataset)?;

    let mut columns = IndexMap::new();
    let mut failures = IndexMap::new();

    for &name in names {
        match dataset.column(name) {
            Some(column) if style.includes(column.kind()) => {
                columns.insert(name.to_string(), calculate_statistics(column));
            }
            Some(column) => {
                debug!("Skipping {} column '{}' for {:?} summary", column.kind(), name, style);
            }
            None => {
                failures.insert(name.to_string(), StatsError::column_not_found(name, dataset));
            }
        }
    }

    Ok(DatasetSummary {
        style,
        row_count: dataset.row_count(),
        columns,
        failures,
    })
}
