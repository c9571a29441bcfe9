//! Dataset-level data quality overview

use std::fmt;

use ahash::AHashSet;
use indexmap::IndexMap;
use serde::Serialize;

use pe_data::{ColumnData, Dataset};

use crate::format::format_percentage;
use crate::StatsError;

/// Shape, missing values and duplicate rows of a dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataQualityReport {
    pub rows: usize,
    pub columns: usize,
    pub numeric_columns: usize,
    pub categorical_columns: usize,
    pub total_missing: usize,
    /// Only columns with at least one missing value, in dataset order
    pub missing_by_column: IndexMap<String, usize>,
    /// Rows identical to an earlier row
    pub duplicate_rows: usize,
}

/// Hashable form of one cell; numbers compare by bit pattern
#[derive(Hash, PartialEq, Eq)]
enum CellKey<'a> {
    Missing,
    Number(u64),
    Text(&'a str),
}

impl DataQualityReport {
    pub fn from_dataset(dataset: &Dataset) -> Result<Self, StatsError> {
        StatsError::check_not_empty(dataset)?;

        let missing_by_column: IndexMap<String, usize> = dataset
            .columns()
            .iter()
            .map(|c| (c.name().to_string(), c.missing_count()))
            .filter(|(_, missing)| *missing > 0)
            .collect();

        Ok(Self {
            rows: dataset.row_count(),
            columns: dataset.column_count(),
            numeric_columns: dataset.numeric_columns().count(),
            categorical_columns: dataset.categorical_columns().count(),
            total_missing: missing_by_column.values().sum(),
            missing_by_column,
            duplicate_rows: count_duplicate_rows(dataset),
        })
    }

    /// Share of all cells that are missing
    pub fn missing_ratio(&self) -> f64 {
        let cells = self.rows * self.columns;
        if cells == 0 {
            0.0
        } else {
            self.total_missing as f64 / cells as f64
        }
    }
}

fn count_duplicate_rows(dataset: &Dataset) -> usize {
    let mut seen = AHashSet::with_capacity(dataset.row_count());
    let mut duplicates = 0;

    for row in 0..dataset.row_count() {
        let key: Vec<CellKey<'_>> = dataset
            .columns()
            .iter()
            .map(|column| match column.data() {
                ColumnData::Numeric(values) => values[row].map_or(CellKey::Missing, |v| CellKey::Number(v.to_bits())),
                ColumnData::Categorical(values) => values[row].as_deref().map_or(CellKey::Missing, CellKey::Text),
            })
            .collect();
        if !seen.insert(key) {
            duplicates += 1;
        }
    }
    duplicates
}

impl fmt::Display for DataQualityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Data Quality Report")?;
        writeln!(
            f,
            "  Shape: {} rows x {} columns ({} numeric, {} categorical)",
            self.rows, self.columns, self.numeric_columns, self.categorical_columns
        )?;
        writeln!(
            f,
            "  Missing values: {} ({})",
            self.total_missing,
            format_percentage(self.missing_ratio(), 1)
        )?;
        for (column, missing) in &self.missing_by_column {
            let ratio = *missing as f64 / self.rows as f64;
            writeln!(f, "    {column}: {missing} ({})", format_percentage(ratio, 1))?;
        }
        write!(f, "  Duplicate rows: {}", self.duplicate_rows)
    }
}
