//! Column-oriented dataset with a fixed kind per column
//!
//! A [`Dataset`] is an ordered list of uniquely named [`Column`]s that all
//! share one row count. Each column is classified once, when it is built,
//! as either numeric or categorical; missing cells are `None`.

mod record_batch;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::LoadConfig;
use crate::schema::{parse_numeric, SchemaDetector};
use crate::DataError;

/// Kind of values held by a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

impl std::fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnKind::Numeric => write!(f, "numeric"),
            ColumnKind::Categorical => write!(f, "categorical"),
        }
    }
}

/// Cell storage for a column
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<Option<f64>>),
    Categorical(Vec<Option<String>>),
}

/// A named column of a single kind
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    data: ColumnData,
}

impl Column {
    /// Create a numeric column; non-finite values are stored as missing
    pub fn numeric(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        let values = values
            .into_iter()
            .map(|v| v.filter(|x| x.is_finite()))
            .collect();
        Self {
            name: name.into(),
            data: ColumnData::Numeric(values),
        }
    }

    /// Create a numeric column without missing cells (NaN still counts as missing)
    pub fn from_f64(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self::numeric(name, values.into_iter().map(Some).collect())
    }

    /// Create a categorical column
    pub fn categorical(name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Categorical(values),
        }
    }

    /// Create a categorical column from string slices without missing cells
    pub fn from_strs(name: impl Into<String>, values: &[&str]) -> Self {
        Self::categorical(name, values.iter().map(|v| Some(v.to_string())).collect())
    }

    /// Build a numeric column from already null-filtered text cells.
    ///
    /// Entries that do not coerce to a number are treated as missing. Fails
    /// when the column has present entries but none of them coerce.
    pub fn from_text_numeric(name: impl Into<String>, cells: &[Option<String>]) -> Result<Self, DataError> {
        let name = name.into();
        let mut present = 0;
        let mut dropped = 0;
        let values: Vec<Option<f64>> = cells
            .iter()
            .map(|cell| {
                let raw = cell.as_deref()?;
                present += 1;
                let parsed = parse_numeric(raw);
                if parsed.is_none() {
                    dropped += 1;
                }
                parsed
            })
            .collect();

        if present > 0 && dropped == present {
            return Err(DataError::InvalidColumn {
                column: name,
                reason: format!("declared numeric but none of its {present} values are numbers"),
            });
        }
        if dropped > 0 {
            warn!("Column '{}': {} non-numeric entries treated as missing", name, dropped);
        }

        Ok(Self {
            name,
            data: ColumnData::Numeric(values),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    pub fn kind(&self) -> ColumnKind {
        match self.data {
            ColumnData::Numeric(_) => ColumnKind::Numeric,
            ColumnData::Categorical(_) => ColumnKind::Categorical,
        }
    }

    pub fn is_numeric(&self) -> bool {
        self.kind() == ColumnKind::Numeric
    }

    /// Total number of rows, missing included
    pub fn len(&self) -> usize {
        match &self.data {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Categorical(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the cell at `row` is missing
    pub fn is_missing(&self, row: usize) -> bool {
        match &self.data {
            ColumnData::Numeric(v) => v.get(row).map_or(true, Option::is_none),
            ColumnData::Categorical(v) => v.get(row).map_or(true, Option::is_none),
        }
    }

    /// Number of missing cells
    pub fn missing_count(&self) -> usize {
        self.len() - self.valid_count()
    }

    /// Number of non-missing cells
    pub fn valid_count(&self) -> usize {
        match &self.data {
            ColumnData::Numeric(v) => v.iter().filter(|c| c.is_some()).count(),
            ColumnData::Categorical(v) => v.iter().filter(|c| c.is_some()).count(),
        }
    }

    /// Numeric cells, or `None` for a categorical column
    pub fn as_numeric(&self) -> Option<&[Option<f64>]> {
        match &self.data {
            ColumnData::Numeric(v) => Some(v),
            ColumnData::Categorical(_) => None,
        }
    }

    /// Categorical cells, or `None` for a numeric column
    pub fn as_categorical(&self) -> Option<&[Option<String>]> {
        match &self.data {
            ColumnData::Numeric(_) => None,
            ColumnData::Categorical(v) => Some(v),
        }
    }

    /// Non-missing numeric values in row order; empty for categorical columns
    pub fn numeric_values(&self) -> Vec<f64> {
        self.as_numeric()
            .map(|cells| cells.iter().flatten().copied().collect())
            .unwrap_or_default()
    }
}

/// An ordered set of uniquely named columns sharing one row count
#[derive(Debug, Clone)]
pub struct Dataset {
    columns: Vec<Column>,
    index: AHashMap<String, usize>,
    row_count: usize,
}

impl Dataset {
    /// Create a dataset, checking name uniqueness and uniform row count
    pub fn new(columns: Vec<Column>) -> Result<Self, DataError> {
        let row_count = columns.first().map_or(0, Column::len);
        let mut index = AHashMap::with_capacity(columns.len());

        for (position, column) in columns.iter().enumerate() {
            if column.len() != row_count {
                return Err(DataError::RowCountMismatch {
                    column: column.name.clone(),
                    expected: row_count,
                    actual: column.len(),
                });
            }
            if index.insert(column.name.clone(), position).is_some() {
                return Err(DataError::DuplicateColumn(column.name.clone()));
            }
        }

        Ok(Self {
            columns,
            index,
            row_count,
        })
    }

    /// Build a dataset from raw text rows, classifying every column once
    pub fn from_text_columns(
        headers: &[String],
        rows: &[Vec<String>],
        config: &LoadConfig,
    ) -> Result<Self, DataError> {
        if let Some(missing) = config
            .selected_columns
            .iter()
            .find(|name| !headers.contains(name))
        {
            return Err(DataError::InvalidColumn {
                column: missing.clone(),
                reason: "selected column not present in header".to_string(),
            });
        }

        let schema = SchemaDetector::new()
            .with_sample_size(config.sample_size)
            .with_null_config(config.null_config.clone())
            .detect_from_samples(headers, rows);

        let mut columns = Vec::new();
        for (col_idx, detected) in schema.columns.iter().enumerate() {
            if !config.is_selected(&detected.name) {
                continue;
            }

            let cells: Vec<Option<String>> = rows
                .iter()
                .map(|row| row.get(col_idx).and_then(|v| config.null_config.cell(v)))
                .collect();

            let kind = config.column_kind(&detected.name, detected.kind);
            debug!(
                "Column '{}' classified as {} ({} missing, {} distinct in sample)",
                detected.name, kind, detected.null_count, detected.distinct_count
            );

            let column = match kind {
                ColumnKind::Numeric => Column::from_text_numeric(detected.name.clone(), &cells)?,
                ColumnKind::Categorical => Column::categorical(detected.name.clone(), cells),
            };
            columns.push(column);
        }

        Self::new(columns)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.index.get(name).map(|&idx| &self.columns[idx])
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// True when there are no rows or no columns
    pub fn is_empty(&self) -> bool {
        self.row_count == 0 || self.columns.is_empty()
    }

    pub fn numeric_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.kind() == ColumnKind::Numeric)
    }

    pub fn categorical_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.kind() == ColumnKind::Categorical)
    }

    /// New dataset with only the named columns, in the requested order
    pub fn select(&self, names: &[&str]) -> Result<Self, DataError> {
        let columns = names
            .iter()
            .map(|name| {
                self.column(name)
                    .cloned()
                    .ok_or_else(|| DataError::InvalidColumn {
                        column: name.to_string(),
                        reason: "column not found".to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(columns)
    }

    /// New dataset without the columns whose missing ratio exceeds `threshold`
    pub fn drop_sparse_columns(&self, threshold: f64) -> Self {
        if self.row_count == 0 {
            return self.clone();
        }

        let (kept, dropped): (Vec<&Column>, Vec<&Column>) = self
            .columns
            .iter()
            .partition(|c| c.missing_count() as f64 / self.row_count as f64 <= threshold);

        if !dropped.is_empty() {
            info!(
                "Dropping {} sparse columns: {:?}",
                dropped.len(),
                dropped.iter().map(|c| c.name()).collect::<Vec<_>>()
            );
        }

        let columns: Vec<Column> = kept.into_iter().cloned().collect();
        let index = columns
            .iter()
            .enumerate()
            .map(|(idx, c)| (c.name.clone(), idx))
            .collect();
        Self {
            columns,
            index,
            row_count: self.row_count,
        }
    }
}
