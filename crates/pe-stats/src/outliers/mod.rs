//! Outlier detection on numeric columns

use serde::Serialize;
use tracing::debug;

use pe_data::Column;

use crate::quantile::{quantile_sorted, sorted, Moments};
use crate::StatsError;

/// Minimum non-missing values for the IQR rule
pub const MIN_IQR_VALUES: usize = 4;

/// Result of the interquartile-range rule on one column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutlierReport {
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    pub multiplier: f64,
    pub lower_fence: f64,
    pub upper_fence: f64,
    /// Row indices outside the fences, in row order
    pub indices: Vec<usize>,
    /// Non-missing values examined
    pub observations: usize,
}

impl OutlierReport {
    pub fn count(&self) -> usize {
        self.indices.len()
    }

    /// Share of examined values flagged as outliers
    pub fn ratio(&self) -> f64 {
        if self.observations == 0 {
            0.0
        } else {
            self.indices.len() as f64 / self.observations as f64
        }
    }

    pub fn is_outside(&self, value: f64) -> bool {
        value < self.lower_fence || value > self.upper_fence
    }
}

/// Result of the z-score rule on one column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZScoreReport {
    pub mean: f64,
    pub std: f64,
    pub threshold: f64,
    /// Row indices with |z| above the threshold, in row order
    pub indices: Vec<usize>,
    pub observations: usize,
}

fn numeric_cells(column: &Column) -> Result<&[Option<f64>], StatsError> {
    column
        .as_numeric()
        .ok_or_else(|| StatsError::not_numeric(column.name()))
}

fn check_factor(name: &str, value: f64) -> Result<(), StatsError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(StatsError::InvalidParameter(format!("{name} must be a non-negative number, got {value}")))
    }
}

/// Flag values outside `[Q1 - multiplier * IQR, Q3 + multiplier * IQR]`.
///
/// Quartiles use linear interpolation over the sorted non-missing values.
/// A constant column collapses both fences onto its value.
pub fn detect_outliers_iqr(column: &Column, multiplier: f64) -> Result<OutlierReport, StatsError> {
    check_factor("multiplier", multiplier)?;
    let cells = numeric_cells(column)?;

    let values: Vec<f64> = cells.iter().flatten().copied().collect();
    if values.len() < MIN_IQR_VALUES {
        return Err(StatsError::InsufficientData {
            required: MIN_IQR_VALUES,
            actual: values.len(),
        });
    }

    let sorted = sorted(&values);
    let (Some(q1), Some(q3)) = (quantile_sorted(&sorted, 0.25), quantile_sorted(&sorted, 0.75)) else {
        return Err(StatsError::InsufficientData {
            required: MIN_IQR_VALUES,
            actual: values.len(),
        });
    };
    let iqr = q3 - q1;
    let lower_fence = q1 - multiplier * iqr;
    let upper_fence = q3 + multiplier * iqr;

    let indices: Vec<usize> = cells
        .iter()
        .enumerate()
        .filter_map(|(row, cell)| cell.map(|v| (row, v)))
        .filter(|&(_, v)| v < lower_fence || v > upper_fence)
        .map(|(row, _)| row)
        .collect();

    debug!(
        "Column '{}': fences [{}, {}], {} outliers",
        column.name(),
        lower_fence,
        upper_fence,
        indices.len()
    );

    Ok(OutlierReport {
        q1,
        q3,
        iqr,
        multiplier,
        lower_fence,
        upper_fence,
        indices,
        observations: values.len(),
    })
}

/// Flag values whose z-score (sample std) exceeds `threshold` in magnitude
pub fn detect_outliers_zscore(column: &Column, threshold: f64) -> Result<ZScoreReport, StatsError> {
    check_factor("threshold", threshold)?;
    let cells = numeric_cells(column)?;

    let moments = Moments::from_values(cells.iter().flatten().copied());
    let (Some(mean), Some(std)) = (moments.mean(), moments.std_dev()) else {
        return Err(StatsError::InsufficientData {
            required: 2,
            actual: moments.count(),
        });
    };

    let indices = if std == 0.0 {
        Vec::new()
    } else {
        cells
            .iter()
            .enumerate()
            .filter_map(|(row, cell)| cell.map(|v| (row, v)))
            .filter(|&(_, v)| ((v - mean) / std).abs() > threshold)
            .map(|(row, _)| row)
            .collect()
    };

    Ok(ZScoreReport {
        mean,
        std,
        threshold,
        indices,
        observations: moments.count(),
    })
}
