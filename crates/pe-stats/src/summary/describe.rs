//! Extended single-column statistics

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use pe_data::{Column, ColumnData, Dataset};

use crate::quantile::{quantile_sorted, sorted, Moments};
use crate::StatsError;

/// Extended statistics of a numeric column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Description {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; absent with fewer than two values
    pub std: Option<f64>,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    /// Adjusted Fisher-Pearson skewness; absent with fewer than three values
    pub skewness: Option<f64>,
    /// Excess kurtosis; absent with fewer than four values
    pub kurtosis: Option<f64>,
}

/// Count, mean, std, quartiles, skewness and kurtosis of a numeric column
pub fn describe(column: &Column) -> Result<Description, StatsError> {
    if !column.is_numeric() {
        return Err(StatsError::not_numeric(column.name()));
    }

    let values = column.numeric_values();
    let moments = Moments::from_values(values.iter().copied());
    let (Some(mean), Some(min), Some(max)) = (moments.mean(), moments.min(), moments.max()) else {
        return Err(StatsError::InsufficientData { required: 1, actual: 0 });
    };

    let sorted = sorted(&values);
    let quantile = |p| quantile_sorted(&sorted, p).unwrap_or(mean);
    let (skewness, kurtosis) = shape(&values, mean);

    Ok(Description {
        count: moments.count(),
        mean,
        std: moments.std_dev(),
        min,
        q1: quantile(0.25),
        median: quantile(0.5),
        q3: quantile(0.75),
        max,
        skewness,
        kurtosis,
    })
}

/// [`describe`] of `column` within each group of the categorical column
/// `group_by`, keyed by group value in lexical order.
///
/// Rows with a missing group are left out, as are groups without a single
/// value of `column`.
pub fn describe_by_group(
    dataset: &Dataset,
    column: &str,
    group_by: &str,
) -> Result<IndexMap<String, Description>, StatsError> {
    let values = dataset
        .column(column)
        .ok_or_else(|| StatsError::column_not_found(column, dataset))?;
    let groups = dataset
        .column(group_by)
        .ok_or_else(|| StatsError::column_not_found(group_by, dataset))?;

    let cells = values.as_numeric().ok_or_else(|| StatsError::not_numeric(column))?;
    let ColumnData::Categorical(labels) = groups.data() else {
        return Err(StatsError::InvalidColumn {
            column: group_by.to_string(),
            reason: "group column must be categorical".to_string(),
        });
    };

    let mut members: IndexMap<&str, Vec<Option<f64>>> = IndexMap::new();
    for (label, cell) in labels.iter().zip(cells) {
        if let Some(label) = label {
            members.entry(label.as_str()).or_default().push(*cell);
        }
    }
    members.sort_keys();

    let mut result = IndexMap::with_capacity(members.len());
    for (label, cells) in members {
        match describe(&Column::numeric(column, cells)) {
            Ok(description) => {
                result.insert(label.to_string(), description);
            }
            Err(StatsError::InsufficientData { .. }) => {
                debug!("Group '{}' has no values of '{}'", label, column);
            }
            Err(e) => return Err(e),
        }
    }
    Ok(result)
}

/// Bias-corrected sample skewness and excess kurtosis
fn shape(values: &[f64], mean: f64) -> (Option<f64>, Option<f64>) {
    let n = values.len() as f64;
    let (mut m2, mut m3, mut m4) = (0.0, 0.0, 0.0);
    for &v in values {
        let d = v - mean;
        let d2 = d * d;
        m2 += d2;
        m3 += d2 * d;
        m4 += d2 * d2;
    }
    m2 /= n;
    m3 /= n;
    m4 /= n;

    // A constant sample has no shape
    let constant = m2 <= f64::EPSILON * mean.abs().max(1.0);

    let skewness = (values.len() >= 3).then(|| {
        if constant {
            0.0
        } else {
            let g1 = m3 / m2.powf(1.5);
            (n * (n - 1.0)).sqrt() / (n - 2.0) * g1
        }
    });

    let kurtosis = (values.len() >= 4).then(|| {
        if constant {
            0.0
        } else {
            let g2 = m4 / (m2 * m2) - 3.0;
            ((n + 1.0) * g2 + 6.0) * (n - 1.0) / ((n - 2.0) * (n - 3.0))
        }
    });

    (skewness, kurtosis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_quartiles() {
        let column = Column::from_f64("v", vec![1.0, 2.0, 3.0, 4.0, 5.0, 100.0]);
        let description = describe(&column).unwrap();
        assert_eq!(description.count, 6);
        assert!((description.q1 - 2.25).abs() < 1e-12);
        assert!((description.median - 3.5).abs() < 1e-12);
        assert!((description.q3 - 4.75).abs() < 1e-12);
        assert_eq!(description.min, 1.0);
        assert_eq!(description.max, 100.0);
        // Long right tail
        assert!(description.skewness.unwrap() > 2.0);
    }

    #[test]
    fn test_symmetric_sample_has_zero_skew() {
        let column = Column::from_f64("v", vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        let description = describe(&column).unwrap();
        assert!(description.skewness.unwrap().abs() < 1e-12);
        // Uniform-like sample is platykurtic: G2 = -1.2 for 1..=5
        assert!((description.kurtosis.unwrap() + 1.2).abs() < 1e-9);
    }

    #[test]
    fn test_small_samples_omit_shape() {
        let column = Column::from_f64("v", vec![1.0, 2.0]);
        let description = describe(&column).unwrap();
        assert!(description.std.is_some());
        assert_eq!(description.skewness, None);
        assert_eq!(description.kurtosis, None);
    }

    fn grouped() -> Dataset {
        Dataset::new(vec![
            Column::numeric("salary", vec![Some(50.0), Some(70.0), Some(40.0), None, Some(60.0), Some(9.0)]),
            Column::categorical(
                "dept",
                vec![
                    Some("Sales".into()),
                    Some("IT".into()),
                    Some("Sales".into()),
                    Some("HR".into()),
                    Some("IT".into()),
                    None,
                ],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_describe_by_group() {
        let groups = describe_by_group(&grouped(), "salary", "dept").unwrap();
        let names: Vec<&str> = groups.keys().map(String::as_str).collect();
        // HR has only a missing salary
        assert_eq!(names, vec!["IT", "Sales"]);

        let it = &groups["IT"];
        assert_eq!(it.count, 2);
        assert_eq!(it.mean, 65.0);
        assert_eq!(it.min, 60.0);
        assert_eq!(it.max, 70.0);

        // The row without a group does not count
        let sales = &groups["Sales"];
        assert_eq!(sales.count, 2);
        assert_eq!(sales.mean, 45.0);
    }

    #[test]
    fn test_describe_by_group_rejects_bad_columns() {
        let data = grouped();
        assert!(matches!(
            describe_by_group(&data, "ghost", "dept"),
            Err(StatsError::InvalidColumn { column, .. }) if column == "ghost"
        ));
        assert!(matches!(
            describe_by_group(&data, "salary", "ghost"),
            Err(StatsError::InvalidColumn { column, .. }) if column == "ghost"
        ));
        assert!(matches!(
            describe_by_group(&data, "salary", "salary"),
            Err(StatsError::InvalidColumn { reason, .. }) if reason.contains("categorical")
        ));
        assert!(matches!(
            describe_by_group(&data, "dept", "dept"),
            Err(StatsError::InvalidColumn { reason, .. }) if reason.contains("not numeric")
        ));
    }

    #[test]
    fn test_describe_rejects_categorical_and_empty() {
        let categorical = Column::from_strs("c", &["a"]);
        assert!(matches!(describe(&categorical), Err(StatsError::InvalidColumn { .. })));

        let empty = Column::numeric("e", vec![None]);
        assert_eq!(
            describe(&empty),
            Err(StatsError::InsufficientData { required: 1, actual: 0 })
        );
    }
}
