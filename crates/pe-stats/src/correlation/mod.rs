//! Pairwise correlation between numeric columns
//!
//! Every pair uses pairwise-complete observations: a row contributes to a
//! pair only when both columns are present in it. Pairs whose coefficient is
//! undefined (fewer than two paired rows, or no spread on either side) are
//! left out rather than reported.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use pe_data::{Column, Dataset};

use crate::StatsError;

/// Correlation coefficient to compute
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrelationMethod {
    #[default]
    Pearson,
    Spearman,
    Kendall,
}

impl FromStr for CorrelationMethod {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pearson" => Ok(CorrelationMethod::Pearson),
            "spearman" => Ok(CorrelationMethod::Spearman),
            "kendall" => Ok(CorrelationMethod::Kendall),
            other => Err(StatsError::InvalidParameter(format!(
                "unknown correlation method '{other}' (expected pearson, spearman or kendall)"
            ))),
        }
    }
}

/// Two numeric columns and their correlation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationPair {
    /// The pair member that comes first in the dataset
    pub first: String,
    pub second: String,
    pub coefficient: f64,
    /// Rows where both columns are present
    pub observations: usize,
}

impl CorrelationPair {
    /// Both names, lexically smaller first
    pub fn lexical_names(&self) -> (&str, &str) {
        let (a, b) = (self.first.as_str(), self.second.as_str());
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }
}

/// Square correlation matrix over the numeric columns of a dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub method: CorrelationMethod,
    pub columns: Vec<String>,
    /// `None` where the coefficient is undefined
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        self.values[i][j]
    }
}

/// Values of the rows where both cells are present
fn paired(x: &[Option<f64>], y: &[Option<f64>]) -> (Vec<f64>, Vec<f64>) {
    x.iter()
        .zip(y)
        .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
        .unzip()
}

/// Every value equals the first. A sum of squared deviations can miss
/// zero by rounding, this check cannot.
fn is_constant(values: &[f64]) -> bool {
    values.iter().all(|v| *v == values[0])
}

/// Pearson product-moment correlation
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len().min(y.len());
    if n < 2 || is_constant(&x[..n]) || is_constant(&y[..n]) {
        return None;
    }

    let mean_x = x[..n].iter().sum::<f64>() / n as f64;
    let mean_y = y[..n].iter().sum::<f64>() / n as f64;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (a, b) in x[..n].iter().zip(&y[..n]) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    let mut denominator = (sxx * syy).sqrt();
    if !denominator.is_finite() || denominator == 0.0 {
        denominator = sxx.sqrt() * syy.sqrt();
    }
    Some((sxy / denominator).clamp(-1.0, 1.0))
}

/// Ranks starting at 1; tied values share their average rank
fn ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }
        let average = (start + end + 1) as f64 / 2.0;
        for &idx in &order[start..end] {
            ranks[idx] = average;
        }
        start = end;
    }
    ranks
}

/// Spearman rank correlation
pub fn spearman(x: &[f64], y: &[f64]) -> Option<f64> {
    pearson(&ranks(x), &ranks(y))
}

/// Kendall tau-b, which accounts for ties in either variable
pub fn kendall(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len().min(y.len());
    if n < 2 {
        return None;
    }

    let (mut concordant, mut discordant) = (0i64, 0i64);
    let (mut ties_x, mut ties_y) = (0i64, 0i64);
    for i in 0..n {
        for j in (i + 1)..n {
            let dx = x[i].total_cmp(&x[j]);
            let dy = y[i].total_cmp(&y[j]);
            match (dx, dy) {
                (Ordering::Equal, Ordering::Equal) => {}
                (Ordering::Equal, _) => ties_x += 1,
                (_, Ordering::Equal) => ties_y += 1,
                _ if dx == dy => concordant += 1,
                _ => discordant += 1,
            }
        }
    }

    let untied_x = (concordant + discordant + ties_y) as f64;
    let untied_y = (concordant + discordant + ties_x) as f64;
    let denominator = (untied_x * untied_y).sqrt();
    if denominator == 0.0 {
        return None;
    }
    Some(((concordant - discordant) as f64 / denominator).clamp(-1.0, 1.0))
}

/// Correlation of two columns over their pairwise-complete rows
pub fn correlate(a: &Column, b: &Column, method: CorrelationMethod) -> Option<(f64, usize)> {
    let (x, y) = paired(a.as_numeric()?, b.as_numeric()?);
    let coefficient = match method {
        CorrelationMethod::Pearson => pearson(&x, &y),
        CorrelationMethod::Spearman => spearman(&x, &y),
        CorrelationMethod::Kendall => kendall(&x, &y),
    }?;
    Some((coefficient, x.len()))
}

/// Pearson pairs with `|r| >= threshold`, strongest first
pub fn find_highly_correlated_pairs(dataset: &Dataset, threshold: f64) -> Result<Vec<CorrelationPair>, StatsError> {
    find_correlated_pairs(dataset, threshold, CorrelationMethod::Pearson)
}

/// Pairs of numeric columns with `|coefficient| >= threshold`.
///
/// Sorted by descending absolute coefficient. Ties compare the pair's two
/// names in lexical order, so the result does not depend on column order.
pub fn find_correlated_pairs(
    dataset: &Dataset,
    threshold: f64,
    method: CorrelationMethod,
) -> Result<Vec<CorrelationPair>, StatsError> {
    if threshold.is_nan() {
        return Err(StatsError::InvalidParameter("threshold must be a number".to_string()));
    }
    StatsError::check_not_empty(dataset)?;

    let numeric: Vec<&Column> = dataset.numeric_columns().collect();
    let mut pairs = Vec::new();

    for (i, a) in numeric.iter().enumerate() {
        for b in &numeric[i + 1..] {
            let Some((coefficient, observations)) = correlate(a, b, method) else {
                debug!("Correlation of '{}' and '{}' is undefined", a.name(), b.name());
                continue;
            };
            if coefficient.abs() >= threshold {
                pairs.push(CorrelationPair {
                    first: a.name().to_string(),
                    second: b.name().to_string(),
                    coefficient,
                    observations,
                });
            }
        }
    }

    pairs.sort_by(|p, q| {
        q.coefficient
            .abs()
            .total_cmp(&p.coefficient.abs())
            .then_with(|| p.lexical_names().cmp(&q.lexical_names()))
    });

    debug!("{} pairs with |{:?}| >= {}", pairs.len(), method, threshold);
    Ok(pairs)
}

/// Correlation matrix over every numeric column
pub fn correlation_matrix(dataset: &Dataset, method: CorrelationMethod) -> Result<CorrelationMatrix, StatsError> {
    StatsError::check_not_empty(dataset)?;

    let numeric: Vec<&Column> = dataset.numeric_columns().collect();
    let n = numeric.len();
    let mut values = vec![vec![None; n]; n];

    for i in 0..n {
        // The diagonal is 1 only when the column has spread
        values[i][i] = correlate(numeric[i], numeric[i], method).map(|_| 1.0);
        for j in (i + 1)..n {
            let coefficient = correlate(numeric[i], numeric[j], method).map(|(r, _)| r);
            values[i][j] = coefficient;
            values[j][i] = coefficient;
        }
    }

    Ok(CorrelationMatrix {
        method,
        columns: numeric.iter().map(|c| c.name().to_string()).collect(),
        values,
    })
}
