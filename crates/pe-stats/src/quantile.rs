//! Order statistics and running moments

/// Sort a copy of the values in ascending order
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

/// Quantile of already sorted values using linear interpolation between
/// the closest ranks (`pos = (n - 1) * p`)
pub fn quantile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=1.0).contains(&p) {
        return None;
    }
    let idx = (sorted.len() - 1) as f64 * p;
    Some(interpolate(sorted, idx))
}

/// Calculate quartiles (Q1, median, Q3) using linear interpolation
pub fn quartiles(values: &[f64]) -> Option<(f64, f64, f64)> {
    let sorted = sorted(values);
    Some((
        quantile_sorted(&sorted, 0.25)?,
        quantile_sorted(&sorted, 0.5)?,
        quantile_sorted(&sorted, 0.75)?,
    ))
}

fn interpolate(sorted: &[f64], idx: f64) -> f64 {
    let lower = idx.floor() as usize;
    let upper = idx.ceil() as usize;

    if lower == upper || upper >= sorted.len() {
        sorted[lower]
    } else {
        let fraction = idx - lower as f64;
        sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
    }
}

/// Single-pass count, mean, spread and range (Welford's update)
#[derive(Debug, Clone, Copy, Default)]
pub struct Moments {
    count: usize,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl Moments {
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Self {
        let mut moments = Self::default();
        for value in values {
            moments.push(value);
        }
        moments
    }

    pub fn push(&mut self, value: f64) {
        if self.count == 0 {
            self.min = value;
            self.max = value;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Running mean, kept inside the observed range against rounding drift
    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.mean.clamp(self.min, self.max))
    }

    /// Sample variance (n - 1 denominator)
    pub fn variance(&self) -> Option<f64> {
        (self.count > 1).then(|| (self.m2 / (self.count - 1) as f64).max(0.0))
    }

    /// Sample standard deviation (n - 1 denominator)
    pub fn std_dev(&self) -> Option<f64> {
        self.variance().map(f64::sqrt)
    }

    pub fn min(&self) -> Option<f64> {
        (self.count > 0).then_some(self.min)
    }

    pub fn max(&self) -> Option<f64> {
        (self.count > 0).then_some(self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quartiles_linear_interpolation() {
        let (q1, median, q3) = quartiles(&[100.0, 1.0, 5.0, 2.0, 4.0, 3.0]).unwrap();
        assert!((q1 - 2.25).abs() < 1e-12);
        assert!((median - 3.5).abs() < 1e-12);
        assert!((q3 - 4.75).abs() < 1e-12);
    }

    #[test]
    fn test_quantile_bounds() {
        let sorted = sorted(&[3.0, 1.0, 2.0]);
        assert_eq!(quantile_sorted(&sorted, 0.0), Some(1.0));
        assert_eq!(quantile_sorted(&sorted, 1.0), Some(3.0));
        assert_eq!(quantile_sorted(&sorted, 1.5), None);
        assert_eq!(quantile_sorted(&[], 0.5), None);
    }

    #[test]
    fn test_moments() {
        let moments = Moments::from_values([2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_eq!(moments.count(), 8);
        assert!((moments.mean().unwrap() - 5.0).abs() < 1e-12);
        // Sample variance: 32 / 7
        assert!((moments.variance().unwrap() - 32.0 / 7.0).abs() < 1e-12);
        assert_eq!(moments.min(), Some(2.0));
        assert_eq!(moments.max(), Some(9.0));
    }

    #[test]
    fn test_moments_small_samples() {
        let empty = Moments::default();
        assert_eq!(empty.mean(), None);
        assert_eq!(empty.min(), None);

        let single = Moments::from_values([7.0]);
        assert_eq!(single.mean(), Some(7.0));
        assert_eq!(single.std_dev(), None);
    }
}
