//! Side-by-side comparison of model evaluation scores

use std::cmp::Ordering;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::format::format_number;
use crate::StatsError;

/// Metric name used by [`ModelComparison::add_predictions`]
pub const R_SQUARED: &str = "R2";

/// Coefficient of determination, `1 - SS_res / SS_tot`
pub fn r_squared(observed: &[f64], predicted: &[f64]) -> Result<f64, StatsError> {
    if observed.len() != predicted.len() {
        return Err(StatsError::InvalidParameter(format!(
            "{} observed values but {} predictions",
            observed.len(),
            predicted.len()
        )));
    }
    if observed.len() < 2 {
        return Err(StatsError::InsufficientData {
            required: 2,
            actual: observed.len(),
        });
    }
    if observed.iter().all(|v| *v == observed[0]) {
        return Err(StatsError::InvalidParameter(
            "R2 is undefined for constant observed values".to_string(),
        ));
    }

    let mean = observed.iter().sum::<f64>() / observed.len() as f64;
    let (mut ss_res, mut ss_tot) = (0.0, 0.0);
    for (y, p) in observed.iter().zip(predicted) {
        ss_res += (y - p) * (y - p);
        ss_tot += (y - mean) * (y - mean);
    }
    Ok(1.0 - ss_res / ss_tot)
}

/// Scores per model per metric, kept in insertion order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelComparison {
    models: IndexMap<String, IndexMap<String, f64>>,
}

impl ModelComparison {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the scores of a model
    pub fn add_model<I, K>(&mut self, name: impl Into<String>, scores: I)
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        let scores = scores.into_iter().map(|(k, v)| (k.into(), v)).collect();
        self.models.insert(name.into(), scores);
    }

    pub fn remove_model(&mut self, name: &str) -> Result<IndexMap<String, f64>, StatsError> {
        self.models
            .shift_remove(name)
            .ok_or_else(|| StatsError::UnknownModel(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn model_names(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    pub fn scores(&self, model: &str) -> Option<&IndexMap<String, f64>> {
        self.models.get(model)
    }

    /// Score a model's predictions against the observed values and record
    /// the result under the `R2` metric
    pub fn add_predictions(&mut self, name: &str, observed: &[f64], predicted: &[f64]) -> Result<f64, StatsError> {
        let r2 = r_squared(observed, predicted)?;
        self.models.entry(name.to_string()).or_default().insert(R_SQUARED.to_string(), r2);
        Ok(r2)
    }

    /// Every metric reported by any model, in first-seen order
    pub fn metrics(&self) -> Vec<&str> {
        let mut metrics: Vec<&str> = Vec::new();
        for scores in self.models.values() {
            for metric in scores.keys() {
                if !metrics.contains(&metric.as_str()) {
                    metrics.push(metric);
                }
            }
        }
        metrics
    }

    fn unknown_metric(&self, metric: &str) -> StatsError {
        StatsError::UnknownMetric {
            metric: metric.to_string(),
            available: self.metrics().into_iter().map(String::from).collect(),
        }
    }

    /// Model with the highest score; the first model added wins ties
    pub fn best_model(&self, metric: &str) -> Result<&str, StatsError> {
        self.ranking(metric, false)?
            .first()
            .map(|(name, _)| *name)
            .ok_or_else(|| self.unknown_metric(metric))
    }

    /// Models reporting `metric`, best first unless `ascending`
    pub fn ranking(&self, metric: &str, ascending: bool) -> Result<Vec<(&str, f64)>, StatsError> {
        let mut ranked: Vec<(&str, f64)> = self
            .models
            .iter()
            .filter_map(|(name, scores)| scores.get(metric).map(|v| (name.as_str(), *v)))
            .collect();
        if ranked.is_empty() {
            return Err(self.unknown_metric(metric));
        }

        // Stable sort keeps insertion order among equal scores
        if ascending {
            ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
        } else {
            ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        }
        Ok(ranked)
    }

    /// Mean of one model's scores
    pub fn mean_score(&self, model: &str) -> Result<f64, StatsError> {
        let scores = self
            .models
            .get(model)
            .ok_or_else(|| StatsError::UnknownModel(model.to_string()))?;
        if scores.is_empty() {
            return Err(StatsError::InsufficientData { required: 1, actual: 0 });
        }
        Ok(scores.values().sum::<f64>() / scores.len() as f64)
    }

    /// Mean of every score of every model
    pub fn overall_mean(&self) -> Option<f64> {
        let (sum, count) = self
            .models
            .values()
            .flat_map(|scores| scores.values())
            .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
        (count > 0).then(|| sum / count as f64)
    }
}

impl PartialOrd for ModelComparison {
    /// Comparisons order by overall mean score
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.overall_mean()?.partial_cmp(&other.overall_mean()?)
    }
}

impl fmt::Display for ModelComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let metrics = self.metrics();
        let name_width = self.model_names().map(str::len).max().unwrap_or(0).max("Model".len());

        write!(f, "{:<name_width$}", "Model")?;
        for metric in &metrics {
            write!(f, "  {:>10}", metric)?;
        }
        for (name, scores) in &self.models {
            write!(f, "\n{:<name_width$}", name)?;
            for metric in &metrics {
                let cell = scores.get(*metric).map_or_else(|| "N/A".to_string(), |v| format_number(*v, 4));
                write!(f, "  {:>10}", cell)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comparison() -> ModelComparison {
        let mut comparison = ModelComparison::new();
        comparison.add_model("forest", [("accuracy", 0.91), ("f1", 0.88)]);
        comparison.add_model("logistic", [("accuracy", 0.85), ("f1", 0.88), ("auc", 0.9)]);
        comparison.add_model("tree", [("accuracy", 0.80)]);
        comparison
    }

    #[test]
    fn test_best_model() {
        let comparison = comparison();
        assert_eq!(comparison.best_model("accuracy").unwrap(), "forest");
        assert_eq!(comparison.best_model("auc").unwrap(), "logistic");
        // Tie goes to the first model added
        assert_eq!(comparison.best_model("f1").unwrap(), "forest");
    }

    #[test]
    fn test_unknown_metric_lists_available() {
        let err = comparison().best_model("recall").unwrap_err();
        assert_eq!(
            err,
            StatsError::UnknownMetric {
                metric: "recall".to_string(),
                available: vec!["accuracy".to_string(), "f1".to_string(), "auc".to_string()],
            }
        );
    }

    #[test]
    fn test_ranking() {
        let comparison = comparison();
        let ascending: Vec<&str> = comparison
            .ranking("accuracy", true)
            .unwrap()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(ascending, vec!["tree", "logistic", "forest"]);
    }

    #[test]
    fn test_remove_and_means() {
        let mut comparison = comparison();
        assert!((comparison.mean_score("forest").unwrap() - 0.895).abs() < 1e-12);
        assert!(comparison.remove_model("tree").is_ok());
        assert!(!comparison.contains("tree"));
        assert_eq!(comparison.remove_model("tree"), Err(StatsError::UnknownModel("tree".to_string())));
        assert_eq!(comparison.len(), 2);

        let overall = comparison.overall_mean().unwrap();
        assert!((overall - (0.91 + 0.88 + 0.85 + 0.88 + 0.9) / 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_ordering_by_overall_mean() {
        let mut strong = ModelComparison::new();
        strong.add_model("a", [("accuracy", 0.9)]);
        let mut weak = ModelComparison::new();
        weak.add_model("b", [("accuracy", 0.6)]);

        assert!(strong > weak);
        assert!(ModelComparison::new().partial_cmp(&strong).is_none());
    }

    #[test]
    fn test_r_squared() {
        let observed = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(r_squared(&observed, &observed).unwrap(), 1.0);
        // Predicting the mean explains nothing
        assert_eq!(r_squared(&observed, &[2.5; 4]).unwrap(), 0.0);

        assert!(matches!(r_squared(&observed, &[1.0]), Err(StatsError::InvalidParameter(_))));
        assert_eq!(
            r_squared(&[1.0], &[1.0]),
            Err(StatsError::InsufficientData { required: 2, actual: 1 })
        );
        assert!(matches!(r_squared(&[0.1; 3], &[1.0, 2.0, 3.0]), Err(StatsError::InvalidParameter(_))));
    }

    #[test]
    fn test_add_predictions_extends_scores() {
        let mut comparison = comparison();
        let r2 = comparison.add_predictions("tree", &[1.0, 2.0, 3.0], &[1.0, 2.0, 4.0]).unwrap();
        assert!((r2 - 0.5).abs() < 1e-12);
        assert_eq!(comparison.scores("tree").unwrap().get("accuracy"), Some(&0.80));
        assert_eq!(comparison.best_model(R_SQUARED).unwrap(), "tree");

        comparison.add_predictions("fresh", &[1.0, 2.0], &[1.0, 2.0]).unwrap();
        assert_eq!(comparison.len(), 4);
    }

    #[test]
    fn test_display_marks_missing_scores() {
        let text = comparison().to_string();
        assert!(text.starts_with("Model"));
        assert!(text.contains("N/A"));
        assert!(text.contains("0.9100"));
    }
}
