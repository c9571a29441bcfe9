//! Demo mode for plotease
//! Creates a seeded synthetic dataset and model scores to showcase the engine

use std::sync::Arc;

use anyhow::Result;
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use pe_data::Dataset;
use pe_stats::ModelComparison;

pub const DEFAULT_ROWS: usize = 100;
const SEED: u64 = 42;

const DEPARTMENTS: [&str; 4] = ["Sales", "Engineering", "Marketing", "HR"];
const PERFORMANCE: [&str; 3] = ["Low", "Medium", "High"];
const PREDICTIONS: usize = 50;
const MODELS: [&str; 5] = ["Random Forest", "XGBoost", "Logistic Regression", "SVM", "Neural Network"];

/// Employee-style sample data as an Arrow batch
pub fn sample_batch(rows: usize) -> Result<RecordBatch> {
    let mut rng = StdRng::seed_from_u64(SEED);

    let schema = Arc::new(Schema::new(vec![
        Field::new("age", DataType::Int64, false),
        Field::new("salary", DataType::Int64, false),
        Field::new("experience", DataType::Int64, false),
        Field::new("department", DataType::Utf8, false),
        Field::new("performance", DataType::Utf8, false),
        Field::new("satisfaction", DataType::Float64, false),
    ]));

    let mut age = Vec::with_capacity(rows);
    let mut salary = Vec::with_capacity(rows);
    let mut experience = Vec::with_capacity(rows);
    let mut department = Vec::with_capacity(rows);
    let mut performance = Vec::with_capacity(rows);
    let mut satisfaction = Vec::with_capacity(rows);

    for _ in 0..rows {
        age.push(rng.gen_range(20..70i64));
        salary.push(rng.gen_range(30_000..150_000i64));
        experience.push(rng.gen_range(0..30i64));
        department.push(DEPARTMENTS[rng.gen_range(0..DEPARTMENTS.len())]);
        performance.push(PERFORMANCE[rng.gen_range(0..PERFORMANCE.len())]);
        satisfaction.push(rng.gen_range(1.0..10.0f64));
    }

    let arrays: Vec<ArrayRef> = vec![
        Arc::new(Int64Array::from(age)),
        Arc::new(Int64Array::from(salary)),
        Arc::new(Int64Array::from(experience)),
        Arc::new(StringArray::from(department)),
        Arc::new(StringArray::from(performance)),
        Arc::new(Float64Array::from(satisfaction)),
    ];

    Ok(RecordBatch::try_new(schema, arrays)?)
}

pub fn sample_dataset(rows: usize) -> Result<Dataset> {
    Ok(Dataset::from_record_batch(&sample_batch(rows)?)?)
}

/// Accuracy, precision, recall and F1 for up to five models, clamped to
/// [0, 1], plus R2 of noisy predictions whose noise shrinks as accuracy grows
pub fn sample_models(count: usize) -> Result<ModelComparison> {
    let mut rng = StdRng::seed_from_u64(SEED);
    let mut comparison = ModelComparison::new();
    let observed: Vec<f64> = (0..PREDICTIONS).map(|_| rng.gen_range(0.0..100.0f64)).collect();

    for name in MODELS.iter().take(count) {
        let base: f64 = rng.gen_range(0.70..0.95);
        let scores = [
            ("Accuracy", base),
            ("Precision", base + rng.gen_range(-0.05..0.05)),
            ("Recall", base + rng.gen_range(-0.05..0.05)),
            ("F1-Score", base + rng.gen_range(-0.03..0.03)),
        ];
        comparison.add_model(*name, scores.map(|(metric, score)| (metric, score.clamp(0.0, 1.0))));

        let spread = (1.0 - base) * 50.0;
        let predicted: Vec<f64> = observed.iter().map(|y| y + rng.gen_range(-spread..spread)).collect();
        comparison.add_predictions(name, &observed, &predicted)?;
    }
    Ok(comparison)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pe_data::ColumnKind;

    #[test]
    fn test_sample_dataset_shape() {
        let dataset = sample_dataset(50).unwrap();
        assert_eq!(dataset.row_count(), 50);
        assert_eq!(dataset.column_names(), vec!["age", "salary", "experience", "department", "performance", "satisfaction"]);
        assert_eq!(dataset.column("department").unwrap().kind(), ColumnKind::Categorical);
        assert_eq!(dataset.numeric_columns().count(), 4);
    }

    #[test]
    fn test_sample_is_deterministic() {
        let a = sample_dataset(20).unwrap();
        let b = sample_dataset(20).unwrap();
        assert_eq!(a.column("salary").unwrap().numeric_values(), b.column("salary").unwrap().numeric_values());
    }

    #[test]
    fn test_sample_ranges() {
        let dataset = sample_dataset(200).unwrap();
        let age = dataset.column("age").unwrap().numeric_values();
        assert!(age.iter().all(|v| (20.0..70.0).contains(v)));
        let satisfaction = dataset.column("satisfaction").unwrap().numeric_values();
        assert!(satisfaction.iter().all(|v| (1.0..10.0).contains(v)));
    }

    #[test]
    fn test_sample_models() {
        let models = sample_models(3).unwrap();
        assert_eq!(models.len(), 3);
        assert_eq!(models.metrics(), vec!["Accuracy", "Precision", "Recall", "F1-Score", "R2"]);
        assert!(models.best_model("Accuracy").is_ok());
        for name in models.model_names() {
            let r2 = models.scores(name).unwrap()["R2"];
            assert!(r2 > 0.5 && r2 <= 1.0, "{name}: R2 = {r2}");
        }
        assert_eq!(sample_models(10).unwrap().len(), MODELS.len());
    }
}
