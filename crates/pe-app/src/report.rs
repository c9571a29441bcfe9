//! One full analysis run over a dataset

use std::fmt;

use anyhow::Result;
use indexmap::IndexMap;
use serde::Serialize;
use tracing::{info, warn};

use pe_data::Dataset;
use pe_stats::format::{format_number, format_optional, format_percentage};
use pe_stats::{
    compute_summary, describe_by_group, detect_outliers_iqr, find_correlated_pairs, AnalysisConfig, CorrelationMethod,
    CorrelationPair, DataQualityReport, DatasetSummary, Description, ModelComparison, OutlierReport, SummaryTable,
};

/// IQR result for one numeric column, or why it was skipped
#[derive(Debug, Clone, Serialize)]
pub struct ColumnOutliers {
    pub column: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<OutlierReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<String>,
}

/// One numeric column described per group of a categorical column
#[derive(Debug, Clone, Serialize)]
pub struct GroupComparison {
    pub column: String,
    pub group_by: String,
    pub groups: IndexMap<String, Description>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub quality: DataQualityReport,
    pub summary: DatasetSummary,
    pub outliers: Vec<ColumnOutliers>,
    pub correlation_method: CorrelationMethod,
    pub correlation_threshold: f64,
    pub correlations: Vec<CorrelationPair>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groups: Option<GroupComparison>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub models: Option<ModelComparison>,
}

impl Report {
    pub fn analyze(dataset: &Dataset, config: &AnalysisConfig) -> Result<Self> {
        let quality = DataQualityReport::from_dataset(dataset)?;
        let summary = compute_summary(dataset, config.style)?;

        let outliers = dataset
            .numeric_columns()
            .map(|column| match detect_outliers_iqr(column, config.iqr_multiplier) {
                Ok(report) => ColumnOutliers {
                    column: column.name().to_string(),
                    report: Some(report),
                    skipped: None,
                },
                Err(e) => {
                    warn!("Skipping outlier detection for '{}': {}", column.name(), e);
                    ColumnOutliers {
                        column: column.name().to_string(),
                        report: None,
                        skipped: Some(e.to_string()),
                    }
                }
            })
            .collect();

        let correlations = find_correlated_pairs(dataset, config.correlation_threshold, config.correlation_method)?;
        info!(
            "Analyzed {} rows: {} summarized columns, {} correlated pairs",
            dataset.row_count(),
            summary.len(),
            correlations.len()
        );

        Ok(Self {
            quality,
            summary,
            outliers,
            correlation_method: config.correlation_method,
            correlation_threshold: config.correlation_threshold,
            correlations,
            groups: None,
            models: None,
        })
    }

    pub fn with_groups(mut self, dataset: &Dataset, column: &str, group_by: &str) -> Result<Self> {
        let groups = describe_by_group(dataset, column, group_by)?;
        info!("Compared '{}' across {} groups of '{}'", column, groups.len(), group_by);
        self.groups = Some(GroupComparison {
            column: column.to_string(),
            group_by: group_by.to_string(),
            groups,
        });
        Ok(self)
    }

    pub fn with_models(mut self, models: ModelComparison) -> Self {
        self.models = Some(models);
        self
    }

    pub fn table(&self) -> SummaryTable {
        SummaryTable::from_summary(&self.summary)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}\n", self.quality)?;
        writeln!(f, "Summary ({:?})", self.summary.style)?;
        writeln!(f, "{}\n", self.table())?;

        writeln!(f, "Outliers (IQR)")?;
        for entry in &self.outliers {
            match (&entry.report, &entry.skipped) {
                (Some(report), _) => writeln!(
                    f,
                    "  {}: {} of {} ({}), fences [{}, {}]",
                    entry.column,
                    report.count(),
                    report.observations,
                    format_percentage(report.ratio(), 1),
                    format_number(report.lower_fence, 2),
                    format_number(report.upper_fence, 2),
                )?,
                (None, reason) => writeln!(f, "  {}: N/A ({})", entry.column, reason.as_deref().unwrap_or("skipped"))?,
            }
        }

        writeln!(
            f,
            "\nCorrelated pairs ({:?}, |r| >= {})",
            self.correlation_method, self.correlation_threshold
        )?;
        if self.correlations.is_empty() {
            writeln!(f, "  none")?;
        }
        for pair in &self.correlations {
            writeln!(
                f,
                "  {} ~ {}: {} (n = {})",
                pair.first,
                pair.second,
                format_number(pair.coefficient, 3),
                pair.observations
            )?;
        }

        if let Some(comparison) = &self.groups {
            writeln!(f, "\n{} by {}", comparison.column, comparison.group_by)?;
            for (group, d) in &comparison.groups {
                writeln!(
                    f,
                    "  {}: n = {}, mean {}, std {}, min {}, median {}, max {}",
                    group,
                    d.count,
                    format_number(d.mean, 2),
                    format_optional(d.std, 2),
                    format_number(d.min, 2),
                    format_number(d.median, 2),
                    format_number(d.max, 2),
                )?;
            }
        }

        if let Some(models) = &self.models {
            writeln!(f, "\nModel comparison\n{models}")?;
            for metric in models.metrics() {
                if let Ok(best) = models.best_model(metric) {
                    writeln!(f, "  best {metric}: {best}")?;
                }
            }
        }
        Ok(())
    }
}
