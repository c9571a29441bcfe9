//! Command-line arguments

use std::path::PathBuf;

use clap::{ArgGroup, Parser};

use pe_stats::{CorrelationMethod, SummaryStyle};

/// Statistical summaries, outliers and correlations of tabular data.
///
/// `None` fields fall back to the config file.
#[derive(Parser, Debug, Clone, Default, PartialEq)]
#[command(
    name = "plotease",
    version,
    long_about = None,
    after_help = "Set RUST_LOG=debug for diagnostics.",
    group(
        ArgGroup::new("source")
            .required(true)
            .args(["input", "demo_rows"])
    )
)]
pub struct Args {
    /// CSV file to analyze
    #[arg(value_name = "FILE.csv")]
    pub input: Option<PathBuf>,

    /// Analyze a generated sample dataset (default 100 rows)
    #[arg(long = "demo", value_name = "ROWS", num_args = 0..=1, default_missing_value = "100")]
    pub demo_rows: Option<usize>,

    /// Columns to summarize: full, numeric or categorical
    #[arg(long)]
    pub style: Option<SummaryStyle>,

    /// Minimum |r| for correlated pairs
    #[arg(long, value_name = "R")]
    pub threshold: Option<f64>,

    /// Correlation coefficient: pearson, spearman or kendall
    #[arg(long)]
    pub method: Option<CorrelationMethod>,

    /// IQR fence multiplier
    #[arg(long, value_name = "MULTIPLIER")]
    pub outliers: Option<f64>,

    /// JSON file with load and analysis settings
    #[arg(long, value_name = "FILE.json")]
    pub config: Option<PathBuf>,

    /// Write the summary table as CSV
    #[arg(long, value_name = "FILE.csv")]
    pub export: Option<PathBuf>,

    /// Describe a numeric column within each group of `--by`
    #[arg(long, value_name = "COLUMN", requires = "by")]
    pub compare: Option<String>,

    /// Categorical column that defines the groups for `--compare`
    #[arg(long, value_name = "COLUMN", requires = "compare")]
    pub by: Option<String>,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

impl Args {
    /// Value and group columns when both `--compare` and `--by` were given
    pub fn group_comparison(&self) -> Option<(&str, &str)> {
        Some((self.compare.as_deref()?, self.by.as_deref()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("plotease").chain(args.iter().copied()))
    }

    #[test]
    fn test_command_is_well_formed() {
        Args::command().debug_assert();
        let help = Args::command().render_help().to_string();
        assert!(help.contains("--threshold"));
        assert!(help.contains("RUST_LOG"));
    }

    #[test]
    fn test_parse_file_and_options() {
        let args = parse(&["data.csv", "--style", "numeric", "--threshold", "0.5", "--method", "kendall", "--json"]).unwrap();
        assert_eq!(args.input, Some(PathBuf::from("data.csv")));
        assert_eq!(args.style, Some(SummaryStyle::Numeric));
        assert_eq!(args.threshold, Some(0.5));
        assert_eq!(args.method, Some(CorrelationMethod::Kendall));
        assert!(args.json);
        assert_eq!(args.demo_rows, None);
    }

    #[test]
    fn test_parse_demo() {
        assert_eq!(parse(&["--demo"]).unwrap().demo_rows, Some(crate::demo::DEFAULT_ROWS));
        assert_eq!(parse(&["--demo", "250"]).unwrap().demo_rows, Some(250));
        let args = parse(&["--demo", "--outliers", "3"]).unwrap();
        assert_eq!(args.demo_rows, Some(crate::demo::DEFAULT_ROWS));
        assert_eq!(args.outliers, Some(3.0));
    }

    #[test]
    fn test_parse_group_comparison() {
        let args = parse(&["data.csv", "--compare", "salary", "--by", "department"]).unwrap();
        assert_eq!(args.group_comparison(), Some(("salary", "department")));
        assert_eq!(parse(&["data.csv"]).unwrap().group_comparison(), None);

        assert!(parse(&["data.csv", "--compare", "salary"]).is_err());
        assert!(parse(&["data.csv", "--by", "department"]).is_err());
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["a.csv", "b.csv"]).is_err());
        assert!(parse(&["a.csv", "--threshold"]).is_err());
        assert!(parse(&["a.csv", "--threshold", "high"]).is_err());
        assert!(parse(&["a.csv", "--style", "fancy"]).is_err());
        assert!(parse(&["a.csv", "--verbose"]).is_err());
        assert!(parse(&["a.csv", "--demo"]).is_err());
        assert_eq!(parse(&["--help"]).unwrap_err().kind(), clap::error::ErrorKind::DisplayHelp);
    }
}
