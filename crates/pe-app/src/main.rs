//! Main application entry point

use std::fs::File;
use std::io::BufWriter;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pe_data::{CsvSource, Dataset};

mod cli;
mod config;
mod demo;
mod report;

use cli::Args;
use config::AppConfig;
use report::Report;

/// Models shown alongside the demo dataset
const DEMO_MODELS: usize = 3;

fn load_dataset(args: &Args, config: &AppConfig) -> Result<Dataset> {
    if let Some(rows) = args.demo_rows {
        info!("Generating demo dataset with {} rows", rows);
        return demo::sample_dataset(rows);
    }

    let path = args.input.as_deref().context("no input file given")?;
    CsvSource::from_path(path, &config.load).with_context(|| format!("loading {}", path.display()))
}

fn run(args: Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => AppConfig::from_path(path)?,
        None => AppConfig::default(),
    };
    config.apply_args(&args)?;

    let dataset = load_dataset(&args, &config)?;
    let mut report = Report::analyze(&dataset, &config.analysis)?;
    if let Some((column, group_by)) = args.group_comparison() {
        report = report.with_groups(&dataset, column, group_by)?;
    }
    if args.demo_rows.is_some() {
        report = report.with_models(demo::sample_models(DEMO_MODELS)?);
    }

    if let Some(path) = &args.export {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        report.table().write_csv(BufWriter::new(file))?;
        info!("Summary table written to {}", path.display());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{report}");
    }
    Ok(())
}

fn main() -> Result<()> {
    // Initialize tracing; stdout carries the report
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    run(Args::parse())
}
