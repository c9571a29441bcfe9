//! CSV loading into a [`Dataset`]

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::ReaderBuilder;
use tracing::{debug, info};

use crate::config::LoadConfig;
use crate::dataset::Dataset;
use crate::DataError;

/// Reads delimited text into an in-memory dataset
pub struct CsvSource;

impl CsvSource {
    /// Load a CSV file
    pub fn from_path(path: &Path, config: &LoadConfig) -> Result<Dataset, DataError> {
        info!("Loading CSV from {:?}", path);
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file), config)
    }

    /// Load CSV text from any reader
    pub fn from_reader<R: Read>(reader: R, config: &LoadConfig) -> Result<Dataset, DataError> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(config.delimiter_byte()?)
            .from_reader(reader);

        // Skip lines before header
        let mut record = csv::StringRecord::new();
        for _ in 0..config.header_line {
            if !csv_reader.read_record(&mut record)? {
                return Err(DataError::Csv(format!("header line {} is past the end of input", config.header_line)));
            }
        }

        // Read header
        if !csv_reader.read_record(&mut record)? {
            return Err(DataError::Csv("missing header row".to_string()));
        }
        let headers: Vec<String> = record.iter()
            .map(|s| s.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        while csv_reader.read_record(&mut record)? {
            rows.push(record.iter().map(|s| s.to_string()).collect::<Vec<_>>());
        }
        debug!("Read {} rows x {} columns", rows.len(), headers.len());

        let dataset = Dataset::from_text_columns(&headers, &rows, config)?;
        info!(
            "Loaded dataset: {} rows, {} numeric / {} categorical columns",
            dataset.row_count(),
            dataset.numeric_columns().count(),
            dataset.categorical_columns().count()
        );
        Ok(dataset)
    }
}
