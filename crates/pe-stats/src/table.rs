//! Tabular rendering of a [`DatasetSummary`]

use std::fmt;
use std::io::Write;

use crate::format::{format_optional, format_percentage};
use crate::summary::{ColumnSummary, DatasetSummary};
use crate::StatsError;

const WIDTH: usize = 13;

const HEADERS: [&str; WIDTH] = [
    "Column", "Type", "Count", "Missing", "Missing %", "Unique", "Mean", "Std", "Min", "Median", "Max", "Top", "Freq",
];

const NA: &str = "N/A";

/// One row per summarized column, then one per failed column
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryTable {
    rows: Vec<[String; WIDTH]>,
}

impl SummaryTable {
    pub fn from_summary(summary: &DatasetSummary) -> Self {
        let mut rows: Vec<[String; WIDTH]> = summary.iter().map(|(name, column)| summary_row(name, column)).collect();

        for (name, error) in &summary.failures {
            let mut row: [String; WIDTH] = std::array::from_fn(|_| NA.to_string());
            row[0] = name.clone();
            row[1] = format!("error: {error}");
            rows.push(row);
        }

        Self { rows }
    }

    pub fn headers() -> &'static [&'static str] {
        &HEADERS
    }

    pub fn rows(&self) -> &[[String; WIDTH]] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), StatsError> {
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(HEADERS)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}

fn summary_row(name: &str, column: &ColumnSummary) -> [String; WIDTH] {
    let missing_ratio = format_percentage(column.missing_ratio(), 1);
    match column {
        ColumnSummary::Numeric(s) => [
            name.to_string(),
            column.kind().to_string(),
            s.count.to_string(),
            s.missing_count.to_string(),
            missing_ratio,
            s.unique_count.to_string(),
            format_optional(s.mean, 4),
            format_optional(s.std, 4),
            format_optional(s.min, 4),
            format_optional(s.median, 4),
            format_optional(s.max, 4),
            NA.to_string(),
            NA.to_string(),
        ],
        ColumnSummary::Categorical(s) => [
            name.to_string(),
            column.kind().to_string(),
            s.count.to_string(),
            s.missing_count.to_string(),
            missing_ratio,
            s.unique_count.to_string(),
            NA.to_string(),
            NA.to_string(),
            NA.to_string(),
            NA.to_string(),
            NA.to_string(),
            s.top_value.clone().unwrap_or_else(|| NA.to_string()),
            s.top_frequency.to_string(),
        ],
    }
}

fn write_line<'a>(f: &mut fmt::Formatter<'_>, cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> fmt::Result {
    for (i, (cell, width)) in cells.zip(widths.iter().copied()).enumerate() {
        if i > 0 {
            write!(f, "  ")?;
        }
        write!(f, "{cell:<width$}")?;
    }
    Ok(())
}

impl fmt::Display for SummaryTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut widths: Vec<usize> = HEADERS.iter().map(|h| h.len()).collect();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        write_line(f, HEADERS.iter().copied(), &widths)?;
        let total = widths.iter().sum::<usize>() + 2 * (widths.len() - 1);
        write!(f, "\n{}", "-".repeat(total))?;
        for row in &self.rows {
            writeln!(f)?;
            write_line(f, row.iter().map(String::as_str), &widths)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::{compute_summary_for, SummaryStyle};
    use pe_data::{Column, Dataset};

    fn table() -> SummaryTable {
        let data = Dataset::new(vec![
            Column::numeric("age", vec![Some(25.0), None, Some(35.0)]),
            Column::from_strs("city", &["NY", "LA", "NY"]),
        ])
        .unwrap();
        let summary = compute_summary_for(&data, SummaryStyle::Full, &["age", "city", "ghost"]).unwrap();
        SummaryTable::from_summary(&summary)
    }

    #[test]
    fn test_rows() {
        let table = table();
        assert_eq!(table.rows().len(), 3);

        let age = &table.rows()[0];
        assert_eq!(age[1], "numeric");
        assert_eq!(age[2], "2");
        assert_eq!(age[4], "33.3%");
        assert_eq!(age[5], "2");
        assert_eq!(age[6], "30.0000");
        assert_eq!(age[9], "30.0000");
        assert_eq!(age[11], "N/A");

        let city = &table.rows()[1];
        assert_eq!(city[5], "2");
        assert_eq!(city[11], "NY");
        assert_eq!(city[12], "2");
        assert_eq!(city[6], "N/A");
        assert_eq!(city[9], "N/A");

        let ghost = &table.rows()[2];
        assert_eq!(ghost[0], "ghost");
        assert!(ghost[1].starts_with("error"));
    }

    #[test]
    fn test_write_csv() {
        let mut buffer = Vec::new();
        table().write_csv(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("Column,Type,Count,Missing,Missing %,Unique,Mean,Std,Min,Median,Max,Top,Freq")
        );
        assert!(lines.next().unwrap().starts_with("age,numeric,2,1,33.3%"));
        assert_eq!(text.lines().count(), 4);
    }

    #[test]
    fn test_display_is_aligned() {
        let text = table().to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("Column"));
        assert!(lines[1].chars().all(|c| c == '-'));
        let type_offset = lines[0].find("Type").unwrap();
        assert_eq!(&lines[2][type_offset..type_offset + 7], "numeric");
    }
}
