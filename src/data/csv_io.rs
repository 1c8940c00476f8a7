//! CSV reader and writer for preprocessed datasets
//!
//! An empty cell is the absent marker. Columns whose name starts with
//! `timestamp` are not numeric features; `timestamp_ms` is kept as the
//! period timestamp and the others are ignored.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use super::dataset::{Dataset, TIMESTAMP_COLUMN};
use super::types::DataError;

/// Parse a dataset from any CSV source with a header row
pub fn read_csv<R: Read>(source: R) -> Result<Dataset, DataError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader.headers()?.clone();

    let mut timestamp_index = None;
    let mut numeric: Vec<(usize, String)> = Vec::new();
    for (i, name) in headers.iter().enumerate() {
        if name == TIMESTAMP_COLUMN {
            timestamp_index = Some(i);
        } else if !name.starts_with("timestamp") {
            numeric.push((i, name.to_string()));
        }
    }

    let mut timestamps: Vec<Option<i64>> = Vec::new();
    let mut values: Vec<Vec<Option<f64>>> = vec![Vec::new(); numeric.len()];

    for record in reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        if let Some(i) = timestamp_index {
            let cell = record.get(i).unwrap_or("");
            let ts = if cell.is_empty() {
                None
            } else {
                Some(cell.parse::<i64>().map_err(|_| DataError::InvalidValue {
                    line,
                    column: TIMESTAMP_COLUMN.to_string(),
                    value: cell.to_string(),
                })?)
            };
            timestamps.push(ts);
        }

        for (slot, (i, name)) in values.iter_mut().zip(&numeric) {
            let cell = record.get(*i).unwrap_or("");
            slot.push(parse_cell(cell, line, name)?);
        }
    }

    let periods = values
        .first()
        .map(|v| v.len())
        .unwrap_or(timestamps.len());
    let mut dataset = Dataset::new(periods);
    for (column, (_, name)) in values.into_iter().zip(numeric) {
        dataset.insert_column(name, column)?;
    }
    if timestamp_index.is_some() {
        dataset.set_timestamps(timestamps)?;
    }

    tracing::debug!(
        periods = dataset.periods(),
        columns = dataset.column_names().len(),
        "Parsed CSV dataset"
    );

    Ok(dataset)
}

fn parse_cell(cell: &str, line: u64, column: &str) -> Result<Option<f64>, DataError> {
    if cell.is_empty() {
        return Ok(None);
    }
    cell.parse::<f64>()
        .map(|v| Some(v).filter(|v| v.is_finite()))
        .map_err(|_| DataError::InvalidValue {
            line,
            column: column.to_string(),
            value: cell.to_string(),
        })
}

/// Load a dataset from a CSV file
pub fn load_csv(path: impl AsRef<Path>) -> Result<Dataset, DataError> {
    let path = path.as_ref();
    let dataset = read_csv(File::open(path)?)?;
    tracing::info!(
        path = %path.display(),
        periods = dataset.periods(),
        "Loaded dataset"
    );
    Ok(dataset)
}

/// Write a dataset as CSV; absent values become empty cells
pub fn write_csv<W: Write>(dataset: &Dataset, sink: W) -> Result<(), DataError> {
    let mut writer = csv::Writer::from_writer(sink);

    let timestamps = dataset.timestamps();
    let mut header: Vec<&str> = Vec::with_capacity(dataset.column_names().len() + 1);
    if timestamps.is_some() {
        header.push(TIMESTAMP_COLUMN);
    }
    header.extend(dataset.column_names().iter().map(|s| s.as_str()));
    writer.write_record(&header)?;

    let columns: Vec<&[Option<f64>]> = dataset
        .column_names()
        .iter()
        .map(|name| dataset.require(name))
        .collect::<Result<_, _>>()?;

    for period in 0..dataset.periods() {
        let mut row: Vec<String> = Vec::with_capacity(header.len());
        if let Some(ts) = timestamps {
            row.push(ts[period].map(|t| t.to_string()).unwrap_or_default());
        }
        row.extend(
            columns
                .iter()
                .map(|c| c[period].map(|v| v.to_string()).unwrap_or_default()),
        );
        writer.write_record(&row)?;
    }

    writer.flush()?;
    Ok(())
}

/// Save a dataset to a CSV file, creating parent directories
pub fn save_csv(dataset: &Dataset, path: impl AsRef<Path>) -> Result<(), DataError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    write_csv(dataset, File::create(path)?)?;
    tracing::info!(path = %path.display(), periods = dataset.periods(), "Saved dataset");
    Ok(())
}
