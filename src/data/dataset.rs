//! Columnar dataset of aligned periods
//!
//! One row per fixed-width interval; every column covers every period and
//! absent measurements are `None`, never zero.

use std::collections::HashMap;

use super::types::DataError;
use crate::config::PlatformConfig;
use crate::series::Platform;
use crate::var::VariableColumns;

/// Name of the optional epoch-milliseconds column
pub const TIMESTAMP_COLUMN: &str = "timestamp_ms";

/// Named numeric columns sharing one period index
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    periods: usize,
    timestamps: Option<Vec<Option<i64>>>,
    names: Vec<String>,
    columns: HashMap<String, Vec<Option<f64>>>,
}

impl Dataset {
    /// Create an empty dataset covering `periods` periods
    pub fn new(periods: usize) -> Self {
        Self {
            periods,
            ..Default::default()
        }
    }

    /// Number of periods (rows)
    pub fn periods(&self) -> usize {
        self.periods
    }

    /// Column names in insertion order
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Add a column; it must cover every period
    pub fn insert_column(
        &mut self,
        name: impl Into<String>,
        values: Vec<Option<f64>>,
    ) -> Result<(), DataError> {
        let name = name.into();
        if values.len() != self.periods {
            return Err(DataError::LengthMismatch {
                column: name,
                expected: self.periods,
                found: values.len(),
            });
        }
        if self.columns.contains_key(&name) {
            return Err(DataError::DuplicateColumn(name));
        }

        let values = values
            .into_iter()
            .map(|v| v.filter(|x| x.is_finite()))
            .collect();
        self.names.push(name.clone());
        self.columns.insert(name, values);
        Ok(())
    }

    /// Look up a column
    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        self.columns.get(name).map(|v| v.as_slice())
    }

    /// Look up a column that must exist
    pub fn require(&self, name: &str) -> Result<&[Option<f64>], DataError> {
        self.column(name)
            .ok_or_else(|| DataError::MissingColumn(name.to_string()))
    }

    /// Attach per-period timestamps (epoch milliseconds)
    pub fn set_timestamps(&mut self, timestamps: Vec<Option<i64>>) -> Result<(), DataError> {
        if timestamps.len() != self.periods {
            return Err(DataError::LengthMismatch {
                column: TIMESTAMP_COLUMN.to_string(),
                expected: self.periods,
                found: timestamps.len(),
            });
        }
        self.timestamps = Some(timestamps);
        Ok(())
    }

    pub fn timestamps(&self) -> Option<&[Option<i64>]> {
        self.timestamps.as_deref()
    }

    /// Resolve the delta and lag columns of one variable on both platforms
    pub fn variable_columns(
        &self,
        variable: &str,
        platforms: &PlatformConfig,
    ) -> Result<VariableColumns, DataError> {
        let fetch = |name: String| self.require(&name).map(|c| c.to_vec());

        let columns = VariableColumns::new(
            fetch(platforms.delta_column(Platform::A, variable))?,
            fetch(platforms.delta_column(Platform::B, variable))?,
            fetch(platforms.lag_column(Platform::A, variable))?,
            fetch(platforms.lag_column(Platform::B, variable))?,
        )?;
        Ok(columns)
    }
}
