//! Parquet writer for tier results

use arrow::array::{
    ArrayRef, BooleanArray, Float64Array, StringArray, TimestampMicrosecondArray, UInt64Array,
};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use chrono::{DateTime, Utc};
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::types::DataError;
use crate::var::{TierReport, VariableOutcome, VariableReport};

/// Flat row for one variable of one tier
#[derive(Debug, Clone, PartialEq)]
pub struct TierResultRecord {
    pub timestamp: DateTime<Utc>,
    pub tier: String,
    pub variable: String,
    pub verdict: Option<String>,
    pub n_observations: u64,
    pub a_to_b_f: Option<f64>,
    pub a_to_b_p: Option<f64>,
    pub a_to_b_significant: Option<bool>,
    pub b_to_a_f: Option<f64>,
    pub b_to_a_p: Option<f64>,
    pub b_to_a_significant: Option<bool>,
    pub eq_a_beta_a: Option<f64>,
    pub eq_a_beta_b: Option<f64>,
    pub eq_a_r_squared: Option<f64>,
    pub eq_b_beta_a: Option<f64>,
    pub eq_b_beta_b: Option<f64>,
    pub eq_b_r_squared: Option<f64>,
    /// Why the variable is indeterminate
    pub reason: Option<String>,
}

impl TierResultRecord {
    /// Flatten one variable report
    pub fn from_report(timestamp: DateTime<Utc>, tier: &str, entry: &VariableReport) -> Self {
        let analysis = entry.analysis();
        let a_to_b = analysis.and_then(|a| a.a_to_b.as_ref().ok()).copied();
        let b_to_a = analysis.and_then(|a| a.b_to_a.as_ref().ok()).copied();
        let eq_a = analysis.and_then(|a| a.equation_a.as_ref().ok()).copied();
        let eq_b = analysis.and_then(|a| a.equation_b.as_ref().ok()).copied();

        Self {
            timestamp,
            tier: tier.to_string(),
            variable: entry.variable.clone(),
            verdict: entry.verdict().map(|v| v.label().to_string()),
            n_observations: analysis.map(|a| a.n_observations as u64).unwrap_or(0),
            a_to_b_f: a_to_b.map(|r| r.f_statistic),
            a_to_b_p: a_to_b.map(|r| r.p_value),
            a_to_b_significant: a_to_b.map(|r| r.significant),
            b_to_a_f: b_to_a.map(|r| r.f_statistic),
            b_to_a_p: b_to_a.map(|r| r.p_value),
            b_to_a_significant: b_to_a.map(|r| r.significant),
            eq_a_beta_a: eq_a.map(|f| f.beta1),
            eq_a_beta_b: eq_a.map(|f| f.beta2),
            eq_a_r_squared: eq_a.map(|f| f.r_squared),
            eq_b_beta_a: eq_b.map(|f| f.beta1),
            eq_b_beta_b: eq_b.map(|f| f.beta2),
            eq_b_r_squared: eq_b.map(|f| f.r_squared),
            reason: match &entry.outcome {
                VariableOutcome::Determinate(_) => None,
                VariableOutcome::InsufficientData { reason, .. } => Some(reason.clone()),
            },
        }
    }
}

/// Tier result schema
pub fn tier_result_schema() -> Schema {
    let float = |name: &str| Field::new(name, DataType::Float64, true);
    let flag = |name: &str| Field::new(name, DataType::Boolean, true);

    Schema::new(vec![
        Field::new(
            "timestamp",
            DataType::Timestamp(TimeUnit::Microsecond, Some("UTC".into())),
            false,
        ),
        Field::new("tier", DataType::Utf8, false),
        Field::new("variable", DataType::Utf8, false),
        Field::new("verdict", DataType::Utf8, true),
        Field::new("n_observations", DataType::UInt64, false),
        float("a_to_b_f"),
        float("a_to_b_p"),
        flag("a_to_b_significant"),
        float("b_to_a_f"),
        float("b_to_a_p"),
        flag("b_to_a_significant"),
        float("eq_a_beta_a"),
        float("eq_a_beta_b"),
        float("eq_a_r_squared"),
        float("eq_b_beta_a"),
        float("eq_b_beta_b"),
        float("eq_b_r_squared"),
        Field::new("reason", DataType::Utf8, true),
    ])
}

/// Writes analysis results to Snappy-compressed Parquet files
pub struct ResultsWriter {
    output_dir: PathBuf,
}

impl ResultsWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Ensure output directory exists
    pub fn ensure_dir(&self) -> Result<(), DataError> {
        fs::create_dir_all(&self.output_dir)?;
        Ok(())
    }

    /// Generate file path for a given timestamp and prefix
    pub fn file_path(&self, prefix: &str, timestamp: DateTime<Utc>) -> PathBuf {
        let filename = format!("{}_{}.parquet", prefix, timestamp.format("%Y%m%d_%H%M%S"));
        self.output_dir.join(filename)
    }

    /// Write every variable of every tier as one row; returns rows written
    pub fn write_tier_reports(
        &self,
        path: &Path,
        reports: &[TierReport],
        timestamp: DateTime<Utc>,
    ) -> Result<usize, DataError> {
        let records: Vec<TierResultRecord> = reports
            .iter()
            .flat_map(|report| {
                report
                    .entries
                    .iter()
                    .map(|entry| TierResultRecord::from_report(timestamp, &report.name, entry))
            })
            .collect();

        self.write_records(path, &records)?;
        Ok(records.len())
    }

    /// Write flattened result records
    pub fn write_records(&self, path: &Path, records: &[TierResultRecord]) -> Result<(), DataError> {
        if records.is_empty() {
            return Ok(());
        }

        self.ensure_dir()?;

        let schema = Arc::new(tier_result_schema());
        let file = File::create(path)?;

        let props = WriterProperties::builder()
            .set_compression(Compression::SNAPPY)
            .build();

        let mut writer = ArrowWriter::try_new(file, schema.clone(), Some(props))?;

        let float = |get: fn(&TierResultRecord) -> Option<f64>| -> ArrayRef {
            Arc::new(records.iter().map(get).collect::<Float64Array>())
        };
        let flag = |get: fn(&TierResultRecord) -> Option<bool>| -> ArrayRef {
            Arc::new(records.iter().map(get).collect::<BooleanArray>())
        };

        let timestamps: Vec<i64> = records
            .iter()
            .map(|r| r.timestamp.timestamp_micros())
            .collect();

        let columns: Vec<ArrayRef> = vec![
            Arc::new(TimestampMicrosecondArray::from(timestamps).with_timezone("UTC")),
            Arc::new(StringArray::from_iter_values(records.iter().map(|r| r.tier.as_str()))),
            Arc::new(StringArray::from_iter_values(
                records.iter().map(|r| r.variable.as_str()),
            )),
            Arc::new(records.iter().map(|r| r.verdict.as_deref()).collect::<StringArray>()),
            Arc::new(UInt64Array::from_iter_values(
                records.iter().map(|r| r.n_observations),
            )),
            float(|r| r.a_to_b_f),
            float(|r| r.a_to_b_p),
            flag(|r| r.a_to_b_significant),
            float(|r| r.b_to_a_f),
            float(|r| r.b_to_a_p),
            flag(|r| r.b_to_a_significant),
            float(|r| r.eq_a_beta_a),
            float(|r| r.eq_a_beta_b),
            float(|r| r.eq_a_r_squared),
            float(|r| r.eq_b_beta_a),
            float(|r| r.eq_b_beta_b),
            float(|r| r.eq_b_r_squared),
            Arc::new(records.iter().map(|r| r.reason.as_deref()).collect::<StringArray>()),
        ];

        let batch = RecordBatch::try_new(schema, columns)?;

        writer.write(&batch)?;
        writer.close()?;

        tracing::debug!(path = ?path, count = records.len(), "Wrote tier results to Parquet");

        Ok(())
    }
}
