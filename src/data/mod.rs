//! Data module
//!
//! Columnar datasets, CSV input/output, and Parquet result storage

mod csv_io;
mod dataset;
mod parquet;
mod types;

pub use csv_io::{load_csv, read_csv, save_csv, write_csv};
pub use dataset::{Dataset, TIMESTAMP_COLUMN};
pub use parquet::{tier_result_schema, ResultsWriter, TierResultRecord};
pub use types::DataError;
