//! Order book module
//!
//! Binary-market book snapshots and the per-period variables derived from them

mod metrics;
mod preprocess;
mod types;

pub use metrics::{BookMetrics, VARIABLES};
pub use preprocess::{load_snapshots, preprocess, sample_intervals};
pub use types::{BinaryBook, PairedSnapshot, PriceLevel, SnapshotFile};
