//! VAR module
//!
//! Lag-1 two-variable vector autoregression for one variable at a time,
//! and the tier aggregator that turns many of them into verdicts.

mod report;
mod runner;
mod tier;
mod types;

pub use report::{format_detail, format_summary, format_table, interpretation};
pub use runner::VarRunner;
pub use tier::{TierAggregator, TierReport, VariableOutcome, VariableReport, VerdictCounts};
pub use types::{lag_predictor, VarAnalysis, VariableColumns, Verdict};
