//! Analysis metrics
//!
//! Recorded through the `metrics` facade; without an installed recorder
//! these calls are no-ops.

use std::time::Duration;

/// Counter metric types
#[derive(Debug, Clone, Copy)]
pub enum CounterMetric {
    /// Variables passed through the VAR runner
    VariablesAnalyzed,
    /// Variables whose analysis was indeterminate
    Indeterminate,
    /// Datasets built by the preprocessing step
    DatasetsPreprocessed,
}

impl CounterMetric {
    fn name(&self) -> &'static str {
        match self {
            CounterMetric::VariablesAnalyzed => "leadlag_variables_analyzed_total",
            CounterMetric::Indeterminate => "leadlag_indeterminate_total",
            CounterMetric::DatasetsPreprocessed => "leadlag_datasets_preprocessed_total",
        }
    }
}

/// Increment a counter by one
pub fn increment(metric: CounterMetric) {
    metrics::counter!(metric.name()).increment(1);
}

/// Count a verdict by label
pub fn record_verdict(verdict: &'static str) {
    metrics::counter!("leadlag_verdict_total", "verdict" => verdict).increment(1);
}

/// Record the wall time of one variable analysis
pub fn record_analysis_latency(duration: Duration) {
    metrics::histogram!("leadlag_analysis_duration_seconds").record(duration.as_secs_f64());

    tracing::trace!(
        value_us = duration.as_micros() as u64,
        "Recording analysis latency"
    );
}
