//! Telemetry module
//!
//! Logging and analysis metrics

mod logging;
mod metrics;

pub use logging::{init_logging, LogFormat};
pub use metrics::{increment, record_analysis_latency, record_verdict, CounterMetric};

use crate::config::TelemetryConfig;

/// Guard that keeps telemetry alive for the duration of a run
pub struct TelemetryGuard {
    _priv: (),
}

/// Initialize all telemetry subsystems
pub fn init_telemetry(config: &TelemetryConfig) -> anyhow::Result<TelemetryGuard> {
    init_logging(&config.log_level, config.log_format)?;

    tracing::debug!(
        level = %config.log_level,
        format = ?config.log_format,
        "Telemetry initialized"
    );

    Ok(TelemetryGuard { _priv: () })
}
