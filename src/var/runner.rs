//! Lag-1 VAR runner
//!
//! Both equations share the predictors `(dA_{t-1}, dB_{t-1})` and differ
//! only in the target, so a single equation routine is run twice with the
//! roles swapped.

use std::time::Instant;

use tracing::debug;

use super::types::{lag_predictor, VarAnalysis, VariableColumns};
use crate::granger::{granger_test, GrangerResult, SIGNIFICANCE_LEVEL};
use crate::regression::{fit_two_factor, AnalysisError, TwoFactorFit};
use crate::series::Platform;
use crate::telemetry::{self, CounterMetric};

/// One fitted equation and the causality test attached to it
struct Equation {
    rows: usize,
    fit: Result<TwoFactorFit, AnalysisError>,
    /// Does the other platform's lag improve this equation
    test: Result<GrangerResult, AnalysisError>,
}

/// Runs the two-equation VAR and both Granger tests for one variable
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VarRunner {
    alpha: f64,
}

impl Default for VarRunner {
    fn default() -> Self {
        Self::new(SIGNIFICANCE_LEVEL)
    }
}

impl VarRunner {
    /// Create a runner testing at significance level `alpha`
    pub fn new(alpha: f64) -> Self {
        Self { alpha }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Analyze one variable
    ///
    /// Never fails: indeterminate parts are carried as errors inside the
    /// returned analysis so the caller can report them.
    pub fn analyze(&self, variable: &str, columns: &VariableColumns) -> VarAnalysis {
        let start = Instant::now();

        let a = self.fit_equation(Platform::A, columns);
        let b = self.fit_equation(Platform::B, columns);

        let analysis = VarAnalysis {
            variable: variable.to_string(),
            n_observations: a.rows,
            equation_a: a.fit,
            equation_b: b.fit,
            a_to_b: b.test,
            b_to_a: a.test,
        };

        telemetry::record_analysis_latency(start.elapsed());
        telemetry::increment(CounterMetric::VariablesAnalyzed);
        match analysis.verdict() {
            Some(verdict) => {
                telemetry::record_verdict(verdict.label());
                debug!(
                    variable,
                    n = analysis.n_observations,
                    verdict = %verdict,
                    "VAR analysis complete"
                );
            }
            None => {
                telemetry::increment(CounterMetric::Indeterminate);
                debug!(
                    variable,
                    n = analysis.n_observations,
                    reason = analysis.first_error().map(|e| e.label()),
                    "VAR analysis indeterminate"
                );
            }
        }

        analysis
    }

    /// Fit `d{target}_t` on both lags and test the other platform's lag
    fn fit_equation(&self, target: Platform, columns: &VariableColumns) -> Equation {
        let features = match columns.features(target) {
            Ok(features) => features,
            Err(e) => {
                return Equation {
                    rows: 0,
                    fit: Err(e.clone()),
                    test: Err(e),
                }
            }
        };

        Equation {
            rows: features.len(),
            fit: fit_two_factor(&features),
            test: granger_test(&features, lag_predictor(target.other()), self.alpha),
        }
    }
}
