//! Nested-model F-test for lag-1 Granger causality
//!
//! ```text
//! F = ((SSR_r - SSR_u) / q) / (SSR_u / (n - k))      q = 1, k = 3
//! p = 1 - CDF_F(F; 1, n - 3)
//! ```
//!
//! The restricted model drops the tested predictor and is fit on every
//! period where `Y` and the kept predictor are present, so a gap in the
//! tested predictor alone does not remove a restricted row. `n` and the
//! degrees of freedom come from the unrestricted fit.

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, FisherSnedecor};

use crate::regression::{fit_one_factor, fit_two_factor, AnalysisError, FeatureSet, Predictor};

/// Default significance level
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

/// Minimum valid rows for a determinate test
pub const MIN_ROWS_GRANGER: usize = 5;

/// Restrictions tested (one coefficient)
const RESTRICTIONS: usize = 1;

/// Parameters in the unrestricted model (intercept + two slopes)
const UNRESTRICTED_PARAMS: usize = 3;

/// Outcome of one directional causality test
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrangerResult {
    /// F statistic, passed through unclamped (may be negative)
    pub f_statistic: f64,
    /// Upper-tail probability; 1.0 whenever F is negative
    pub p_value: f64,
    /// `p_value < alpha` (never true for negative F)
    pub significant: bool,
    /// Residual sum of squares of the restricted model
    pub ssr_restricted: f64,
    /// Residual sum of squares of the unrestricted model
    pub ssr_unrestricted: f64,
    /// Rows shared by both models
    pub n: usize,
}

impl GrangerResult {
    /// Build the test outcome from the two residual sums of squares
    pub fn from_ssr(
        ssr_restricted: f64,
        ssr_unrestricted: f64,
        n: usize,
        alpha: f64,
    ) -> Result<Self, AnalysisError> {
        if n < MIN_ROWS_GRANGER {
            return Err(AnalysisError::InsufficientData {
                required: MIN_ROWS_GRANGER,
                available: n,
            });
        }
        if ssr_unrestricted == 0.0 {
            return Err(AnalysisError::DegenerateRegressor {
                denominator: ssr_unrestricted,
                n,
            });
        }

        let df1 = RESTRICTIONS as f64;
        let df2 = (n - UNRESTRICTED_PARAMS) as f64;
        let f_statistic = ((ssr_restricted - ssr_unrestricted) / df1) / (ssr_unrestricted / df2);

        let p_value = match f_survival(f_statistic, df1, df2) {
            Ok(p) => p,
            Err(AnalysisError::InvalidDomain(_)) => 1.0,
            Err(e) => return Err(e),
        };

        Ok(Self {
            f_statistic,
            p_value,
            significant: f_statistic >= 0.0 && p_value < alpha,
            ssr_restricted,
            ssr_unrestricted,
            n,
        })
    }

    /// Degrees of freedom `(df1, df2)` of the reference distribution
    pub fn degrees_of_freedom(&self) -> (usize, usize) {
        (RESTRICTIONS, self.n.saturating_sub(UNRESTRICTED_PARAMS))
    }
}

/// Upper-tail probability `1 - CDF(f)` of the F distribution
///
/// Negative or non-finite statistics are outside the support and are
/// reported as `InvalidDomain` instead of being fed to the CDF.
pub fn f_survival(f: f64, df1: f64, df2: f64) -> Result<f64, AnalysisError> {
    if !f.is_finite() || f < 0.0 {
        return Err(AnalysisError::InvalidDomain(f));
    }

    let dist = FisherSnedecor::new(df1, df2).map_err(|_| AnalysisError::InvalidDomain(f))?;
    Ok(dist.sf(f).clamp(0.0, 1.0))
}

/// Test whether `tested` improves the fit of `Y` beyond the other predictor
pub fn granger_test(
    features: &FeatureSet,
    tested: Predictor,
    alpha: f64,
) -> Result<GrangerResult, AnalysisError> {
    let unrestricted = fit_two_factor(features)?;
    if unrestricted.n < MIN_ROWS_GRANGER {
        return Err(AnalysisError::InsufficientData {
            required: MIN_ROWS_GRANGER,
            available: unrestricted.n,
        });
    }

    let restricted = fit_one_factor(features, tested.other())?;

    GrangerResult::from_ssr(restricted.ssr, unrestricted.ssr, unrestricted.n, alpha)
}
