//! Closed-form OLS with one or two predictors
//!
//! The two-predictor solution inverts the 2x2 normal equations through
//! variances and covariances:
//!
//! ```text
//! denom = Var(X1)*Var(X2) - Cov(X1,X2)^2
//! b1 = (Cov(X1,Y)*Var(X2) - Cov(X2,Y)*Cov(X1,X2)) / denom
//! b2 = (Cov(X2,Y)*Var(X1) - Cov(X1,Y)*Cov(X1,X2)) / denom
//! b0 = mean(Y) - b1*mean(X1) - b2*mean(X2)
//! ```

use super::types::{AnalysisError, FeatureSet, OneFactorFit, Predictor, TwoFactorFit};
use crate::stats::{covariance, mean, sum_squared_deviations, variance};

/// Minimum valid rows for the unrestricted model
pub const MIN_ROWS_TWO_FACTOR: usize = 4;

/// Minimum valid rows for the restricted model
pub const MIN_ROWS_ONE_FACTOR: usize = 3;

/// Below this the predictors are treated as collinear
pub const COLLINEARITY_TOLERANCE: f64 = 1e-20;

struct Moments {
    mean_y: f64,
    mean_x1: f64,
    mean_x2: f64,
    var_x1: f64,
    var_x2: f64,
    cov_x1_x2: f64,
    cov_x1_y: f64,
    cov_x2_y: f64,
}

impl Moments {
    fn compute(y: &[f64], x1: &[f64], x2: &[f64]) -> Option<Self> {
        Some(Self {
            mean_y: mean(y)?,
            mean_x1: mean(x1)?,
            mean_x2: mean(x2)?,
            var_x1: variance(x1)?,
            var_x2: variance(x2)?,
            cov_x1_x2: covariance(x1, x2)?,
            cov_x1_y: covariance(x1, y)?,
            cov_x2_y: covariance(x2, y)?,
        })
    }
}

/// R^2 from residual and total sums of squares; 0 for a constant target
fn r_squared(ssr: f64, sst: f64) -> f64 {
    if sst > 0.0 {
        1.0 - ssr / sst
    } else {
        0.0
    }
}

/// Fit `Y ~ X1 + X2` on the jointly valid rows
pub fn fit_two_factor(features: &FeatureSet) -> Result<TwoFactorFit, AnalysisError> {
    let n = features.len();
    if n < MIN_ROWS_TWO_FACTOR {
        return Err(AnalysisError::InsufficientData {
            required: MIN_ROWS_TWO_FACTOR,
            available: n,
        });
    }

    let y = features.y();
    let x1 = features.x1();
    let x2 = features.x2();

    let m = Moments::compute(&y, &x1, &x2).ok_or(AnalysisError::InsufficientData {
        required: MIN_ROWS_TWO_FACTOR,
        available: 0,
    })?;

    // A constant predictor is collinear with the intercept: its slope is
    // zero and the fit is the one-factor fit on the other predictor.
    match (m.var_x1 == 0.0, m.var_x2 == 0.0) {
        (true, true) => {
            return Err(AnalysisError::DegenerateRegressor {
                denominator: 0.0,
                n,
            })
        }
        (false, true) => {
            let fit = fit_one_factor_slices(&y, &x1)?;
            return Ok(TwoFactorFit {
                intercept: fit.intercept,
                beta1: fit.beta,
                beta2: 0.0,
                r_squared: fit.r_squared,
                ssr: fit.ssr,
                n,
            });
        }
        (true, false) => {
            let fit = fit_one_factor_slices(&y, &x2)?;
            return Ok(TwoFactorFit {
                intercept: fit.intercept,
                beta1: 0.0,
                beta2: fit.beta,
                r_squared: fit.r_squared,
                ssr: fit.ssr,
                n,
            });
        }
        (false, false) => {}
    }

    let denom = m.var_x1 * m.var_x2 - m.cov_x1_x2.powi(2);
    if denom.abs() < COLLINEARITY_TOLERANCE {
        return Err(AnalysisError::DegenerateRegressor {
            denominator: denom,
            n,
        });
    }

    let beta1 = (m.cov_x1_y * m.var_x2 - m.cov_x2_y * m.cov_x1_x2) / denom;
    let beta2 = (m.cov_x2_y * m.var_x1 - m.cov_x1_y * m.cov_x1_x2) / denom;
    let intercept = m.mean_y - beta1 * m.mean_x1 - beta2 * m.mean_x2;

    let ssr: f64 = features
        .rows()
        .iter()
        .map(|r| (r.y - (intercept + beta1 * r.x1 + beta2 * r.x2)).powi(2))
        .sum();
    let sst = sum_squared_deviations(&y).unwrap_or(0.0);

    Ok(TwoFactorFit {
        intercept,
        beta1,
        beta2,
        r_squared: r_squared(ssr, sst),
        ssr,
        n,
    })
}

/// Fit the restricted model `Y ~ X` using only the selected predictor
///
/// Rows are every period where `Y` and `X` are present, whether or not the
/// left-out predictor is. Only the Granger test uses this; it leaves out a
/// known predictor on purpose and is not a forecasting model.
pub(crate) fn fit_one_factor(
    features: &FeatureSet,
    predictor: Predictor,
) -> Result<OneFactorFit, AnalysisError> {
    let (y, x) = features.pairs(predictor);
    fit_one_factor_slices(&y, &x)
}

fn fit_one_factor_slices(y: &[f64], x: &[f64]) -> Result<OneFactorFit, AnalysisError> {
    let n = y.len().min(x.len());
    if n < MIN_ROWS_ONE_FACTOR {
        return Err(AnalysisError::InsufficientData {
            required: MIN_ROWS_ONE_FACTOR,
            available: n,
        });
    }

    let insufficient = AnalysisError::InsufficientData {
        required: MIN_ROWS_ONE_FACTOR,
        available: 0,
    };
    let var_x = variance(x).ok_or_else(|| insufficient.clone())?;
    if var_x == 0.0 {
        return Err(AnalysisError::DegenerateRegressor {
            denominator: var_x,
            n,
        });
    }

    let cov_x_y = covariance(x, y).ok_or_else(|| insufficient.clone())?;
    let mean_x = mean(x).ok_or_else(|| insufficient.clone())?;
    let mean_y = mean(y).ok_or(insufficient)?;

    let beta = cov_x_y / var_x;
    let intercept = mean_y - beta * mean_x;

    let ssr: f64 = y
        .iter()
        .zip(x)
        .map(|(yi, xi)| (yi - (intercept + beta * xi)).powi(2))
        .sum();
    let sst = sum_squared_deviations(y).unwrap_or(0.0);

    Ok(OneFactorFit {
        intercept,
        beta,
        r_squared: r_squared(ssr, sst),
        ssr,
        n,
    })
}
