//! Regression module
//!
//! Closed-form ordinary least squares for the lag-1 VAR equations:
//! - Joint filtering of `(Y, X1, X2)` into valid feature rows
//! - Unrestricted two-predictor fit
//! - Restricted one-predictor fit (used only by the Granger test)

mod ols;
mod types;

pub use ols::{fit_two_factor, COLLINEARITY_TOLERANCE, MIN_ROWS_ONE_FACTOR, MIN_ROWS_TWO_FACTOR};
pub use types::{AnalysisError, FeatureRow, FeatureSet, OneFactorFit, Predictor, TwoFactorFit};

pub(crate) use ols::fit_one_factor;
