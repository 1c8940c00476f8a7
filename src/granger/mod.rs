//! Granger causality module
//!
//! Decides whether one lagged series carries incremental predictive power
//! for the other by comparing nested regressions with an F-test.

mod ftest;

pub use ftest::{f_survival, granger_test, GrangerResult, MIN_ROWS_GRANGER, SIGNIFICANCE_LEVEL};
