//! Regression types
//!
//! Feature rows, fitted models, and the error taxonomy shared by the
//! solvers, the F-test, and the VAR runner.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons an estimate could not be produced
///
/// Every variant is recoverable at the per-variable level; callers store
/// them in place of a result instead of aborting.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum AnalysisError {
    /// Fewer valid rows than the model needs
    #[error("Insufficient data: {available} valid rows, {required} required")]
    InsufficientData { required: usize, available: usize },
    /// Zero or near-zero variance/covariance denominator
    #[error("Degenerate regressor: denominator {denominator:e} over {n} rows")]
    DegenerateRegressor { denominator: f64, n: usize },
    /// F statistic outside the support of the F distribution
    #[error("F statistic {0} outside distribution domain")]
    InvalidDomain(f64),
    /// Input columns cover different numbers of periods
    #[error("Series length mismatch: expected {expected} periods, found {found}")]
    LengthMismatch { expected: usize, found: usize },
}

impl AnalysisError {
    /// Short label for tables and metrics
    pub fn label(&self) -> &'static str {
        match self {
            AnalysisError::InsufficientData { .. } => "insufficient_data",
            AnalysisError::DegenerateRegressor { .. } => "degenerate_regressor",
            AnalysisError::InvalidDomain(_) => "invalid_domain",
            AnalysisError::LengthMismatch { .. } => "length_mismatch",
        }
    }
}

/// Selects one of the two predictors of a feature row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Predictor {
    /// `x1`, the lagged delta of series A
    First,
    /// `x2`, the lagged delta of series B
    Second,
}

impl Predictor {
    /// Get the other predictor
    pub fn other(&self) -> Self {
        match self {
            Predictor::First => Predictor::Second,
            Predictor::Second => Predictor::First,
        }
    }
}

/// One training example: `(Y_current, X1_lag, X2_lag)` with all fields present
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    /// Period the row was taken from
    pub period: usize,
    pub y: f64,
    pub x1: f64,
    pub x2: f64,
}

impl FeatureRow {
    /// Value of the selected predictor
    pub fn predictor(&self, predictor: Predictor) -> f64 {
        match predictor {
            Predictor::First => self.x1,
            Predictor::Second => self.x2,
        }
    }
}

/// Jointly valid feature rows built from three aligned columns
///
/// The per-period `[y, x1, x2]` values are kept so a model using only one
/// predictor can select its own valid periods.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSet {
    rows: Vec<FeatureRow>,
    source: Vec<[Option<f64>; 3]>,
    periods: usize,
}

impl FeatureSet {
    /// Keep only the periods where `y`, `x1` and `x2` are all present and finite
    ///
    /// Columns of different length are a precondition violation and are
    /// rejected rather than truncated.
    pub fn from_columns(
        y: &[Option<f64>],
        x1: &[Option<f64>],
        x2: &[Option<f64>],
    ) -> Result<Self, AnalysisError> {
        let expected = y.len();
        for found in [x1.len(), x2.len()] {
            if found != expected {
                return Err(AnalysisError::LengthMismatch { expected, found });
            }
        }

        let finite = |v: Option<f64>| v.filter(|v| v.is_finite());
        let source: Vec<[Option<f64>; 3]> = (0..expected)
            .map(|i| [finite(y[i]), finite(x1[i]), finite(x2[i])])
            .collect();
        let rows = source
            .iter()
            .enumerate()
            .filter_map(|(period, [y, x1, x2])| {
                Some(FeatureRow {
                    period,
                    y: (*y)?,
                    x1: (*x1)?,
                    x2: (*x2)?,
                })
            })
            .collect();

        Ok(Self {
            rows,
            source,
            periods: expected,
        })
    }

    /// Build directly from complete rows; periods without a row are absent
    pub fn from_rows(rows: Vec<FeatureRow>) -> Self {
        let periods = rows.iter().map(|r| r.period + 1).max().unwrap_or(0);
        let mut source = vec![[None; 3]; periods];
        for row in &rows {
            source[row.period] = [Some(row.y), Some(row.x1), Some(row.x2)];
        }
        Self {
            rows,
            source,
            periods,
        }
    }

    /// Valid rows in period order
    pub fn rows(&self) -> &[FeatureRow] {
        &self.rows
    }

    /// Number of valid rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of periods in the source columns
    pub fn periods(&self) -> usize {
        self.periods
    }

    pub fn y(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.y).collect()
    }

    pub fn x1(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.x1).collect()
    }

    pub fn x2(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.x2).collect()
    }

    /// Column of the selected predictor
    pub fn predictor(&self, predictor: Predictor) -> Vec<f64> {
        self.rows.iter().map(|r| r.predictor(predictor)).collect()
    }

    /// `(y, x)` over every period where `y` and the selected predictor are present
    ///
    /// The other predictor may be absent, so these periods are a superset of
    /// [`FeatureSet::rows`].
    pub fn pairs(&self, predictor: Predictor) -> (Vec<f64>, Vec<f64>) {
        let column = match predictor {
            Predictor::First => 1,
            Predictor::Second => 2,
        };
        self.source
            .iter()
            .filter_map(|values| Some((values[0]?, values[column]?)))
            .unzip()
    }
}

/// Fit of `Y = b0 + b1*X1 + b2*X2`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TwoFactorFit {
    pub intercept: f64,
    /// Coefficient on `X1` (lagged series A)
    pub beta1: f64,
    /// Coefficient on `X2` (lagged series B)
    pub beta2: f64,
    pub r_squared: f64,
    /// Residual sum of squares
    pub ssr: f64,
    /// Valid rows used
    pub n: usize,
}

impl TwoFactorFit {
    /// Predicted value for one row
    pub fn predict(&self, x1: f64, x2: f64) -> f64 {
        self.intercept + self.beta1 * x1 + self.beta2 * x2
    }

    /// Coefficient on the selected predictor
    pub fn beta(&self, predictor: Predictor) -> f64 {
        match predictor {
            Predictor::First => self.beta1,
            Predictor::Second => self.beta2,
        }
    }
}

/// Fit of `Y = b0 + b*X` (restricted model)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OneFactorFit {
    pub intercept: f64,
    pub beta: f64,
    pub r_squared: f64,
    pub ssr: f64,
    pub n: usize,
}
