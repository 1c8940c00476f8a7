//! VAR analysis types

use serde::{Deserialize, Serialize};

use crate::granger::GrangerResult;
use crate::regression::{AnalysisError, FeatureSet, Predictor, TwoFactorFit};
use crate::series::{DeltaLag, Platform, Series};

/// Leadership classification from the two directional tests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    /// A -> B significant, B -> A not
    ALeads,
    /// B -> A significant, A -> B not
    BLeads,
    /// Both directions significant
    Bidirectional,
    /// Neither direction significant
    NoRelationship,
}

impl Verdict {
    /// Classify a pair of significance flags
    pub fn from_flags(a_to_b: bool, b_to_a: bool) -> Self {
        match (a_to_b, b_to_a) {
            (true, false) => Verdict::ALeads,
            (false, true) => Verdict::BLeads,
            (true, true) => Verdict::Bidirectional,
            (false, false) => Verdict::NoRelationship,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Verdict::ALeads => "A_LEADS",
            Verdict::BLeads => "B_LEADS",
            Verdict::Bidirectional => "BIDIRECTIONAL",
            Verdict::NoRelationship => "NO_RELATIONSHIP",
        }
    }

    /// Platform whose past predicts the other, if exactly one does
    pub fn leader(&self) -> Option<Platform> {
        match self {
            Verdict::ALeads => Some(Platform::A),
            Verdict::BLeads => Some(Platform::B),
            _ => None,
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// The four aligned columns a VAR analysis consumes for one variable
#[derive(Debug, Clone, PartialEq)]
pub struct VariableColumns {
    /// Current-period delta of series A
    pub y_a: Vec<Option<f64>>,
    /// Current-period delta of series B
    pub y_b: Vec<Option<f64>>,
    /// Lag-1 delta of series A
    pub x_a_lag: Vec<Option<f64>>,
    /// Lag-1 delta of series B
    pub x_b_lag: Vec<Option<f64>>,
}

impl VariableColumns {
    /// Bundle the columns, rejecting any length mismatch
    pub fn new(
        y_a: Vec<Option<f64>>,
        y_b: Vec<Option<f64>>,
        x_a_lag: Vec<Option<f64>>,
        x_b_lag: Vec<Option<f64>>,
    ) -> Result<Self, AnalysisError> {
        let expected = y_a.len();
        for found in [y_b.len(), x_a_lag.len(), x_b_lag.len()] {
            if found != expected {
                return Err(AnalysisError::LengthMismatch { expected, found });
            }
        }

        Ok(Self {
            y_a,
            y_b,
            x_a_lag,
            x_b_lag,
        })
    }

    /// Derive deltas and lags from the leveled series of both platforms
    pub fn from_series(a: &Series, b: &Series) -> Result<Self, AnalysisError> {
        if a.len() != b.len() {
            return Err(AnalysisError::LengthMismatch {
                expected: a.len(),
                found: b.len(),
            });
        }

        let a = DeltaLag::from_series(a);
        let b = DeltaLag::from_series(b);
        Self::new(a.delta.values, b.delta.values, a.lagged.values, b.lagged.values)
    }

    /// Number of periods
    pub fn periods(&self) -> usize {
        self.y_a.len()
    }

    /// Feature rows predicting `target` from both lags
    pub fn features(&self, target: Platform) -> Result<FeatureSet, AnalysisError> {
        let y = match target {
            Platform::A => &self.y_a,
            Platform::B => &self.y_b,
        };
        FeatureSet::from_columns(y, &self.x_a_lag, &self.x_b_lag)
    }
}

/// Predictor carrying the lagged delta of a platform
pub fn lag_predictor(platform: Platform) -> Predictor {
    match platform {
        Platform::A => Predictor::First,
        Platform::B => Predictor::Second,
    }
}

/// Complete lag-1 VAR result for one variable
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VarAnalysis {
    pub variable: String,
    /// Valid rows of the equation predicting A
    pub n_observations: usize,
    /// `dA_t = a + b1*dA_{t-1} + b2*dB_{t-1}`
    pub equation_a: Result<TwoFactorFit, AnalysisError>,
    /// `dB_t = a + b1*dA_{t-1} + b2*dB_{t-1}`
    pub equation_b: Result<TwoFactorFit, AnalysisError>,
    /// Does lagged A improve the B equation
    pub a_to_b: Result<GrangerResult, AnalysisError>,
    /// Does lagged B improve the A equation
    pub b_to_a: Result<GrangerResult, AnalysisError>,
}

impl VarAnalysis {
    /// Verdict, defined only when both tests are determinate
    pub fn verdict(&self) -> Option<Verdict> {
        match (&self.a_to_b, &self.b_to_a) {
            (Ok(a_to_b), Ok(b_to_a)) => {
                Some(Verdict::from_flags(a_to_b.significant, b_to_a.significant))
            }
            _ => None,
        }
    }

    pub fn is_determinate(&self) -> bool {
        self.verdict().is_some()
    }

    /// First failure in equation order, if any
    pub fn first_error(&self) -> Option<&AnalysisError> {
        [
            self.equation_a.as_ref().err(),
            self.equation_b.as_ref().err(),
            self.a_to_b.as_ref().err(),
            self.b_to_a.as_ref().err(),
        ]
        .into_iter()
        .flatten()
        .next()
    }

    /// Largest determinate F statistic, used to rank effect strength
    pub fn max_f(&self) -> Option<f64> {
        [self.a_to_b.as_ref().ok(), self.b_to_a.as_ref().ok()]
            .into_iter()
            .flatten()
            .map(|r| r.f_statistic)
            .reduce(f64::max)
    }

    /// Cross coefficient of the follower on the leader's lag
    ///
    /// For `A_LEADS` this is the coefficient on lagged A in the B equation
    /// and vice versa. `None` unless exactly one platform leads.
    pub fn leader_beta(&self) -> Option<f64> {
        match self.verdict()?.leader()? {
            Platform::A => self.equation_b.as_ref().ok().map(|fit| fit.beta1),
            Platform::B => self.equation_a.as_ref().ok().map(|fit| fit.beta2),
        }
    }
}
