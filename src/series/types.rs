//! Series types
//!
//! Leveled observations for one variable on one platform, and the
//! length-preserving sequences derived from them.

use serde::{Deserialize, Serialize};

/// Which of the two tracked platforms a series belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    /// First platform (series A)
    A,
    /// Second platform (series B)
    B,
}

impl Platform {
    /// Get the other platform
    pub fn other(&self) -> Self {
        match self {
            Platform::A => Platform::B,
            Platform::B => Platform::A,
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::A => write!(f, "A"),
            Platform::B => write!(f, "B"),
        }
    }
}

/// A single measurement at an aligned period index
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Period index shared by both platforms
    pub period: usize,
    /// Measured value, `None` if the snapshot was unavailable
    pub value: Option<f64>,
}

/// Chronological sequence of observations for one variable on one platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    /// Variable name (e.g. "mid")
    pub variable: String,
    /// Platform the series was measured on
    pub platform: Platform,
    /// Observations ordered by period
    pub observations: Vec<Observation>,
}

impl Series {
    /// Build a series from values indexed 0..n
    pub fn from_values(
        variable: impl Into<String>,
        platform: Platform,
        values: impl IntoIterator<Item = Option<f64>>,
    ) -> Self {
        let observations = values
            .into_iter()
            .enumerate()
            .map(|(period, value)| Observation {
                period,
                value: value.filter(|v| v.is_finite()),
            })
            .collect();

        Self {
            variable: variable.into(),
            platform,
            observations,
        }
    }

    /// Number of periods
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Check if the series has no periods
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Values in period order
    pub fn values(&self) -> Vec<Option<f64>> {
        self.observations.iter().map(|o| o.value).collect()
    }
}

/// First differences: `delta[i] = value[i] - value[i-1]`, `delta[0]` absent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeltaSeries {
    pub values: Vec<Option<f64>>,
}

/// Deltas shifted by one period: `lag[i] = delta[i-1]`, `lag[0]` and `lag[1]` absent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaggedDeltaSeries {
    pub values: Vec<Option<f64>>,
}

/// Both derived sequences for one series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeltaLag {
    pub delta: DeltaSeries,
    pub lagged: LaggedDeltaSeries,
}
