//! Series module
//!
//! Leveled observation series and the delta / lag-1 transform that turns
//! them into regression features.

mod transform;
mod types;

pub use types::{DeltaLag, DeltaSeries, LaggedDeltaSeries, Observation, Platform, Series};
