//! Delta and lag construction
//!
//! Absence propagates through every subtraction. A missing snapshot must
//! never turn into a zero delta.

use super::types::{DeltaLag, DeltaSeries, LaggedDeltaSeries, Series};

impl Series {
    /// First differences of the leveled values
    pub fn delta(&self) -> DeltaSeries {
        DeltaSeries::from_levels(&self.values())
    }
}

impl DeltaSeries {
    /// Difference consecutive levels; `delta[0]` is always absent
    pub fn from_levels(levels: &[Option<f64>]) -> Self {
        let values = (0..levels.len())
            .map(|i| {
                if i == 0 {
                    return None;
                }
                match (levels[i], levels[i - 1]) {
                    (Some(curr), Some(prev)) => Some(curr - prev),
                    _ => None,
                }
            })
            .collect();

        Self { values }
    }

    /// Shift by one period
    ///
    /// Positions 0 and 1 are forced absent even when a delta at position 0
    /// was somehow supplied, so the invariant holds for any input.
    pub fn lagged(&self) -> LaggedDeltaSeries {
        let values = (0..self.values.len())
            .map(|i| if i < 2 { None } else { self.values[i - 1] })
            .collect();

        LaggedDeltaSeries { values }
    }

    /// Rebuild levels by cumulating deltas from an initial value
    ///
    /// Returns `None` if any delta after position 0 is absent.
    pub fn reconstruct(&self, initial: f64) -> Option<Vec<f64>> {
        let mut levels = Vec::with_capacity(self.values.len());
        if self.values.is_empty() {
            return Some(levels);
        }

        levels.push(initial);
        let mut current = initial;
        for delta in self.values.iter().skip(1) {
            current += (*delta)?;
            levels.push(current);
        }

        Some(levels)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl LaggedDeltaSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl DeltaLag {
    /// Derive deltas and lagged deltas for a series
    pub fn from_series(series: &Series) -> Self {
        let delta = series.delta();
        let lagged = delta.lagged();
        Self { delta, lagged }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::Platform;

    const EPS: f64 = 1e-9;

    fn assert_close(actual: &[Option<f64>], expected: &[Option<f64>]) {
        assert_eq!(actual.len(), expected.len());
        for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
            match (a, e) {
                (Some(a), Some(e)) => assert!((a - e).abs() < EPS, "index {}: {} != {}", i, a, e),
                (None, None) => {}
                _ => panic!("index {}: {:?} != {:?}", i, a, e),
            }
        }
    }

    #[test]
    fn test_worked_example_deltas() {
        let a = Series::from_values(
            "mid",
            Platform::A,
            [0.50, 0.52, 0.55, 0.54, 0.56].map(Some),
        );
        let b = Series::from_values(
            "mid",
            Platform::B,
            [0.48, 0.49, 0.53, 0.55, 0.57].map(Some),
        );

        let a_dl = DeltaLag::from_series(&a);
        let b_dl = DeltaLag::from_series(&b);

        assert_close(
            &a_dl.delta.values,
            &[None, Some(0.02), Some(0.03), Some(-0.01), Some(0.02)],
        );
        assert_close(
            &b_dl.delta.values,
            &[None, Some(0.01), Some(0.04), Some(0.02), Some(0.02)],
        );
        assert_close(
            &a_dl.lagged.values,
            &[None, None, Some(0.02), Some(0.03), Some(-0.01)],
        );
        assert_close(
            &b_dl.lagged.values,
            &[None, None, Some(0.01), Some(0.04), Some(0.02)],
        );
    }

    #[test]
    fn test_missing_value_propagates() {
        let b = Series::from_values(
            "mid",
            Platform::B,
            vec![Some(0.48), None, Some(0.53), Some(0.55), Some(0.57)],
        );
        let dl = DeltaLag::from_series(&b);

        assert!(dl.delta.values[1].is_none());
        assert!(dl.delta.values[2].is_none());
        assert!(dl.delta.values[3].is_some());
        assert!(dl.lagged.values[2].is_none());
        assert!(dl.lagged.values[3].is_none());
        assert!(dl.lagged.values[4].is_some());
    }

    #[test]
    fn test_delta_absent_iff_either_side_absent() {
        let levels = vec![Some(1.0), Some(2.0), None, Some(4.0), Some(4.5), None, None, Some(7.0)];
        let delta = DeltaSeries::from_levels(&levels);
        assert!(delta.values[0].is_none());
        for i in 1..levels.len() {
            let expect_absent = levels[i].is_none() || levels[i - 1].is_none();
            assert_eq!(delta.values[i].is_none(), expect_absent, "index {}", i);
        }
    }

    #[test]
    fn test_lengths_preserved() {
        for n in 0..6 {
            let levels: Vec<Option<f64>> = (0..n).map(|i| Some(i as f64)).collect();
            let delta = DeltaSeries::from_levels(&levels);
            let lagged = delta.lagged();
            assert_eq!(delta.len(), n);
            assert_eq!(lagged.len(), n);
        }
    }

    #[test]
    fn test_first_two_lags_always_absent() {
        // Even a hand-built delta with a value at position 0 cannot leak into lag[1]
        let delta = DeltaSeries {
            values: vec![Some(9.0), Some(1.0), Some(2.0)],
        };
        let lagged = delta.lagged();
        assert!(lagged.values[0].is_none());
        assert!(lagged.values[1].is_none());
        assert_eq!(lagged.values[2], Some(1.0));
    }

    #[test]
    fn test_reconstruct_round_trip() {
        let levels = [0.5, 0.513, 0.4999, 0.61, 0.6101, 0.2, 0.95, 0.95];
        let delta = DeltaSeries::from_levels(&levels.map(Some));
        let rebuilt = delta.reconstruct(levels[0]).unwrap();

        assert_eq!(rebuilt.len(), levels.len());
        for (r, l) in rebuilt.iter().zip(levels.iter()) {
            assert!((r - l).abs() < EPS);
        }
    }

    #[test]
    fn test_reconstruct_with_gap() {
        let delta = DeltaSeries::from_levels(&[Some(1.0), None, Some(2.0)]);
        assert!(delta.reconstruct(1.0).is_none());
    }

    #[test]
    fn test_empty_series() {
        let series = Series::from_values("mid", Platform::A, Vec::new());
        let dl = DeltaLag::from_series(&series);
        assert!(dl.delta.is_empty());
        assert!(dl.lagged.is_empty());
        assert_eq!(dl.delta.reconstruct(0.0), Some(vec![]));
    }
}
