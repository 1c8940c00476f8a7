//! Population statistics over partially-missing samples
//!
//! Every function accepts a slice whose elements convert into `Option<f64>`,
//! so the same primitives serve raw columns (`&[Option<f64>]`) and rows that
//! were already filtered (`&[f64]`). Non-finite values count as absent.
//! All moments divide by the count of present values, not count - 1.

#[inline]
fn present<T>(x: T) -> Option<f64>
where
    T: Into<Option<f64>>,
{
    x.into().filter(|v| v.is_finite())
}

/// Arithmetic mean of the present values, or `None` if there are none
pub fn mean<T>(xs: &[T]) -> Option<f64>
where
    T: Copy + Into<Option<f64>>,
{
    let mut values = xs.iter().filter_map(|&x| present(x));
    let first = values.next()?;

    // Shifted by the first value so a constant sample has an exact mean
    let (sum, count) = values.fold((0.0, 1usize), |(s, n), v| (s + (v - first), n + 1));
    Some(first + sum / count as f64)
}

/// Population variance of the present values
pub fn variance<T>(xs: &[T]) -> Option<f64>
where
    T: Copy + Into<Option<f64>>,
{
    let m = mean(xs)?;
    let (sum, count) = xs
        .iter()
        .filter_map(|&x| present(x))
        .fold((0.0, 0usize), |(s, n), v| (s + (v - m).powi(2), n + 1));

    Some(sum / count as f64)
}

/// Population covariance over the positions where both samples are present
///
/// Pairs are filtered jointly first and both means are recomputed over that
/// subset, so whole-series means never leak into the result.
pub fn covariance<T, U>(xs: &[T], ys: &[U]) -> Option<f64>
where
    T: Copy + Into<Option<f64>>,
    U: Copy + Into<Option<f64>>,
{
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys.iter())
        .filter_map(|(&x, &y)| Some((present(x)?, present(y)?)))
        .collect();

    if pairs.is_empty() {
        return None;
    }

    let n = pairs.len() as f64;
    let x_mean = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let y_mean = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    Some(
        pairs
            .iter()
            .map(|(x, y)| (x - x_mean) * (y - y_mean))
            .sum::<f64>()
            / n,
    )
}

/// Total sum of squares around the mean (SST)
pub fn sum_squared_deviations<T>(xs: &[T]) -> Option<f64>
where
    T: Copy + Into<Option<f64>>,
{
    let m = mean(xs)?;
    Some(
        xs.iter()
            .filter_map(|&x| present(x))
            .map(|v| (v - m).powi(2))
            .sum(),
    )
}

/// Number of present values
pub fn count_present<T>(xs: &[T]) -> usize
where
    T: Copy + Into<Option<f64>>,
{
    xs.iter().filter(|&&x| present(x).is_some()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_mean_skips_absent() {
        let xs = [Some(1.0), None, Some(3.0)];
        assert!((mean(&xs).unwrap() - 2.0).abs() < EPS);
    }

    #[test]
    fn test_mean_empty_and_all_absent() {
        let empty: [f64; 0] = [];
        assert!(mean(&empty).is_none());

        let absent: [Option<f64>; 3] = [None, None, None];
        assert!(mean(&absent).is_none());
        assert!(variance(&absent).is_none());
    }

    #[test]
    fn test_variance_is_population() {
        // X1 lagged Poly deltas from the worked example
        let xs = [0.02, 0.03, -0.01];
        let var = variance(&xs).unwrap();
        assert!((var - 0.000288_888_888_9).abs() < 1e-12);
    }

    #[test]
    fn test_variance_constant_is_exactly_zero() {
        let xs = [0.37; 8];
        assert_eq!(variance(&xs), Some(0.0));

        let sparse = [Some(2.5), None, Some(2.5), Some(2.5)];
        assert_eq!(variance(&sparse), Some(0.0));
    }

    #[test]
    fn test_variance_non_negative() {
        let xs = [Some(-4.0), Some(1e-9), None, Some(17.25), Some(-0.001)];
        assert!(variance(&xs).unwrap() >= 0.0);
    }

    #[test]
    fn test_nan_counts_as_absent() {
        let xs = [1.0, f64::NAN, 3.0];
        assert!((mean(&xs).unwrap() - 2.0).abs() < EPS);
        assert_eq!(count_present(&xs), 2);
    }

    #[test]
    fn test_covariance_worked_example() {
        let x1 = [0.02, 0.03, -0.01];
        let y1 = [0.03, -0.01, 0.02];
        let cov = covariance(&x1, &y1).unwrap();
        assert!((cov - (-0.000_144_444_444_4)).abs() < 1e-12);
    }

    #[test]
    fn test_covariance_filters_pairs_jointly() {
        // Index 1 is missing in ys; its x value must not shift the x mean.
        let xs = [Some(1.0), Some(100.0), Some(3.0)];
        let ys = [Some(2.0), None, Some(6.0)];
        let cov = covariance(&xs, &ys).unwrap();
        // Pairs (1,2) and (3,6): means 2 and 4, cov = ((-1)(-2) + (1)(2)) / 2
        assert!((cov - 2.0).abs() < EPS);
    }

    #[test]
    fn test_covariance_no_pairs() {
        let xs = [Some(1.0), None];
        let ys = [None, Some(2.0)];
        assert!(covariance(&xs, &ys).is_none());
    }

    #[test]
    fn test_covariance_with_self_is_variance() {
        let xs = [0.5, -1.25, 3.0, 2.0];
        let cov = covariance(&xs, &xs).unwrap();
        assert!((cov - variance(&xs).unwrap()).abs() < EPS);
    }

    #[test]
    fn test_sum_squared_deviations() {
        let xs = [1.0, 2.0, 3.0];
        assert!((sum_squared_deviations(&xs).unwrap() - 2.0).abs() < EPS);
    }
}
