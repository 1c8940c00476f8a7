//! Snapshot preprocessing
//!
//! Turns paired book snapshots into the delta/lag dataset the VAR consumes.
//! Rows are never removed: the first periods keep absent deltas and lags.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tracing::{debug, info};

use super::metrics::{BookMetrics, VARIABLES};
use super::types::{PairedSnapshot, SnapshotFile};
use crate::config::PlatformConfig;
use crate::data::{DataError, Dataset};
use crate::series::{DeltaLag, Platform, Series};
use crate::telemetry::{self, CounterMetric};

/// Load a snapshot capture file
pub fn load_snapshots(path: impl AsRef<Path>) -> Result<Vec<PairedSnapshot>, DataError> {
    let path = path.as_ref();
    let file: SnapshotFile = serde_json::from_reader(BufReader::new(File::open(path)?))?;
    info!(
        path = %path.display(),
        snapshots = file.snapshots.len(),
        "Loaded snapshots"
    );
    Ok(file.snapshots)
}

/// Pick the snapshot closest to each fixed-width interval boundary
///
/// Boundaries start at the earliest snapshot and run through the latest.
/// Ties resolve to the earlier snapshot. Input order does not matter.
pub fn sample_intervals(snapshots: &[PairedSnapshot], interval_ms: i64) -> Vec<PairedSnapshot> {
    if interval_ms <= 0 || snapshots.is_empty() {
        return snapshots.to_vec();
    }

    let mut sorted: Vec<&PairedSnapshot> = snapshots.iter().collect();
    sorted.sort_by_key(|s| s.timestamp_ms);
    let (start, end) = match (sorted.first(), sorted.last()) {
        (Some(first), Some(last)) => (first.timestamp_ms, last.timestamp_ms),
        _ => return Vec::new(),
    };

    let mut sampled = Vec::new();
    let mut cursor = 0;
    let mut target = start;
    while target <= end {
        // Advance while the next snapshot is strictly closer to the target
        while cursor + 1 < sorted.len()
            && (sorted[cursor + 1].timestamp_ms - target).abs()
                < (sorted[cursor].timestamp_ms - target).abs()
        {
            cursor += 1;
        }
        sampled.push(sorted[cursor].clone());
        target += interval_ms;
    }

    debug!(
        snapshots = snapshots.len(),
        samples = sampled.len(),
        interval_ms,
        "Sampled snapshots"
    );
    sampled
}

/// Build level, delta and lag columns for every variable on both platforms
pub fn preprocess(
    snapshots: &[PairedSnapshot],
    platforms: &PlatformConfig,
) -> Result<Dataset, DataError> {
    let metrics: Vec<(BookMetrics, BookMetrics)> = snapshots
        .iter()
        .map(|s| {
            (
                BookMetrics::from_book(s.book(Platform::A)),
                BookMetrics::from_book(s.book(Platform::B)),
            )
        })
        .collect();

    let mut dataset = Dataset::new(snapshots.len());
    dataset.set_timestamps(snapshots.iter().map(|s| Some(s.timestamp_ms)).collect())?;

    let mut derived = Vec::with_capacity(VARIABLES.len() * 2);
    for variable in VARIABLES {
        for platform in [Platform::A, Platform::B] {
            let levels = metrics.iter().map(|(a, b)| match platform {
                Platform::A => a.value(variable),
                Platform::B => b.value(variable),
            });
            let series = Series::from_values(variable, platform, levels);
            dataset.insert_column(platforms.level_column(platform, variable), series.values())?;
            derived.push((variable, platform, DeltaLag::from_series(&series)));
        }
    }

    for (variable, platform, columns) in &derived {
        dataset.insert_column(
            platforms.delta_column(*platform, variable),
            columns.delta.values.clone(),
        )?;
    }
    for (variable, platform, columns) in derived {
        dataset.insert_column(
            platforms.lag_column(platform, variable),
            columns.lagged.values,
        )?;
    }

    telemetry::increment(CounterMetric::DatasetsPreprocessed);
    info!(
        periods = dataset.periods(),
        columns = dataset.column_names().len(),
        "Preprocessed snapshots"
    );

    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::{BinaryBook, PriceLevel};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    fn book(yes: Decimal, no: Decimal) -> BinaryBook {
        BinaryBook {
            yes_bids: vec![PriceLevel {
                price: yes,
                size: dec!(100),
            }],
            no_bids: vec![PriceLevel {
                price: no,
                size: dec!(100),
            }],
        }
    }

    fn snapshot(timestamp_ms: i64, a_yes: Decimal, b_yes: Decimal) -> PairedSnapshot {
        PairedSnapshot {
            timestamp_ms,
            a: book(a_yes, dec!(0.40)),
            b: book(b_yes, dec!(0.40)),
        }
    }

    #[test]
    fn test_sample_intervals_picks_closest() {
        let minute = 60_000;
        let snapshots = vec![
            snapshot(0, dec!(0.50), dec!(0.50)),
            snapshot(28 * minute, dec!(0.51), dec!(0.50)),
            snapshot(33 * minute, dec!(0.52), dec!(0.50)),
            snapshot(61 * minute, dec!(0.53), dec!(0.50)),
        ];

        let sampled = sample_intervals(&snapshots, 30 * minute);
        let times: Vec<i64> = sampled.iter().map(|s| s.timestamp_ms / minute).collect();
        assert_eq!(times, vec![0, 28, 61]);
    }

    #[test]
    fn test_sample_intervals_disabled() {
        let snapshots = vec![snapshot(5, dec!(0.5), dec!(0.5)), snapshot(1, dec!(0.5), dec!(0.5))];
        assert_eq!(sample_intervals(&snapshots, 0), snapshots);
        assert!(sample_intervals(&[], 1000).is_empty());
    }

    #[test]
    fn test_preprocess_columns() {
        let platforms = PlatformConfig::default();
        let snapshots = vec![
            snapshot(0, dec!(0.50), dec!(0.48)),
            snapshot(1, dec!(0.52), dec!(0.49)),
            snapshot(2, dec!(0.55), dec!(0.53)),
        ];

        let dataset = preprocess(&snapshots, &platforms).unwrap();
        assert_eq!(dataset.periods(), 3);
        assert_eq!(dataset.column_names().len(), 19 * 2 * 3);
        assert_eq!(dataset.timestamps().unwrap(), &[Some(0), Some(1), Some(2)]);

        let best = dataset.require("poly_best_bid_yes").unwrap();
        assert!((best[2].unwrap() - 0.55).abs() < 1e-12);

        let delta = dataset.require("d_kalshi_best_bid_yes").unwrap();
        assert_eq!(delta[0], None);
        assert!((delta[2].unwrap() - 0.04).abs() < 1e-9);

        let lag = dataset.require("d_poly_best_bid_yes_lag1").unwrap();
        assert_eq!(lag[0], None);
        assert_eq!(lag[1], None);
        assert!((lag[2].unwrap() - 0.02).abs() < 1e-9);
    }

    #[test]
    fn test_preprocess_missing_side_is_absent() {
        let platforms = PlatformConfig::default();
        let mut snapshots = vec![
            snapshot(0, dec!(0.50), dec!(0.48)),
            snapshot(1, dec!(0.52), dec!(0.49)),
            snapshot(2, dec!(0.55), dec!(0.53)),
        ];
        snapshots[1].b.no_bids.clear();

        let dataset = preprocess(&snapshots, &platforms).unwrap();
        let mid = dataset.require("kalshi_mid").unwrap();
        assert_eq!(mid[1], None);

        let delta = dataset.require("d_kalshi_mid").unwrap();
        assert_eq!(delta, &[None, None, None]);
    }

    #[test]
    fn test_load_snapshots() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("orderbooks.json");
        std::fs::write(
            &path,
            r#"{"snapshots": [{"timestamp": 10, "polymarket": {}, "kalshi": {}}]}"#,
        )
        .unwrap();

        let snapshots = load_snapshots(&path).unwrap();
        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].timestamp_ms, 10);
        assert!(snapshots[0].a.yes_bids.is_empty());
    }
}
