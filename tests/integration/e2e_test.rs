//! End-to-end integration tests

use chrono::Utc;
use poly_leadlag::book::{
    load_snapshots, preprocess, sample_intervals, BinaryBook, PairedSnapshot, PriceLevel,
    SnapshotFile,
};
use poly_leadlag::cli::{OutputFormat, TiersArgs};
use poly_leadlag::config::{Config, PlatformConfig};
use poly_leadlag::data::{load_csv, save_csv, ResultsWriter};
use poly_leadlag::var::{TierAggregator, VariableOutcome, Verdict};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

const MINUTE_MS: i64 = 60_000;

fn book(yes_ticks: i64) -> BinaryBook {
    // Constant 0.02 spread between the YES bid and the implied YES ask
    let yes = Decimal::new(yes_ticks, 4);
    let no = Decimal::ONE - yes - dec!(0.02);
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

/// Platform B copies platform A's YES bid one minute late, plus noise
fn leader_follower_snapshots(periods: usize, seed: u64) -> Vec<PairedSnapshot> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut a = 5_000i64;
    let mut previous_a = a;
    (0..periods)
        .map(|i| {
            let b = previous_a + rng.gen_range(-5..=5);
            previous_a = a;
            let snapshot = PairedSnapshot {
                timestamp_ms: i as i64 * MINUTE_MS,
                a: book(a),
                b: book(b),
            };
            a = (a + rng.gen_range(-40..=40)).clamp(1_000, 9_000);
            snapshot
        })
        .collect()
}

fn write_snapshots(path: &Path, snapshots: Vec<PairedSnapshot>) {
    let file = SnapshotFile { snapshots };
    std::fs::write(path, serde_json::to_string(&file).unwrap()).unwrap();
}

fn prepare_csv(dir: &TempDir) -> std::path::PathBuf {
    let snapshots_path = dir.path().join("orderbooks.json");
    write_snapshots(&snapshots_path, leader_follower_snapshots(300, 7));

    let snapshots = load_snapshots(&snapshots_path).unwrap();
    let sampled = sample_intervals(&snapshots, MINUTE_MS);
    assert_eq!(sampled.len(), 300);

    let dataset = preprocess(&sampled, &PlatformConfig::default()).unwrap();
    let csv_path = dir.path().join("preprocessed.csv");
    save_csv(&dataset, &csv_path).unwrap();
    csv_path
}

fn tier_args(input: &Path, sequential: bool) -> TiersArgs {
    TiersArgs {
        input: Some(input.to_path_buf()),
        tier: Some("Tier 1: Price Signals".to_string()),
        format: OutputFormat::Json,
        parquet: false,
        output: None,
        sequential,
    }
}

#[tokio::test]
async fn test_snapshots_to_tier_report() {
    let dir = TempDir::new().unwrap();
    let csv_path = prepare_csv(&dir);
    let config = Config::default();

    let reports = tier_args(&csv_path, false).run(&config).await.unwrap();
    assert_eq!(reports.len(), 1);
    let tier = &reports[0];
    assert_eq!(tier.entries.len(), 4);
    assert_eq!(tier.counts.total(), 4);

    let mid = &tier.entries[0];
    assert_eq!(mid.variable, "mid");
    let analysis = mid.analysis().unwrap();
    assert!(analysis.a_to_b.as_ref().unwrap().significant);
    assert!(matches!(
        mid.verdict(),
        Some(Verdict::ALeads) | Some(Verdict::Bidirectional)
    ));
    let beta = analysis.equation_b.as_ref().unwrap().beta1;
    assert!((beta - 1.0).abs() < 0.2, "beta {}", beta);

    // The spread never moves, so its deltas carry no information
    let spread = &tier.entries[1];
    assert_eq!(spread.variable, "spread");
    assert!(matches!(
        spread.outcome,
        VariableOutcome::InsufficientData { .. }
    ));
    assert!(tier.counts.insufficient_data >= 1);
}

#[tokio::test]
async fn test_sequential_and_concurrent_runs_agree() {
    let dir = TempDir::new().unwrap();
    let csv_path = prepare_csv(&dir);
    let config = Config::default();

    let sequential = tier_args(&csv_path, true).run(&config).await.unwrap();
    let concurrent = tier_args(&csv_path, false).run(&config).await.unwrap();
    assert_eq!(sequential, concurrent);
}

#[test]
fn test_all_tiers_written_to_parquet() {
    let dir = TempDir::new().unwrap();
    let csv_path = prepare_csv(&dir);
    let config = Config::default();

    let dataset = Arc::new(load_csv(&csv_path).unwrap());
    let aggregator = TierAggregator::new(config.analysis.clone(), config.platforms.clone());
    let reports = tokio_test::block_on(aggregator.run_all_concurrent(dataset)).unwrap();

    let variables: usize = config.analysis.tiers.iter().map(|t| t.variables.len()).sum();
    assert_eq!(reports.len(), 4);
    assert_eq!(
        reports.iter().map(|r| r.counts.total()).sum::<usize>(),
        variables
    );

    let writer = ResultsWriter::new(dir.path().join("output"));
    let now = Utc::now();
    let path = writer.file_path("tier_results", now);
    let rows = writer.write_tier_reports(&path, &reports, now).unwrap();
    assert_eq!(rows, variables);
    assert!(path.exists());
}

#[test]
fn test_missing_input_is_an_error() {
    let dir = TempDir::new().unwrap();
    let config = Config::default();
    let args = tier_args(&dir.path().join("absent.csv"), true);

    assert!(tokio_test::block_on(args.run(&config)).is_err());
}
