//! Absent values through the CSV, series and VAR layers

use poly_leadlag::config::PlatformConfig;
use poly_leadlag::data::read_csv;
use poly_leadlag::regression::AnalysisError;
use poly_leadlag::series::{Platform, Series};
use poly_leadlag::var::{VarRunner, VariableColumns};

const WORKED_CSV: &str = "\
timestamp_ms,d_poly_mid,d_kalshi_mid,d_poly_mid_lag1,d_kalshi_mid_lag1
0,,,,
1800000,0.02,,,
3600000,0.03,,0.02,
5400000,-0.01,0.02,0.03,
7200000,0.02,0.02,-0.01,0.02
";

#[test]
fn test_gap_in_b_removes_feature_rows() {
    let a = Series::from_values("mid", Platform::A, [0.50, 0.52, 0.55, 0.54, 0.56].map(Some));
    let b = Series::from_values(
        "mid",
        Platform::B,
        vec![Some(0.48), None, Some(0.53), Some(0.55), Some(0.57)],
    );

    let columns = VariableColumns::from_series(&a, &b).unwrap();
    assert_eq!(columns.y_b[..3], [None, None, None]);
    assert_eq!(columns.x_b_lag[..4], [None, None, None, None]);

    let result = VarRunner::default().analyze("mid", &columns);
    assert_eq!(result.n_observations, 1);
    assert_eq!(
        result.equation_a,
        Err(AnalysisError::InsufficientData {
            required: 4,
            available: 1
        })
    );
    assert!(result.verdict().is_none());
}

#[test]
fn test_csv_columns_match_series_derivation() {
    let dataset = read_csv(WORKED_CSV.as_bytes()).unwrap();
    let from_csv = dataset
        .variable_columns("mid", &PlatformConfig::default())
        .unwrap();

    let a = Series::from_values("mid", Platform::A, [0.50, 0.52, 0.55, 0.54, 0.56].map(Some));
    let b = Series::from_values(
        "mid",
        Platform::B,
        vec![Some(0.48), None, Some(0.53), Some(0.55), Some(0.57)],
    );
    let derived = VariableColumns::from_series(&a, &b).unwrap();

    for (csv, series) in [
        (&from_csv.y_a, &derived.y_a),
        (&from_csv.y_b, &derived.y_b),
        (&from_csv.x_a_lag, &derived.x_a_lag),
        (&from_csv.x_b_lag, &derived.x_b_lag),
    ] {
        assert_eq!(csv.len(), series.len());
        for (x, y) in csv.iter().zip(series.iter()) {
            match (x, y) {
                (Some(x), Some(y)) => assert!((x - y).abs() < 1e-9),
                (None, None) => {}
                other => panic!("presence differs: {:?}", other),
            }
        }
    }
}

#[test]
fn test_mismatched_lengths_rejected() {
    let err = VariableColumns::new(vec![None; 3], vec![None; 3], vec![None; 3], vec![None; 2])
        .unwrap_err();
    assert_eq!(
        err,
        AnalysisError::LengthMismatch {
            expected: 3,
            found: 2
        }
    );
}
