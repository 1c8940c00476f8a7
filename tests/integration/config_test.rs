//! Configuration loading tests

use poly_leadlag::config::Config;
use poly_leadlag::telemetry::LogFormat;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_config_example_loads() {
    let config = Config::load("config.toml.example").unwrap();

    assert_eq!(config.platforms.a_prefix, "poly");
    assert_eq!(config.platforms.b_prefix, "kalshi");
    assert_eq!(config.analysis.significance_level, 0.05);
    assert_eq!(config.analysis.tiers.len(), 4);
    assert_eq!(config.analysis.variables().len(), 19);
    assert_eq!(config.data.interval_minutes, 30);
    assert_eq!(config.telemetry.log_format, LogFormat::Pretty);
}

#[test]
fn test_config_example_matches_defaults() {
    let example: Config = toml::from_str(include_str!("../../config.toml.example")).unwrap();
    let defaults = Config::default();

    assert_eq!(example.analysis.tiers, defaults.analysis.tiers);
    assert_eq!(example.platforms.a_label, defaults.platforms.a_label);
    assert_eq!(example.data.input, defaults.data.input);
}

#[test]
fn test_config_load_rejects_invalid() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
        [analysis]
        significance_level = 0.0
        "#
    )
    .unwrap();

    let err = Config::load(file.path()).unwrap_err();
    assert!(err.to_string().contains("significance_level"));
}

#[test]
fn test_config_partial_sections() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
        [platforms]
        a_label = "Venue A"

        [telemetry]
        log_format = "json"
        "#
    )
    .unwrap();

    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.platforms.a_label, "Venue A");
    assert_eq!(config.platforms.a_prefix, "poly");
    assert_eq!(config.telemetry.log_format, LogFormat::Json);
    assert_eq!(config.analysis.tiers.len(), 4);
}
