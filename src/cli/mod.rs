//! CLI interface for poly-leadlag
//!
//! Provides subcommands for:
//! - `analyze`: Lag-1 VAR and Granger tests for one variable
//! - `tiers`: Run every configured tier and report verdicts
//! - `preprocess`: Build the delta/lag dataset from book snapshots
//! - `config`: Show configuration

mod analyze;
mod preprocess;
mod tiers;

pub use analyze::AnalyzeArgs;
pub use preprocess::PreprocessArgs;
pub use tiers::TiersArgs;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "poly-leadlag")]
#[command(about = "Lead/lag analysis between Polymarket and Kalshi order books")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze one variable
    Analyze(AnalyzeArgs),
    /// Analyze all configured tiers
    Tiers(TiersArgs),
    /// Preprocess order book snapshots into a dataset
    Preprocess(PreprocessArgs),
    /// Show configuration
    Config,
}

/// Report output format
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_analyze() {
        let cli = Cli::try_parse_from(["poly-leadlag", "analyze", "mid", "--format", "json"]).unwrap();
        assert_eq!(cli.config, "config.toml");
        match cli.command {
            Commands::Analyze(args) => {
                assert_eq!(args.variable, "mid");
                assert_eq!(args.format, OutputFormat::Json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_tiers() {
        let cli = Cli::try_parse_from([
            "poly-leadlag",
            "--config",
            "custom.toml",
            "tiers",
            "--tier",
            "Tier 1: Price Signals",
            "--parquet",
        ])
        .unwrap();
        assert_eq!(cli.config, "custom.toml");
        match cli.command {
            Commands::Tiers(args) => {
                assert_eq!(args.tier.as_deref(), Some("Tier 1: Price Signals"));
                assert!(args.parquet);
                assert!(!args.sequential);
                assert_eq!(args.format, OutputFormat::Table);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_preprocess() {
        let cli = Cli::try_parse_from(["poly-leadlag", "preprocess", "--interval-minutes", "0"]).unwrap();
        match cli.command {
            Commands::Preprocess(args) => assert_eq!(args.interval_minutes, Some(0)),
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
