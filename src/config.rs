//! Configuration types for poly-leadlag

use serde::Deserialize;
use std::collections::HashSet;
use std::path::PathBuf;

use crate::series::Platform;
use crate::telemetry::LogFormat;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub platforms: PlatformConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Display labels and column prefixes of the two platforms
#[derive(Debug, Clone, Deserialize)]
pub struct PlatformConfig {
    /// Display label for series A
    #[serde(default = "default_a_label")]
    pub a_label: String,

    /// Column prefix for series A (`{prefix}_{var}`, `d_{prefix}_{var}`)
    #[serde(default = "default_a_prefix")]
    pub a_prefix: String,

    /// Display label for series B
    #[serde(default = "default_b_label")]
    pub b_label: String,

    /// Column prefix for series B
    #[serde(default = "default_b_prefix")]
    pub b_prefix: String,
}

fn default_a_label() -> String {
    "Polymarket".to_string()
}
fn default_a_prefix() -> String {
    "poly".to_string()
}
fn default_b_label() -> String {
    "Kalshi".to_string()
}
fn default_b_prefix() -> String {
    "kalshi".to_string()
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            a_label: default_a_label(),
            a_prefix: default_a_prefix(),
            b_label: default_b_label(),
            b_prefix: default_b_prefix(),
        }
    }
}

impl PlatformConfig {
    /// Display label for a platform
    pub fn label(&self, platform: Platform) -> &str {
        match platform {
            Platform::A => &self.a_label,
            Platform::B => &self.b_label,
        }
    }

    /// Column prefix for a platform
    pub fn prefix(&self, platform: Platform) -> &str {
        match platform {
            Platform::A => &self.a_prefix,
            Platform::B => &self.b_prefix,
        }
    }

    /// Leveled value column, e.g. `poly_mid`
    pub fn level_column(&self, platform: Platform, variable: &str) -> String {
        format!("{}_{}", self.prefix(platform), variable)
    }

    /// Current-period delta column, e.g. `d_poly_mid`
    pub fn delta_column(&self, platform: Platform, variable: &str) -> String {
        format!("d_{}_{}", self.prefix(platform), variable)
    }

    /// Lag-1 delta column, e.g. `d_poly_mid_lag1`
    pub fn lag_column(&self, platform: Platform, variable: &str) -> String {
        format!("d_{}_{}_lag1", self.prefix(platform), variable)
    }
}

/// One named group of variables analyzed together
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TierConfig {
    pub name: String,
    /// Question the tier answers, shown in reports
    #[serde(default)]
    pub question: String,
    pub variables: Vec<String>,
}

impl TierConfig {
    fn new(name: &str, question: &str, variables: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            question: question.to_string(),
            variables: variables.iter().map(|v| v.to_string()).collect(),
        }
    }
}

/// VAR analysis configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    /// Granger test significance level
    #[serde(default = "default_significance_level")]
    pub significance_level: f64,

    /// Tier definitions, analyzed in order
    #[serde(default = "default_tiers")]
    pub tiers: Vec<TierConfig>,
}

fn default_significance_level() -> f64 {
    0.05
}

fn default_tiers() -> Vec<TierConfig> {
    vec![
        TierConfig::new(
            "Tier 1: Price Signals",
            "When prices move, which platform moves first?",
            &["mid", "spread", "best_bid_yes", "best_bid_no"],
        ),
        TierConfig::new(
            "Tier 2: Liquidity Depth",
            "When liquidity shifts, which platform shows it first?",
            &[
                "depth_best_yes",
                "depth_best_no",
                "depth_top3_yes",
                "depth_top3_no",
                "total_depth_yes",
                "total_depth_no",
            ],
        ),
        TierConfig::new(
            "Tier 3: Order Imbalances",
            "When buying/selling pressure builds, where does it appear first?",
            &["imbalance_best", "imbalance_top3", "imbalance_total"],
        ),
        TierConfig::new(
            "Tier 4: Book Structure",
            "When the orderbook structure changes, which platform leads?",
            &[
                "depth_5c_yes",
                "depth_5c_no",
                "num_levels_yes",
                "num_levels_no",
                "vwap_yes",
                "vwap_no",
            ],
        ),
    ]
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            significance_level: default_significance_level(),
            tiers: default_tiers(),
        }
    }
}

impl AnalysisConfig {
    /// All configured variables, in tier order, without duplicates
    pub fn variables(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.tiers
            .iter()
            .flat_map(|t| t.variables.iter())
            .filter(|v| seen.insert(v.as_str()))
            .map(|v| v.as_str())
            .collect()
    }

    /// Find a tier by name (case-insensitive)
    pub fn tier(&self, name: &str) -> Option<&TierConfig> {
        self.tiers
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
    }
}

/// Dataset locations and preprocessing
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    /// Raw paired order book snapshots (JSON)
    #[serde(default = "default_snapshots")]
    pub snapshots: PathBuf,

    /// Preprocessed delta/lag CSV consumed by the analysis
    #[serde(default = "default_input")]
    pub input: PathBuf,

    /// Sampling interval for preprocessing, 0 keeps every snapshot
    #[serde(default = "default_interval_minutes")]
    pub interval_minutes: u64,

    /// Directory for reports and Parquet results
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_snapshots() -> PathBuf {
    PathBuf::from("./data/orderbooks.json")
}
fn default_interval_minutes() -> u64 {
    30
}
fn default_input() -> PathBuf {
    PathBuf::from("./data/preprocessed.csv")
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./output")
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            snapshots: default_snapshots(),
            input: default_input(),
            interval_minutes: default_interval_minutes(),
            output_dir: default_output_dir(),
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the analysis cannot run with
    pub fn validate(&self) -> anyhow::Result<()> {
        let alpha = self.analysis.significance_level;
        if !(alpha > 0.0 && alpha < 1.0) {
            anyhow::bail!("significance_level must be in (0, 1), got {}", alpha);
        }

        if self.platforms.a_prefix == self.platforms.b_prefix {
            anyhow::bail!(
                "platform prefixes must differ, both are '{}'",
                self.platforms.a_prefix
            );
        }

        for tier in &self.analysis.tiers {
            if tier.variables.is_empty() {
                anyhow::bail!("tier '{}' has no variables", tier.name);
            }
            let mut seen = HashSet::new();
            for variable in &tier.variables {
                if !seen.insert(variable) {
                    anyhow::bail!("tier '{}' lists '{}' twice", tier.name, variable);
                }
            }
        }

        Ok(())
    }
}
