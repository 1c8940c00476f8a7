//! Tiers command implementation

use chrono::Utc;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

use super::OutputFormat;
use crate::config::{AnalysisConfig, Config};
use crate::data::{load_csv, ResultsWriter};
use crate::var::{format_summary, format_table, TierAggregator, TierReport};

#[derive(Args, Debug)]
pub struct TiersArgs {
    /// Preprocessed CSV (defaults to data.input)
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Run only the tier with this name
    #[arg(long)]
    pub tier: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Also write results to Parquet
    #[arg(long)]
    pub parquet: bool,

    /// Output directory for Parquet results (defaults to data.output_dir)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Analyze variables one at a time instead of concurrently
    #[arg(long)]
    pub sequential: bool,
}

impl TiersArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let reports = self.run(config).await?;

        match self.format {
            OutputFormat::Table => {
                for report in &reports {
                    println!("{}", format_table(report, &config.platforms));
                }
                println!(
                    "{}",
                    format_summary(&reports, &config.platforms, config.analysis.significance_level)
                );
            }
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
        }

        if self.parquet {
            let output = self
                .output
                .clone()
                .unwrap_or_else(|| config.data.output_dir.clone());
            let writer = ResultsWriter::new(output);
            let now = Utc::now();
            let path = writer.file_path("tier_results", now);
            let rows = writer.write_tier_reports(&path, &reports, now)?;
            tracing::info!(path = %path.display(), rows, "Wrote tier results");
        }

        Ok(())
    }

    /// Load the dataset and run the selected tiers
    pub async fn run(&self, config: &Config) -> anyhow::Result<Vec<TierReport>> {
        let analysis = self.selected(&config.analysis)?;
        let path = self.input.clone().unwrap_or_else(|| config.data.input.clone());
        tracing::info!(
            path = %path.display(),
            tiers = analysis.tiers.len(),
            "Running tier analysis"
        );

        let dataset = tokio::task::spawn_blocking(move || load_csv(path)).await??;
        let aggregator = TierAggregator::new(analysis, config.platforms.clone());

        if self.sequential {
            Ok(aggregator.run_all(&dataset))
        } else {
            aggregator.run_all_concurrent(Arc::new(dataset)).await
        }
    }

    fn selected(&self, analysis: &AnalysisConfig) -> anyhow::Result<AnalysisConfig> {
        let Some(name) = &self.tier else {
            return Ok(analysis.clone());
        };

        let tier = analysis
            .tier(name)
            .ok_or_else(|| anyhow::anyhow!("Unknown tier '{}'", name))?;
        Ok(AnalysisConfig {
            significance_level: analysis.significance_level,
            tiers: vec![tier.clone()],
        })
    }
}
