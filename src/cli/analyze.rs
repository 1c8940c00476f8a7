//! Analyze command implementation

use clap::Args;
use std::path::PathBuf;

use super::OutputFormat;
use crate::config::Config;
use crate::data::load_csv;
use crate::var::{format_detail, VarAnalysis, VarRunner};

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Variable name, e.g. mid or vwap_yes
    pub variable: String,

    /// Preprocessed CSV (defaults to data.input)
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

impl AnalyzeArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let analysis = self.run(config).await?;

        match self.format {
            OutputFormat::Table => println!("{}", format_detail(&analysis, &config.platforms)),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&analysis)?),
        }

        Ok(())
    }

    /// Load the dataset and analyze the requested variable
    pub async fn run(&self, config: &Config) -> anyhow::Result<VarAnalysis> {
        let path = self.input.clone().unwrap_or_else(|| config.data.input.clone());
        tracing::info!(variable = %self.variable, path = %path.display(), "Analyzing variable");

        let dataset = tokio::task::spawn_blocking(move || load_csv(path)).await??;
        let columns = dataset.variable_columns(&self.variable, &config.platforms)?;

        let analysis =
            VarRunner::new(config.analysis.significance_level).analyze(&self.variable, &columns);
        if let Some(e) = analysis.first_error() {
            tracing::warn!(variable = %self.variable, error = %e, "Analysis is indeterminate");
        }

        Ok(analysis)
    }
}
