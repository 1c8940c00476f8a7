//! Preprocess command implementation

use clap::Args;
use std::path::PathBuf;

use crate::book::{load_snapshots, preprocess, sample_intervals};
use crate::config::Config;
use crate::data::save_csv;

#[derive(Args, Debug)]
pub struct PreprocessArgs {
    /// Snapshot JSON file (defaults to data.snapshots)
    #[arg(long)]
    pub snapshots: Option<PathBuf>,

    /// Output CSV (defaults to data.input)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Sampling interval in minutes, 0 keeps every snapshot
    #[arg(long)]
    pub interval_minutes: Option<u64>,
}

impl PreprocessArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let snapshots_path = self
            .snapshots
            .clone()
            .unwrap_or_else(|| config.data.snapshots.clone());
        let output = self.output.clone().unwrap_or_else(|| config.data.input.clone());
        let interval_minutes = self.interval_minutes.unwrap_or(config.data.interval_minutes);
        let platforms = config.platforms.clone();

        tracing::info!(
            snapshots = %snapshots_path.display(),
            output = %output.display(),
            interval_minutes,
            "Preprocessing snapshots"
        );

        let periods = tokio::task::spawn_blocking(move || -> anyhow::Result<usize> {
            let snapshots = load_snapshots(&snapshots_path)?;
            let interval_ms = i64::try_from(interval_minutes.saturating_mul(60_000))?;
            let sampled = sample_intervals(&snapshots, interval_ms);
            let dataset = preprocess(&sampled, &platforms)?;
            save_csv(&dataset, &output)?;
            Ok(dataset.periods())
        })
        .await??;

        println!("Preprocessed {} periods", periods);
        Ok(())
    }
}
