//! Tier aggregation
//!
//! Runs the VAR over every variable of a tier and tallies verdicts. A
//! variable that cannot be analyzed is reported, never dropped, and never
//! affects any other variable. No multiple-comparison correction is applied.

use std::sync::Arc;

use serde::Serialize;
use tokio::task::JoinSet;
use tracing::{info, warn};

use super::runner::VarRunner;
use super::types::{VarAnalysis, Verdict};
use crate::config::{AnalysisConfig, PlatformConfig, TierConfig};
use crate::data::Dataset;

/// Result of analyzing one variable inside a tier
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum VariableOutcome {
    /// Both Granger tests produced a result
    Determinate(VarAnalysis),
    /// Columns missing or too few valid rows; partial results kept if any
    InsufficientData {
        reason: String,
        analysis: Option<VarAnalysis>,
    },
}

/// One row of a tier report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableReport {
    pub variable: String,
    pub outcome: VariableOutcome,
}

impl VariableReport {
    pub fn analysis(&self) -> Option<&VarAnalysis> {
        match &self.outcome {
            VariableOutcome::Determinate(analysis) => Some(analysis),
            VariableOutcome::InsufficientData { analysis, .. } => analysis.as_ref(),
        }
    }

    pub fn verdict(&self) -> Option<Verdict> {
        match &self.outcome {
            VariableOutcome::Determinate(analysis) => analysis.verdict(),
            VariableOutcome::InsufficientData { .. } => None,
        }
    }

    /// Largest F of a determinate analysis
    pub fn strength(&self) -> Option<f64> {
        match &self.outcome {
            VariableOutcome::Determinate(analysis) => analysis.max_f(),
            VariableOutcome::InsufficientData { .. } => None,
        }
    }
}

/// Verdict distribution of a tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VerdictCounts {
    pub a_leads: usize,
    pub b_leads: usize,
    pub bidirectional: usize,
    pub no_relationship: usize,
    pub insufficient_data: usize,
}

impl VerdictCounts {
    fn record(&mut self, verdict: Option<Verdict>) {
        match verdict {
            Some(Verdict::ALeads) => self.a_leads += 1,
            Some(Verdict::BLeads) => self.b_leads += 1,
            Some(Verdict::Bidirectional) => self.bidirectional += 1,
            Some(Verdict::NoRelationship) => self.no_relationship += 1,
            None => self.insufficient_data += 1,
        }
    }

    /// Count of one verdict
    pub fn get(&self, verdict: Verdict) -> usize {
        match verdict {
            Verdict::ALeads => self.a_leads,
            Verdict::BLeads => self.b_leads,
            Verdict::Bidirectional => self.bidirectional,
            Verdict::NoRelationship => self.no_relationship,
        }
    }

    pub fn total(&self) -> usize {
        self.a_leads + self.b_leads + self.bidirectional + self.no_relationship + self.insufficient_data
    }
}

/// Results of one tier, in configured variable order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierReport {
    pub name: String,
    pub question: String,
    pub entries: Vec<VariableReport>,
    pub counts: VerdictCounts,
}

impl TierReport {
    fn new(tier: &TierConfig, entries: Vec<VariableReport>) -> Self {
        let mut counts = VerdictCounts::default();
        for entry in &entries {
            counts.record(entry.verdict());
        }

        Self {
            name: tier.name.clone(),
            question: tier.question.clone(),
            entries,
            counts,
        }
    }

    /// Determinate entries by descending max F, then the rest in order
    pub fn ranked_by_strength(&self) -> Vec<&VariableReport> {
        let mut ranked: Vec<&VariableReport> = self.entries.iter().collect();
        ranked.sort_by(|a, b| match (a.strength(), b.strength()) {
            (Some(fa), Some(fb)) => fb.total_cmp(&fa),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        ranked
    }

    /// Variable name to verdict mapping
    pub fn verdicts(&self) -> Vec<(&str, Option<Verdict>)> {
        self.entries
            .iter()
            .map(|e| (e.variable.as_str(), e.verdict()))
            .collect()
    }
}

/// Runs tiers of variables through the VAR runner
#[derive(Debug, Clone)]
pub struct TierAggregator {
    analysis: AnalysisConfig,
    platforms: PlatformConfig,
    runner: VarRunner,
}

impl TierAggregator {
    /// Create an aggregator over explicit tier definitions
    pub fn new(analysis: AnalysisConfig, platforms: PlatformConfig) -> Self {
        let runner = VarRunner::new(analysis.significance_level);
        Self {
            analysis,
            platforms,
            runner,
        }
    }

    pub fn tiers(&self) -> &[TierConfig] {
        &self.analysis.tiers
    }

    pub fn runner(&self) -> VarRunner {
        self.runner
    }

    pub fn platforms(&self) -> &PlatformConfig {
        &self.platforms
    }

    /// Analyze one variable of a dataset
    pub fn analyze_variable(&self, dataset: &Dataset, variable: &str) -> VariableReport {
        analyze_in(dataset, variable, &self.platforms, self.runner)
    }

    /// Run every variable of one tier sequentially
    pub fn run_tier(&self, dataset: &Dataset, tier: &TierConfig) -> TierReport {
        let entries = tier
            .variables
            .iter()
            .map(|v| self.analyze_variable(dataset, v))
            .collect();
        let report = TierReport::new(tier, entries);
        log_tier(&report);
        report
    }

    /// Run all configured tiers sequentially
    pub fn run_all(&self, dataset: &Dataset) -> Vec<TierReport> {
        self.analysis
            .tiers
            .iter()
            .map(|tier| self.run_tier(dataset, tier))
            .collect()
    }

    /// Run all configured tiers with one blocking task per variable
    ///
    /// Results are reassembled in configured order, so the output matches
    /// [`TierAggregator::run_all`].
    pub async fn run_all_concurrent(
        &self,
        dataset: Arc<Dataset>,
    ) -> anyhow::Result<Vec<TierReport>> {
        let tiers = &self.analysis.tiers;
        let mut slots: Vec<Vec<Option<VariableReport>>> = tiers
            .iter()
            .map(|t| vec![None; t.variables.len()])
            .collect();

        let mut set = JoinSet::new();
        for (t, tier) in tiers.iter().enumerate() {
            for (v, variable) in tier.variables.iter().enumerate() {
                let dataset = Arc::clone(&dataset);
                let platforms = self.platforms.clone();
                let runner = self.runner;
                let variable = variable.clone();
                set.spawn_blocking(move || {
                    (t, v, analyze_in(&dataset, &variable, &platforms, runner))
                });
            }
        }

        while let Some(joined) = set.join_next().await {
            let (t, v, report) = joined?;
            slots[t][v] = Some(report);
        }

        let mut reports = Vec::with_capacity(tiers.len());
        for (tier, entries) in tiers.iter().zip(slots) {
            let entries = entries
                .into_iter()
                .collect::<Option<Vec<_>>>()
                .ok_or_else(|| anyhow::anyhow!("Missing result in tier '{}'", tier.name))?;
            let report = TierReport::new(tier, entries);
            log_tier(&report);
            reports.push(report);
        }

        Ok(reports)
    }
}

fn analyze_in(
    dataset: &Dataset,
    variable: &str,
    platforms: &PlatformConfig,
    runner: VarRunner,
) -> VariableReport {
    let outcome = match dataset.variable_columns(variable, platforms) {
        Ok(columns) => {
            let analysis = runner.analyze(variable, &columns);
            if analysis.is_determinate() {
                VariableOutcome::Determinate(analysis)
            } else {
                let reason = analysis
                    .first_error()
                    .map(|e| e.to_string())
                    .unwrap_or_else(|| "indeterminate".to_string());
                VariableOutcome::InsufficientData {
                    reason,
                    analysis: Some(analysis),
                }
            }
        }
        Err(e) => {
            warn!(variable, error = %e, "Variable skipped");
            VariableOutcome::InsufficientData {
                reason: e.to_string(),
                analysis: None,
            }
        }
    };

    VariableReport {
        variable: variable.to_string(),
        outcome,
    }
}

fn log_tier(report: &TierReport) {
    info!(
        tier = %report.name,
        variables = report.entries.len(),
        a_leads = report.counts.a_leads,
        b_leads = report.counts.b_leads,
        bidirectional = report.counts.bidirectional,
        no_relationship = report.counts.no_relationship,
        insufficient_data = report.counts.insufficient_data,
        "Tier analyzed"
    );
}
