//! Text rendering of VAR results for CLI output

use super::tier::{TierReport, VariableOutcome, VariableReport};
use super::types::{VarAnalysis, Verdict};
use crate::config::PlatformConfig;
use crate::granger::GrangerResult;
use crate::regression::{AnalysisError, TwoFactorFit};
use crate::series::Platform;

const HEAVY_RULE: &str = "══════════════════════════════════════════════════════════════════════════════";
const LIGHT_RULE: &str = "──────────────────────────────────────────────────────────────────────────────";

fn equation_line(
    fit: &Result<TwoFactorFit, AnalysisError>,
    target: Platform,
    platforms: &PlatformConfig,
) -> String {
    let a = platforms.label(Platform::A);
    let b = platforms.label(Platform::B);
    let y = platforms.label(target);
    match fit {
        Ok(fit) => format!(
            "Δ{y}_t = {:.6} {:+.4}·Δ{a}_{{t-1}} {:+.4}·Δ{b}_{{t-1}}\nR² = {:.4} ({:.1}% of variance explained, n = {})",
            fit.intercept,
            fit.beta1,
            fit.beta2,
            fit.r_squared,
            fit.r_squared * 100.0,
            fit.n,
        ),
        Err(e) => format!("Δ{y}_t: {e}"),
    }
}

fn test_line(result: &Result<GrangerResult, AnalysisError>) -> String {
    match result {
        Ok(r) => format!(
            "F = {:.3}, p = {:.4} {}",
            r.f_statistic,
            r.p_value,
            if r.significant { "***" } else { "(not significant)" }
        ),
        Err(e) => format!("indeterminate ({e})"),
    }
}

fn short_test(result: &Result<GrangerResult, AnalysisError>) -> String {
    match result {
        Ok(r) => format!("F={:.1}{}", r.f_statistic, if r.significant { "***" } else { "" }),
        Err(_) => "n/a".to_string(),
    }
}

/// One-line reading of a verdict
pub fn interpretation(analysis: &VarAnalysis, platforms: &PlatformConfig) -> String {
    let a = platforms.label(Platform::A);
    let b = platforms.label(Platform::B);
    match analysis.verdict() {
        Some(Verdict::ALeads) => match analysis.leader_beta() {
            Some(beta) => format!("{a} moves -> {b} follows ({beta:.2}x)"),
            None => format!("{a} moves -> {b} follows"),
        },
        Some(Verdict::BLeads) => match analysis.leader_beta() {
            Some(beta) => format!("{b} moves -> {a} follows ({beta:.2}x)"),
            None => format!("{b} moves -> {a} follows"),
        },
        Some(Verdict::Bidirectional) => "Bidirectional flow".to_string(),
        Some(Verdict::NoRelationship) => "No significant cross-platform flow".to_string(),
        None => "Insufficient data".to_string(),
    }
}

fn leader_label(verdict: Option<Verdict>, platforms: &PlatformConfig) -> String {
    match verdict {
        Some(Verdict::ALeads) => platforms.label(Platform::A).to_uppercase(),
        Some(Verdict::BLeads) => platforms.label(Platform::B).to_uppercase(),
        Some(Verdict::Bidirectional) => "BOTH".to_string(),
        Some(Verdict::NoRelationship) => "-".to_string(),
        None => "?".to_string(),
    }
}

/// Full report for a single variable
pub fn format_detail(analysis: &VarAnalysis, platforms: &PlatformConfig) -> String {
    let a = platforms.label(Platform::A);
    let b = platforms.label(Platform::B);

    format!(
        r#"
{HEAVY_RULE}
VAR RESULTS: {}
{HEAVY_RULE}
Observations: {}

REGRESSION 1: PREDICTING Δ{a}
{LIGHT_RULE}
{}

REGRESSION 2: PREDICTING Δ{b}
{LIGHT_RULE}
{}

GRANGER CAUSALITY
{LIGHT_RULE}
{b} -> {a}:  {}
{a} -> {b}:  {}

INTERPRETATION
{LIGHT_RULE}
-> {}
{HEAVY_RULE}
"#,
        analysis.variable.to_uppercase(),
        analysis.n_observations,
        equation_line(&analysis.equation_a, Platform::A, platforms),
        equation_line(&analysis.equation_b, Platform::B, platforms),
        test_line(&analysis.b_to_a),
        test_line(&analysis.a_to_b),
        interpretation(analysis, platforms),
    )
}

fn table_row(entry: &VariableReport, platforms: &PlatformConfig) -> String {
    match &entry.outcome {
        VariableOutcome::Determinate(analysis) => format!(
            "{:<20} {:<18} {:<18} {:<12} {}",
            entry.variable,
            short_test(&analysis.a_to_b),
            short_test(&analysis.b_to_a),
            leader_label(analysis.verdict(), platforms),
            interpretation(analysis, platforms),
        ),
        VariableOutcome::InsufficientData { reason, .. } => format!(
            "{:<20} {:<18} {:<18} {:<12} {}",
            entry.variable, "n/a", "n/a", "?", reason
        ),
    }
}

/// Table of one tier, one row per variable in configured order
pub fn format_table(report: &TierReport, platforms: &PlatformConfig) -> String {
    let a = platforms.label(Platform::A);
    let b = platforms.label(Platform::B);
    let c = &report.counts;

    let question = if report.question.is_empty() {
        String::new()
    } else {
        format!("Question: {}\n", report.question)
    };
    let header = format!(
        "{:<20} {:<18} {:<18} {:<12} {}",
        "Variable",
        format!("{a}->{b}"),
        format!("{b}->{a}"),
        "Leader",
        "Interpretation"
    );
    let rows: Vec<String> = report
        .entries
        .iter()
        .map(|entry| table_row(entry, platforms))
        .collect();

    format!(
        r#"
{HEAVY_RULE}
{}
{question}{HEAVY_RULE}

{header}
{LIGHT_RULE}
{}
{LIGHT_RULE}
{a} leads: {}   {b} leads: {}   Both: {}   None: {}   Insufficient data: {}
"#,
        report.name.to_uppercase(),
        rows.join("\n"),
        c.a_leads,
        c.b_leads,
        c.bidirectional,
        c.no_relationship,
        c.insufficient_data,
    )
}

fn summary_section(report: &TierReport, platforms: &PlatformConfig) -> String {
    let mut lines: Vec<String> = report
        .ranked_by_strength()
        .into_iter()
        .filter_map(|entry| {
            let analysis = entry.analysis()?;
            if !matches!(analysis.verdict(), Some(v) if v != Verdict::NoRelationship) {
                return None;
            }
            Some(format!(
                "  - {:<18} {} (max F={:.1})",
                entry.variable,
                interpretation(analysis, platforms),
                analysis.max_f().unwrap_or(0.0),
            ))
        })
        .collect();
    if lines.is_empty() {
        lines.push("  No significant cross-platform flow".to_string());
    }

    format!(
        "\n{}\n{LIGHT_RULE}\n{}\n",
        report.name.to_uppercase(),
        lines.join("\n")
    )
}

/// Strongest effects across all tiers, followed by the notation key
pub fn format_summary(reports: &[TierReport], platforms: &PlatformConfig, alpha: f64) -> String {
    let mut out = format!("\n{HEAVY_RULE}\nSUMMARY OF FINDINGS\n{HEAVY_RULE}\n");
    for report in reports {
        out.push_str(&summary_section(report, platforms));
    }
    out.push_str(&format!(
        "\n*** = significant at p < {alpha}; no multiple-comparison correction is applied\n{HEAVY_RULE}\n"
    ));
    out
}
