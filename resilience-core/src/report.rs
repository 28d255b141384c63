//! Reporting and output generation
//!
//! Global invariants enforced:
//! - Deterministic output ordering (riskiest tier first, then code)
//! - Byte-for-byte identical output across runs for identical input

use crate::classify::{Classification, RuleId};
use crate::legacy::{legacy_label, legacy_score, LegacyRiskLabel};
use crate::pipeline::{AssessedOccupation, BatchResult};
use serde::{Deserialize, Serialize};

/// One row in a batch report
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct OccupationReport {
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub classification: Classification,
    pub rank: u8,
    pub rule: RuleId,
    pub rationale: String,
    pub legacy_score: u8,
    pub legacy_label: LegacyRiskLabel,
}

impl OccupationReport {
    pub fn from_assessed(occupation: &AssessedOccupation) -> Self {
        let classification = occupation.assessment.classification;
        OccupationReport {
            code: occupation.code.clone(),
            title: occupation.title.clone(),
            classification,
            rank: classification.rank(),
            rule: occupation.assessment.rule,
            rationale: occupation.assessment.rationale.clone(),
            legacy_score: legacy_score(classification),
            legacy_label: legacy_label(classification),
        }
    }
}

/// Count of occupations per tier
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct TierCount {
    pub classification: Classification,
    pub count: usize,
}

/// Full batch report
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct BatchReport {
    pub occupations: Vec<OccupationReport>,
    pub tiers: Vec<TierCount>,
    pub skipped: usize,
    pub filtered: usize,
    pub written: usize,
}

/// Sort rows deterministically
pub fn sort_reports(mut reports: Vec<OccupationReport>) -> Vec<OccupationReport> {
    reports.sort_by(|a, b| {
        // 1. Rank descending (riskiest first)
        b.rank
            .cmp(&a.rank)
            // 2. Code ascending
            .then_with(|| a.code.cmp(&b.code))
    });
    reports
}

/// Per-tier counts in rank order; tiers with no occupations are listed with 0
pub fn tier_counts(reports: &[OccupationReport]) -> Vec<TierCount> {
    Classification::ALL
        .iter()
        .map(|&classification| TierCount {
            classification,
            count: reports
                .iter()
                .filter(|r| r.classification == classification)
                .count(),
        })
        .collect()
}

/// Build a report from batch output, keeping at most `top_n` rows
pub fn build_report(result: &BatchResult, top_n: Option<usize>) -> BatchReport {
    let rows: Vec<OccupationReport> = result
        .assessed
        .iter()
        .map(OccupationReport::from_assessed)
        .collect();
    let tiers = tier_counts(&rows);

    let mut occupations = sort_reports(rows);
    if let Some(n) = top_n {
        occupations.truncate(n);
    }

    BatchReport {
        occupations,
        tiers,
        skipped: result.skipped.len(),
        filtered: result.filtered,
        written: result.written,
    }
}

/// Render a report as a text table
pub fn render_text(report: &BatchReport) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{:<22} {:<12} {:<32} {}\n",
        "CLASSIFICATION", "CODE", "TITLE", "RULE"
    ));

    for row in &report.occupations {
        output.push_str(&format!(
            "{:<22} {:<12} {:<32} {}\n",
            row.classification.as_str(),
            row.code,
            truncate_or_pad(row.title.as_deref().unwrap_or("-"), 32),
            row.rule,
        ));
    }

    output.push('\n');
    for tier in &report.tiers {
        output.push_str(&format!(
            "{} {:<22} {}\n",
            tier.classification.emoji(),
            tier.classification.as_str(),
            tier.count
        ));
    }
    if report.skipped > 0 {
        output.push_str(&format!("skipped: {}\n", report.skipped));
    }
    if report.filtered > 0 {
        output.push_str(&format!("filtered: {}\n", report.filtered));
    }

    output
}

/// Render a report as pretty JSON
pub fn render_json(report: &BatchReport) -> String {
    serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
}

/// Truncate or pad string to fixed width (counted in chars)
fn truncate_or_pad(s: &str, width: usize) -> String {
    if s.chars().count() > width {
        let kept: String = s.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        format!("{:<width$}", s, width = width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(code: &str, classification: Classification) -> OccupationReport {
        OccupationReport {
            code: code.to_string(),
            title: None,
            classification,
            rank: classification.rank(),
            rule: RuleId::Default,
            rationale: String::new(),
            legacy_score: legacy_score(classification),
            legacy_label: legacy_label(classification),
        }
    }

    #[test]
    fn test_sort_riskiest_first_then_code() {
        let sorted = sort_reports(vec![
            row("15-0002", Classification::AiResilient),
            row("43-0001", Classification::HighDisruptionRisk),
            row("15-0001", Classification::AiResilient),
            row("41-0001", Classification::InTransition),
        ]);
        let codes: Vec<&str> = sorted.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["43-0001", "41-0001", "15-0001", "15-0002"]);
    }

    #[test]
    fn test_tier_counts_cover_all_tiers() {
        let counts = tier_counts(&[
            row("a", Classification::AiAugmented),
            row("b", Classification::AiAugmented),
        ]);
        assert_eq!(counts.len(), 4);
        assert_eq!(counts[0].count, 0);
        assert_eq!(counts[1].count, 2);
    }

    #[test]
    fn test_truncate_or_pad_multibyte() {
        assert_eq!(truncate_or_pad("Médico", 8), "Médico  ");
        assert_eq!(truncate_or_pad("Técnico de enfermería", 10), "Técnico...");
    }

    #[test]
    fn test_render_text_lists_tiers() {
        let report = BatchReport {
            occupations: vec![row("29-1141.00", Classification::AiResilient)],
            tiers: tier_counts(&[row("29-1141.00", Classification::AiResilient)]),
            skipped: 1,
            filtered: 0,
            written: 0,
        };
        let text = render_text(&report);
        assert!(text.starts_with("CLASSIFICATION"));
        assert!(text.contains("29-1141.00"));
        assert!(text.contains("High Disruption Risk"));
        assert!(text.contains("skipped: 1"));
        assert!(!text.contains("filtered:"));
    }
}
