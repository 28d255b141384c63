//! Per-occupation assessment record
//!
//! Raw signals flow one way: derivation -> cascade -> record. The record is
//! immutable and rebuilt wholesale whenever any upstream source changes.

use crate::category::{job_growth_category, AutomationPotential, JobGrowthCategory, TaskExposure};
use crate::classify::{classify, Classification, RuleId};
use crate::epoch::{epoch_sum, human_advantage_from_epoch, EpochScores, HumanAdvantageCategory};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Version label written into every record produced by this ruleset
pub const METHODOLOGY_VERSION: &str = "1.0";

/// Default label for where percent-change projections come from
pub const DEFAULT_DATA_SOURCE: &str = "BLS Employment Projections";

/// Raw per-occupation inputs as they appear in occupation records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OccupationSignals {
    pub task_exposure: TaskExposure,
    /// Falls back to `task_exposure` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub automation_potential: Option<AutomationPotential>,
    pub percent_change: f64,
    pub epoch_scores: EpochScores,
}

/// Run-level metadata stamped onto each record
#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentContext {
    pub last_updated: DateTime<Utc>,
    pub data_source: String,
    pub methodology_version: String,
}

impl AssessmentContext {
    pub fn new(last_updated: DateTime<Utc>) -> Self {
        AssessmentContext {
            last_updated,
            data_source: DEFAULT_DATA_SOURCE.to_string(),
            methodology_version: METHODOLOGY_VERSION.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobGrowthAssessment {
    pub category: JobGrowthCategory,
    pub percent_change: f64,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HumanAdvantageAssessment {
    pub category: HumanAdvantageCategory,
    pub epoch_scores: EpochScores,
    pub epoch_sum: u32,
}

/// Complete AI resilience assessment for one occupation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerAiAssessment {
    pub task_exposure: TaskExposure,
    pub automation_potential: AutomationPotential,
    pub job_growth: JobGrowthAssessment,
    pub human_advantage: HumanAdvantageAssessment,
    pub classification: Classification,
    pub rule: RuleId,
    pub rationale: String,
    pub last_updated: DateTime<Utc>,
    pub methodology_version: String,
}

/// Build an assessment from raw signals
///
/// # Panics
///
/// Panics if `signals.percent_change` is NaN (see [`job_growth_category`]).
pub fn assess(signals: &OccupationSignals, context: &AssessmentContext) -> CareerAiAssessment {
    let task_exposure = signals.task_exposure;
    let automation_potential = signals.automation_potential.unwrap_or(task_exposure);
    let growth = job_growth_category(signals.percent_change);
    let human = human_advantage_from_epoch(&signals.epoch_scores);

    let outcome = classify(task_exposure, automation_potential, growth, human);

    CareerAiAssessment {
        task_exposure,
        automation_potential,
        job_growth: JobGrowthAssessment {
            category: growth,
            percent_change: signals.percent_change,
            source: context.data_source.clone(),
        },
        human_advantage: HumanAdvantageAssessment {
            category: human,
            epoch_scores: signals.epoch_scores,
            epoch_sum: epoch_sum(&signals.epoch_scores),
        },
        classification: outcome.classification,
        rule: outcome.rule,
        rationale: outcome.rationale.to_string(),
        last_updated: context.last_updated,
        methodology_version: context.methodology_version.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::ExposureLevel;
    use chrono::TimeZone;

    fn fixed_context() -> AssessmentContext {
        AssessmentContext::new(Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap())
    }

    #[test]
    fn test_assess_strong_human_advantage() {
        let signals = OccupationSignals {
            task_exposure: ExposureLevel::Medium,
            automation_potential: None,
            percent_change: 3.0,
            epoch_scores: EpochScores::new(5, 5, 4, 4, 3).unwrap(),
        };
        let record = assess(&signals, &fixed_context());

        assert_eq!(record.automation_potential, ExposureLevel::Medium);
        assert_eq!(record.job_growth.category, JobGrowthCategory::Stable);
        assert_eq!(record.human_advantage.epoch_sum, 21);
        assert_eq!(
            record.human_advantage.category,
            HumanAdvantageCategory::Strong
        );
        assert_eq!(record.classification, Classification::AiResilient);
        assert_eq!(record.rule, RuleId::StrongHumanAdvantage);
        assert_eq!(record.methodology_version, METHODOLOGY_VERSION);
        assert_eq!(record.job_growth.source, DEFAULT_DATA_SOURCE);
    }

    #[test]
    fn test_explicit_automation_potential_is_kept() {
        let signals = OccupationSignals {
            task_exposure: ExposureLevel::High,
            automation_potential: Some(ExposureLevel::Low),
            percent_change: -12.5,
            epoch_scores: EpochScores::new(1, 2, 2, 2, 2).unwrap(),
        };
        let record = assess(&signals, &fixed_context());
        assert_eq!(record.automation_potential, ExposureLevel::Low);
        assert_eq!(record.classification, Classification::HighDisruptionRisk);
        assert_eq!(record.rule, RuleId::MaximumRisk);
    }

    #[test]
    fn test_record_json_shape() {
        let signals = OccupationSignals {
            task_exposure: ExposureLevel::Low,
            automation_potential: None,
            percent_change: 8.0,
            epoch_scores: EpochScores::new(3, 3, 3, 3, 3).unwrap(),
        };
        let json = serde_json::to_value(assess(&signals, &fixed_context())).unwrap();

        assert_eq!(json["taskExposure"], "Low");
        assert_eq!(json["jobGrowth"]["category"], "Growing Slowly");
        assert_eq!(json["jobGrowth"]["percentChange"], 8.0);
        assert_eq!(json["humanAdvantage"]["epochSum"], 15);
        assert_eq!(json["classification"], "AI-Resilient");
        assert_eq!(json["rule"], "growing-low-exposure");
        assert_eq!(json["lastUpdated"], "2025-01-15T00:00:00Z");
        assert_eq!(json["methodologyVersion"], "1.0");
    }

    #[test]
    fn test_record_reads_back() {
        let signals = OccupationSignals {
            task_exposure: ExposureLevel::High,
            automation_potential: None,
            percent_change: 1.0,
            epoch_scores: EpochScores::new(2, 2, 2, 2, 2).unwrap(),
        };
        let record = assess(&signals, &fixed_context());
        let text = serde_json::to_string(&record).unwrap();
        let back: CareerAiAssessment = serde_json::from_str(&text).unwrap();
        assert_eq!(back, record);
    }
}
