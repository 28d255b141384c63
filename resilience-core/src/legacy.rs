//! Bridge to the deprecated single-score (1-10) risk system
//!
//! Kept only until every consumer reads the four-tier classification.
//! Nothing here feeds back into the cascade.

use crate::category::{normalize_token, ParseCategoryError};
use crate::classify::Classification;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const LEGACY_SCORE_MIN: u8 = 1;
pub const LEGACY_SCORE_MAX: u8 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LegacyScoreError {
    #[error("legacy risk score must be between 1 and 10 (got {0})")]
    OutOfRange(i64),
}

/// Old-style risk label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegacyRiskLabel {
    VeryLow,
    Low,
    Medium,
    High,
}

impl LegacyRiskLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LegacyRiskLabel::VeryLow => "very_low",
            LegacyRiskLabel::Low => "low",
            LegacyRiskLabel::Medium => "medium",
            LegacyRiskLabel::High => "high",
        }
    }
}

impl fmt::Display for LegacyRiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LegacyRiskLabel {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "verylow" => Ok(LegacyRiskLabel::VeryLow),
            "low" => Ok(LegacyRiskLabel::Low),
            "medium" => Ok(LegacyRiskLabel::Medium),
            "high" => Ok(LegacyRiskLabel::High),
            _ => Err(ParseCategoryError {
                kind: "legacy risk label",
                value: s.to_string(),
            }),
        }
    }
}

pub fn legacy_score(classification: Classification) -> u8 {
    match classification {
        Classification::AiResilient => 2,
        Classification::AiAugmented => 4,
        Classification::InTransition => 6,
        Classification::HighDisruptionRisk => 8,
    }
}

pub fn legacy_label(classification: Classification) -> LegacyRiskLabel {
    match classification {
        Classification::AiResilient => LegacyRiskLabel::VeryLow,
        Classification::AiAugmented => LegacyRiskLabel::Low,
        Classification::InTransition => LegacyRiskLabel::Medium,
        Classification::HighDisruptionRisk => LegacyRiskLabel::High,
    }
}

pub fn classification_from_legacy_label(label: LegacyRiskLabel) -> Classification {
    match label {
        LegacyRiskLabel::VeryLow => Classification::AiResilient,
        LegacyRiskLabel::Low => Classification::AiAugmented,
        LegacyRiskLabel::Medium => Classification::InTransition,
        LegacyRiskLabel::High => Classification::HighDisruptionRisk,
    }
}

/// Map an old 1-10 risk score onto the four tiers
///
/// - 1-3: AI-Resilient
/// - 4-5: AI-Augmented
/// - 6-7: In Transition
/// - 8-10: High Disruption Risk
pub fn classification_from_legacy_score(score: i64) -> Result<Classification, LegacyScoreError> {
    if !(LEGACY_SCORE_MIN as i64..=LEGACY_SCORE_MAX as i64).contains(&score) {
        return Err(LegacyScoreError::OutOfRange(score));
    }
    Ok(if score <= 3 {
        Classification::AiResilient
    } else if score <= 5 {
        Classification::AiAugmented
    } else if score <= 7 {
        Classification::InTransition
    } else {
        Classification::HighDisruptionRisk
    })
}
