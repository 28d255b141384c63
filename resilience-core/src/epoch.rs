//! EPOCH human-advantage scoring
//!
//! EPOCH = Empathy, Presence, Opinion, Creativity, Hope. Each dimension is a
//! curated 1-5 score; the sum (5-25) is banded into a human-advantage category.

use crate::category::{normalize_token, ParseCategoryError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const EPOCH_MIN: u8 = 1;
pub const EPOCH_MAX: u8 = 5;

/// Minimum EPOCH sum for a strong human advantage
pub const STRONG_MIN_SUM: u32 = 20;
/// Minimum EPOCH sum for a moderate human advantage
pub const MODERATE_MIN_SUM: u32 = 12;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EpochError {
    #[error("EPOCH {dimension} score must be between 1 and 5 (got {value})")]
    OutOfRange { dimension: &'static str, value: i64 },
}

/// The five curated EPOCH sub-scores for one occupation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawEpochScores")]
pub struct EpochScores {
    pub empathy: u8,
    pub presence: u8,
    pub opinion: u8,
    pub creativity: u8,
    pub hope: u8,
}

/// Unchecked wire form, validated on the way in
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawEpochScores {
    empathy: i64,
    presence: i64,
    opinion: i64,
    creativity: i64,
    hope: i64,
}

impl TryFrom<RawEpochScores> for EpochScores {
    type Error = EpochError;

    fn try_from(raw: RawEpochScores) -> Result<Self, Self::Error> {
        Ok(EpochScores {
            empathy: check_range("empathy", raw.empathy)?,
            presence: check_range("presence", raw.presence)?,
            opinion: check_range("opinion", raw.opinion)?,
            creativity: check_range("creativity", raw.creativity)?,
            hope: check_range("hope", raw.hope)?,
        })
    }
}

fn check_range(dimension: &'static str, value: i64) -> Result<u8, EpochError> {
    if (EPOCH_MIN as i64..=EPOCH_MAX as i64).contains(&value) {
        Ok(value as u8)
    } else {
        Err(EpochError::OutOfRange { dimension, value })
    }
}

impl EpochScores {
    /// Build a validated score set; every sub-score must be in 1..=5
    pub fn new(
        empathy: u8,
        presence: u8,
        opinion: u8,
        creativity: u8,
        hope: u8,
    ) -> Result<Self, EpochError> {
        RawEpochScores {
            empathy: empathy as i64,
            presence: presence as i64,
            opinion: opinion as i64,
            creativity: creativity as i64,
            hope: hope as i64,
        }
        .try_into()
    }

    /// Sub-scores in E, P, O, C, H order
    pub fn as_array(&self) -> [u8; 5] {
        [
            self.empathy,
            self.presence,
            self.opinion,
            self.creativity,
            self.hope,
        ]
    }
}

/// Strength of the human-only skills an occupation depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HumanAdvantageCategory {
    Weak,
    Moderate,
    Strong,
}

impl HumanAdvantageCategory {
    pub const ALL: [HumanAdvantageCategory; 3] = [
        HumanAdvantageCategory::Weak,
        HumanAdvantageCategory::Moderate,
        HumanAdvantageCategory::Strong,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HumanAdvantageCategory::Weak => "Weak",
            HumanAdvantageCategory::Moderate => "Moderate",
            HumanAdvantageCategory::Strong => "Strong",
        }
    }
}

impl fmt::Display for HumanAdvantageCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HumanAdvantageCategory {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "weak" => Ok(HumanAdvantageCategory::Weak),
            "moderate" => Ok(HumanAdvantageCategory::Moderate),
            "strong" => Ok(HumanAdvantageCategory::Strong),
            _ => Err(ParseCategoryError {
                kind: "human advantage category",
                value: s.to_string(),
            }),
        }
    }
}

/// Arithmetic sum of the five sub-scores
pub fn epoch_sum(scores: &EpochScores) -> u32 {
    scores.as_array().iter().map(|&s| s as u32).sum()
}

/// Band an EPOCH score set into a human-advantage category
///
/// - sum >= 20: Strong
/// - 12 <= sum < 20: Moderate
/// - sum < 12: Weak
///
/// Does not re-validate sub-score ranges.
pub fn human_advantage_from_epoch(scores: &EpochScores) -> HumanAdvantageCategory {
    let sum = epoch_sum(scores);
    if sum >= STRONG_MIN_SUM {
        HumanAdvantageCategory::Strong
    } else if sum >= MODERATE_MIN_SUM {
        HumanAdvantageCategory::Moderate
    } else {
        HumanAdvantageCategory::Weak
    }
}
