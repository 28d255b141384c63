//! Categorical input dimensions and job-growth derivation
//!
//! Global invariants enforced:
//! - Every category is a closed enum (no open string constants)
//! - Job-growth thresholds partition the real line with no gaps or overlaps

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A category string that did not name any variant
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} value: {value:?}")]
pub struct ParseCategoryError {
    pub kind: &'static str,
    pub value: String,
}

/// Normalize a category token for lenient matching.
///
/// "Declining Quickly", "declining_quickly" and "declining-quickly" all
/// collapse to "decliningquickly".
pub(crate) fn normalize_token(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Tercile of an exposure-style signal within the occupation universe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ExposureLevel {
    Low,
    Medium,
    High,
}

/// Share of an occupation's tasks that current AI systems can perform
pub type TaskExposure = ExposureLevel;

/// Placeholder signal, currently derived identically to task exposure
pub type AutomationPotential = ExposureLevel;

impl ExposureLevel {
    pub const ALL: [ExposureLevel; 3] = [
        ExposureLevel::Low,
        ExposureLevel::Medium,
        ExposureLevel::High,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExposureLevel::Low => "Low",
            ExposureLevel::Medium => "Medium",
            ExposureLevel::High => "High",
        }
    }
}

impl fmt::Display for ExposureLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExposureLevel {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "low" => Ok(ExposureLevel::Low),
            "medium" => Ok(ExposureLevel::Medium),
            "high" => Ok(ExposureLevel::High),
            _ => Err(ParseCategoryError {
                kind: "exposure level",
                value: s.to_string(),
            }),
        }
    }
}

/// Projected employment trend over the projection horizon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobGrowthCategory {
    #[serde(rename = "Declining Quickly")]
    DecliningQuickly,
    #[serde(rename = "Declining Slowly")]
    DecliningSlowly,
    #[serde(rename = "Stable")]
    Stable,
    #[serde(rename = "Growing Slowly")]
    GrowingSlowly,
    #[serde(rename = "Growing Quickly")]
    GrowingQuickly,
}

impl JobGrowthCategory {
    pub const ALL: [JobGrowthCategory; 5] = [
        JobGrowthCategory::DecliningQuickly,
        JobGrowthCategory::DecliningSlowly,
        JobGrowthCategory::Stable,
        JobGrowthCategory::GrowingSlowly,
        JobGrowthCategory::GrowingQuickly,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobGrowthCategory::DecliningQuickly => "Declining Quickly",
            JobGrowthCategory::DecliningSlowly => "Declining Slowly",
            JobGrowthCategory::Stable => "Stable",
            JobGrowthCategory::GrowingSlowly => "Growing Slowly",
            JobGrowthCategory::GrowingQuickly => "Growing Quickly",
        }
    }

    pub fn is_declining(&self) -> bool {
        matches!(
            self,
            JobGrowthCategory::DecliningQuickly | JobGrowthCategory::DecliningSlowly
        )
    }
}

impl fmt::Display for JobGrowthCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobGrowthCategory {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "decliningquickly" => Ok(JobGrowthCategory::DecliningQuickly),
            "decliningslowly" => Ok(JobGrowthCategory::DecliningSlowly),
            "stable" => Ok(JobGrowthCategory::Stable),
            "growingslowly" => Ok(JobGrowthCategory::GrowingSlowly),
            "growingquickly" => Ok(JobGrowthCategory::GrowingQuickly),
            _ => Err(ParseCategoryError {
                kind: "job growth category",
                value: s.to_string(),
            }),
        }
    }
}

/// Percent change below which employment is declining quickly
pub const DECLINING_QUICKLY_BELOW: f64 = -10.0;
/// Upper bound (inclusive) of the stable band
pub const STABLE_MAX: f64 = 5.0;
/// Upper bound (inclusive) of the growing-slowly band
pub const GROWING_SLOWLY_MAX: f64 = 15.0;

/// Map a projected percent employment change to its growth category
///
/// Bands (evaluated in order, each excluding the ones before it):
/// - `< -10`  Declining Quickly
/// - `< 0`    Declining Slowly
/// - `<= 5`   Stable
/// - `<= 15`  Growing Slowly
/// - else     Growing Quickly
///
/// # Panics
///
/// Panics on NaN, which has no place in the partition.
pub fn job_growth_category(percent_change: f64) -> JobGrowthCategory {
    assert!(
        !percent_change.is_nan(),
        "percent employment change must not be NaN"
    );

    if percent_change < DECLINING_QUICKLY_BELOW {
        JobGrowthCategory::DecliningQuickly
    } else if percent_change < 0.0 {
        JobGrowthCategory::DecliningSlowly
    } else if percent_change <= STABLE_MAX {
        JobGrowthCategory::Stable
    } else if percent_change <= GROWING_SLOWLY_MAX {
        JobGrowthCategory::GrowingSlowly
    } else {
        JobGrowthCategory::GrowingQuickly
    }
}
