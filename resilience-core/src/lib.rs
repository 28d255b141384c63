//! Resilience core library - AI resilience classification for occupations

#![deny(warnings)]

// Global invariants enforced in this crate:
// - Classification is strictly per-occupation
// - No global mutable state
// - The engine (category, epoch, classify, presentation, legacy, assessment)
//   performs no IO, reads no clock, and uses no randomness
// - Rule evaluation order is explicit and fixed
// - Identical input yields byte-for-byte identical output

pub mod assessment;
pub mod category;
pub mod classify;
pub mod config;
pub mod epoch;
pub mod legacy;
pub mod pipeline;
pub mod presentation;
pub mod report;

pub use assessment::{assess, AssessmentContext, CareerAiAssessment, OccupationSignals};
pub use category::{
    job_growth_category, AutomationPotential, ExposureLevel, JobGrowthCategory,
    ParseCategoryError, TaskExposure,
};
pub use classify::{
    classify, classify_input, explain, Classification, ClassificationInput,
    ClassificationOutcome, Rule, RuleId, RuleTrace, DEFAULT_RULE, RULES,
};
pub use config::ResolvedConfig;
pub use epoch::{
    epoch_sum, human_advantage_from_epoch, EpochError, EpochScores, HumanAdvantageCategory,
};
pub use report::{render_json, render_text, BatchReport};
