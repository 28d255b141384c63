//! AI resilience classification cascade
//!
//! Global invariants enforced:
//! - Rules are evaluated in a fixed order; the first matching guard wins
//! - Guards overlap, so the order of `RULES` is part of the contract
//! - The cascade is total: the unguarded default catches every remaining input
//! - Pure and deterministic: no IO, no clocks, no shared state

use crate::category::{
    normalize_token, AutomationPotential, ExposureLevel, JobGrowthCategory, ParseCategoryError,
    TaskExposure,
};
use crate::epoch::HumanAdvantageCategory;
use ExposureLevel::{High, Low, Medium};
use HumanAdvantageCategory::{Moderate, Strong, Weak};
use JobGrowthCategory::{
    DecliningQuickly, DecliningSlowly, GrowingQuickly, GrowingSlowly, Stable,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Outcome tier, ordered from safest to riskiest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Classification {
    #[serde(rename = "AI-Resilient")]
    AiResilient,
    #[serde(rename = "AI-Augmented")]
    AiAugmented,
    #[serde(rename = "In Transition")]
    InTransition,
    #[serde(rename = "High Disruption Risk")]
    HighDisruptionRisk,
}

impl Classification {
    pub const ALL: [Classification; 4] = [
        Classification::AiResilient,
        Classification::AiAugmented,
        Classification::InTransition,
        Classification::HighDisruptionRisk,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::AiResilient => "AI-Resilient",
            Classification::AiAugmented => "AI-Augmented",
            Classification::InTransition => "In Transition",
            Classification::HighDisruptionRisk => "High Disruption Risk",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Classification {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "airesilient" => Ok(Classification::AiResilient),
            "aiaugmented" => Ok(Classification::AiAugmented),
            "intransition" => Ok(Classification::InTransition),
            "highdisruptionrisk" => Ok(Classification::HighDisruptionRisk),
            _ => Err(ParseCategoryError {
                kind: "classification",
                value: s.to_string(),
            }),
        }
    }
}

/// The four categorical signals the cascade reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationInput {
    pub task_exposure: TaskExposure,
    /// Carried for forward compatibility; no current rule reads it
    pub automation_potential: AutomationPotential,
    pub job_growth: JobGrowthCategory,
    pub human_advantage: HumanAdvantageCategory,
}

/// Identifier of a rule in the cascade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleId {
    GrowingQuicklyLimitedExposure,
    StrongHumanAdvantage,
    GrowingLowExposure,
    LowExposure,
    MediumExposureHumanSkills,
    HighExposureGrowing,
    HighExposureStable,
    HighExposureModerateDecline,
    StableModerateHumanSkills,
    MediumExposureWeakDecline,
    MaximumRisk,
    HighRisk,
    HighExposureFallback,
    Default,
}

impl RuleId {
    /// 1-based position in the cascade
    pub fn position(&self) -> usize {
        RULES
            .iter()
            .position(|r| r.id == *self)
            .map_or(RULES.len() + 1, |i| i + 1)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleId::GrowingQuicklyLimitedExposure => "growing-quickly-limited-exposure",
            RuleId::StrongHumanAdvantage => "strong-human-advantage",
            RuleId::GrowingLowExposure => "growing-low-exposure",
            RuleId::LowExposure => "low-exposure",
            RuleId::MediumExposureHumanSkills => "medium-exposure-human-skills",
            RuleId::HighExposureGrowing => "high-exposure-growing",
            RuleId::HighExposureStable => "high-exposure-stable",
            RuleId::HighExposureModerateDecline => "high-exposure-moderate-decline",
            RuleId::StableModerateHumanSkills => "stable-moderate-human-skills",
            RuleId::MediumExposureWeakDecline => "medium-exposure-weak-decline",
            RuleId::MaximumRisk => "maximum-risk",
            RuleId::HighRisk => "high-risk",
            RuleId::HighExposureFallback => "high-exposure-fallback",
            RuleId::Default => "default",
        }
    }

    /// The table entry for this id
    pub fn rule(&self) -> &'static Rule {
        RULES
            .iter()
            .find(|r| r.id == *self)
            .unwrap_or(&DEFAULT_RULE)
    }

    pub fn classification(&self) -> Classification {
        self.rule().classification
    }

    /// Short tag naming the rule
    pub fn label(&self) -> &'static str {
        self.rule().label
    }

    pub fn rationale(&self) -> &'static str {
        self.rule().rationale
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the cascade: when `guard` holds, the occupation gets `classification`
#[derive(Clone, Copy)]
pub struct Rule {
    pub id: RuleId,
    pub classification: Classification,
    pub label: &'static str,
    /// Always prefixed with `label`
    pub rationale: &'static str,
    guard: fn(&ClassificationInput) -> bool,
}

impl Rule {
    pub fn matches(&self, input: &ClassificationInput) -> bool {
        (self.guard)(input)
    }
}

/// Guarded rules in evaluation order. `DEFAULT_RULE` follows implicitly.
pub static RULES: [Rule; 13] = [
    Rule {
        id: RuleId::GrowingQuicklyLimitedExposure,
        classification: Classification::AiResilient,
        label: "Growing Quickly + Limited Exposure",
        rationale: "Growing Quickly + Limited Exposure: strong projected demand and tasks that AI cannot readily take over",
        guard: |i| i.job_growth == GrowingQuickly && i.task_exposure != High,
    },
    Rule {
        id: RuleId::StrongHumanAdvantage,
        classification: Classification::AiResilient,
        label: "Strong Human Advantage",
        rationale: "Strong Human Advantage: the work leans on empathy, presence, judgment, creativity, and hope that AI cannot replicate",
        guard: |i| i.human_advantage == Strong && i.task_exposure != High,
    },
    Rule {
        id: RuleId::GrowingLowExposure,
        classification: Classification::AiResilient,
        label: "Growing + Low Exposure",
        rationale: "Growing + Low Exposure: employment is growing and few core tasks are exposed to AI",
        guard: |i| i.job_growth == GrowingSlowly && i.task_exposure == Low,
    },
    Rule {
        id: RuleId::LowExposure,
        classification: Classification::AiAugmented,
        label: "Low Exposure",
        rationale: "Low Exposure: AI will assist with some tasks but the core work stays human",
        guard: |i| i.task_exposure == Low && i.job_growth != DecliningQuickly,
    },
    Rule {
        id: RuleId::MediumExposureHumanSkills,
        classification: Classification::AiAugmented,
        label: "Medium Exposure + Human Skills",
        rationale: "Medium Exposure + Human Skills: AI handles part of the work while human skills keep the role valuable",
        guard: |i| i.task_exposure == Medium && matches!(i.human_advantage, Moderate | Strong),
    },
    Rule {
        id: RuleId::HighExposureGrowing,
        classification: Classification::AiAugmented,
        label: "High Exposure + Growing",
        rationale: "High Exposure + Growing: many tasks are exposed to AI but demand is growing fast enough to absorb the change",
        guard: |i| i.task_exposure == High && i.job_growth == GrowingQuickly,
    },
    Rule {
        id: RuleId::HighExposureStable,
        classification: Classification::InTransition,
        label: "High Exposure + Stable",
        rationale: "High Exposure + Stable: many tasks are exposed to AI and flat demand means the role is likely to be reshaped",
        guard: |i| i.task_exposure == High && i.job_growth == Stable,
    },
    Rule {
        id: RuleId::HighExposureModerateDecline,
        classification: Classification::InTransition,
        label: "High Exposure + Moderate Decline",
        rationale: "High Exposure + Moderate Decline: high AI exposure and slowly shrinking employment, partly offset by human skills",
        guard: |i| {
            i.task_exposure == High
                && i.job_growth == DecliningSlowly
                && i.human_advantage == Moderate
        },
    },
    // task == High && Stable never reaches here (HighExposureStable)
    Rule {
        id: RuleId::StableModerateHumanSkills,
        classification: Classification::AiAugmented,
        label: "Stable + Moderate Human Skills",
        rationale: "Stable + Moderate Human Skills: steady demand and meaningful human skills point to AI as a tool rather than a replacement",
        guard: |i| i.job_growth == Stable && i.human_advantage == Moderate,
    },
    Rule {
        id: RuleId::MediumExposureWeakDecline,
        classification: Classification::InTransition,
        label: "Medium Exposure + Weak Human Advantage + Decline",
        rationale: "Medium Exposure + Weak Human Advantage + Decline: moderate exposure, shrinking employment, and few protective human skills",
        guard: |i| {
            i.task_exposure == Medium
                && i.job_growth == DecliningSlowly
                && i.human_advantage == Weak
        },
    },
    Rule {
        id: RuleId::MaximumRisk,
        classification: Classification::HighDisruptionRisk,
        label: "Maximum Risk",
        rationale: "Maximum Risk: high AI exposure, rapidly declining employment, and weak human advantage",
        guard: |i| {
            i.task_exposure == High
                && i.job_growth == DecliningQuickly
                && i.human_advantage == Weak
        },
    },
    // Superset of MaximumRisk; must stay after it
    Rule {
        id: RuleId::HighRisk,
        classification: Classification::HighDisruptionRisk,
        label: "High Risk",
        rationale: "High Risk: high AI exposure, declining employment, and weak human advantage",
        guard: |i| {
            i.task_exposure == High && i.job_growth.is_declining() && i.human_advantage == Weak
        },
    },
    Rule {
        id: RuleId::HighExposureFallback,
        classification: Classification::InTransition,
        label: "High AI Exposure",
        rationale: "High AI Exposure: a large share of tasks are exposed to AI, so the role is expected to change significantly",
        guard: |i| i.task_exposure == High,
    },
];

/// Unguarded rule taken when nothing in `RULES` matches
pub static DEFAULT_RULE: Rule = Rule {
    id: RuleId::Default,
    classification: Classification::AiAugmented,
    label: "Default: Moderate AI impact",
    rationale: "Default: Moderate AI impact expected, with AI changing parts of the work",
    guard: |_| true,
};

/// Result of running the cascade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationOutcome {
    pub classification: Classification,
    pub rule: RuleId,
    pub rationale: &'static str,
}

impl ClassificationOutcome {
    fn from_rule(rule: &Rule) -> Self {
        ClassificationOutcome {
            classification: rule.classification,
            rule: rule.id,
            rationale: rule.rationale,
        }
    }
}

/// Classify an occupation from its four categorical signals
pub fn classify(
    task_exposure: TaskExposure,
    automation_potential: AutomationPotential,
    job_growth: JobGrowthCategory,
    human_advantage: HumanAdvantageCategory,
) -> ClassificationOutcome {
    classify_input(&ClassificationInput {
        task_exposure,
        automation_potential,
        job_growth,
        human_advantage,
    })
}

/// Classify from a pre-assembled input
pub fn classify_input(input: &ClassificationInput) -> ClassificationOutcome {
    let rule = RULES
        .iter()
        .find(|rule| rule.matches(input))
        .unwrap_or(&DEFAULT_RULE);
    ClassificationOutcome::from_rule(rule)
}

/// One evaluated step of the cascade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RuleTrace {
    pub rule: RuleId,
    pub matched: bool,
}

/// Every guard evaluated for `input`, ending with the one that fired
pub fn explain(input: &ClassificationInput) -> Vec<RuleTrace> {
    let mut trace = Vec::with_capacity(RULES.len() + 1);
    for rule in &RULES {
        let matched = rule.matches(input);
        trace.push(RuleTrace {
            rule: rule.id,
            matched,
        });
        if matched {
            return trace;
        }
    }
    trace.push(RuleTrace {
        rule: RuleId::Default,
        matched: true,
    });
    trace
}
