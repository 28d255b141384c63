//! Display lookups for classification tiers

use crate::classify::Classification;

impl Classification {
    /// Color token used by career cards and badges
    pub fn color(&self) -> &'static str {
        match self {
            Classification::AiResilient => "green",
            Classification::AiAugmented => "blue",
            Classification::InTransition => "amber",
            Classification::HighDisruptionRisk => "red",
        }
    }

    /// Sort rank, 1 (safest) to 4 (riskiest)
    pub fn rank(&self) -> u8 {
        match self {
            Classification::AiResilient => 1,
            Classification::AiAugmented => 2,
            Classification::InTransition => 3,
            Classification::HighDisruptionRisk => 4,
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Classification::AiResilient => "🛡️",
            Classification::AiAugmented => "🤝",
            Classification::InTransition => "🔄",
            Classification::HighDisruptionRisk => "⚠️",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Classification::AiResilient => {
                "Strong human advantage or growing demand protects this career from AI displacement."
            }
            Classification::AiAugmented => {
                "AI tools will enhance this work, but human judgment and skills remain essential."
            }
            Classification::InTransition => {
                "AI is reshaping this role; expect significant changes to daily tasks and required skills."
            }
            Classification::HighDisruptionRisk => {
                "High AI exposure combined with declining demand puts this career at significant risk."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_follows_order() {
        let ranks: Vec<u8> = Classification::ALL.iter().map(|c| c.rank()).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4]);
        for pair in Classification::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn test_lookups_are_distinct() {
        let colors: std::collections::HashSet<_> =
            Classification::ALL.iter().map(|c| c.color()).collect();
        let emoji: std::collections::HashSet<_> =
            Classification::ALL.iter().map(|c| c.emoji()).collect();
        assert_eq!(colors.len(), 4);
        assert_eq!(emoji.len(), 4);
        assert!(Classification::ALL.iter().all(|c| !c.description().is_empty()));
    }

    #[test]
    fn test_specific_tokens() {
        assert_eq!(Classification::AiResilient.color(), "green");
        assert_eq!(Classification::HighDisruptionRisk.color(), "red");
        assert_eq!(Classification::InTransition.emoji(), "🔄");
    }
}
