mod bands;
mod rules;

pub use bands::{score_category, score_color, ScoreCategory, ScoreColor, ScoreRange};

use serde::{Deserialize, Serialize};

use super::domain::Submission;

/// Stateless scorer that rates how promising a submission is as a lead.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeadScorer;

impl LeadScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn score(&self, submission: &Submission) -> LeadScore {
        let tiers = vec![
            rules::essential_fields(submission),
            rules::quality_signals(submission),
            rules::business_indicators(submission),
            rules::engagement(submission),
        ];

        let total = tiers
            .iter()
            .map(|tier| u16::from(tier.score))
            .sum::<u16>()
            .min(100) as u8;

        LeadScore { total, tiers }
    }
}

/// Independent point pool contributing to the lead score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadTier {
    EssentialFields,
    QualitySignals,
    BusinessIndicators,
    Engagement,
}

impl LeadTier {
    pub fn max_points(&self) -> u8 {
        match self {
            LeadTier::EssentialFields => 40,
            LeadTier::QualitySignals => 30,
            LeadTier::BusinessIndicators => 20,
            LeadTier::Engagement => 10,
        }
    }
}

/// Points awarded by one tier along with the rules that fired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierScore {
    pub tier: LeadTier,
    pub score: u8,
    pub notes: Vec<String>,
}

impl TierScore {
    pub(crate) fn new(tier: LeadTier) -> Self {
        Self {
            tier,
            score: 0,
            notes: Vec::new(),
        }
    }

    pub(crate) fn award(&mut self, points: u8, note: impl Into<String>) {
        self.score = self.score.saturating_add(points);
        self.notes.push(note.into());
    }

    pub(crate) fn capped(mut self) -> Self {
        self.score = self.score.min(self.tier.max_points());
        self
    }
}

/// Composite lead score with its per-tier audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadScore {
    pub total: u8,
    pub tiers: Vec<TierScore>,
}

impl LeadScore {
    pub fn tier(&self, tier: LeadTier) -> u8 {
        self.tiers
            .iter()
            .find(|entry| entry.tier == tier)
            .map(|entry| entry.score)
            .unwrap_or(0)
    }

    pub fn category(&self) -> ScoreCategory {
        score_category(self.total)
    }

    pub fn color(&self) -> ScoreColor {
        score_color(self.total)
    }
}
