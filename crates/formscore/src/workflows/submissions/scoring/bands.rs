use std::fmt;

use serde::{Deserialize, Serialize};

/// Five-band display colour for a lead score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScoreColor {
    High,
    MediumHigh,
    Medium,
    Low,
    VeryLow,
}

impl ScoreColor {
    pub fn label(&self) -> &'static str {
        match self {
            ScoreColor::High => "high",
            ScoreColor::MediumHigh => "medium-high",
            ScoreColor::Medium => "medium",
            ScoreColor::Low => "low",
            ScoreColor::VeryLow => "very-low",
        }
    }
}

impl fmt::Display for ScoreColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Three-band classification of a lead score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreCategory {
    High,
    Medium,
    Low,
}

impl ScoreCategory {
    pub fn label(&self) -> &'static str {
        match self {
            ScoreCategory::High => "high",
            ScoreCategory::Medium => "medium",
            ScoreCategory::Low => "low",
        }
    }
}

impl fmt::Display for ScoreCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub fn score_color(score: u8) -> ScoreColor {
    match score {
        70.. => ScoreColor::High,
        60..=69 => ScoreColor::MediumHigh,
        50..=59 => ScoreColor::Medium,
        40..=49 => ScoreColor::Low,
        _ => ScoreColor::VeryLow,
    }
}

pub fn score_category(score: u8) -> ScoreCategory {
    match score {
        70.. => ScoreCategory::High,
        50..=69 => ScoreCategory::Medium,
        _ => ScoreCategory::Low,
    }
}

/// Lead score filter used when listing stored submissions.
///
/// The listing bands (80/50) differ from [`score_category`] (70/50).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreRange {
    #[default]
    All,
    High,
    Medium,
    Low,
}

impl ScoreRange {
    pub fn contains(&self, score: u8) -> bool {
        match self {
            ScoreRange::All => true,
            ScoreRange::High => score >= 80,
            ScoreRange::Medium => (50..80).contains(&score),
            ScoreRange::Low => score < 50,
        }
    }
}
