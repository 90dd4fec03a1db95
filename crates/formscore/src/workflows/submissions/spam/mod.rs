mod config;
mod patterns;
mod signals;

pub use config::{SpamConfig, DEFAULT_SPAM_THRESHOLD};
pub use signals::{
    BehaviorContext, ClassifierError, QuotaGuardedClassifier, RateLookupError,
    SpamClassifier, SubmissionRateLookup, DEFAULT_HOURLY_QUOTA,
};

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::domain::Submission;
use super::fields::flatten_text;

const CLASSIFIER_INPUT_LIMIT: usize = 500;
const CLASSIFIER_MIN_CONTENT: usize = 10;

/// Weighted multi-factor spam detector.
pub struct SpamDetector {
    config: SpamConfig,
    classifier: Option<Arc<dyn SpamClassifier>>,
}

impl SpamDetector {
    pub fn new(config: SpamConfig) -> Self {
        Self {
            config,
            classifier: None,
        }
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn SpamClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn config(&self) -> &SpamConfig {
        &self.config
    }

    pub fn analyze(&self, submission: &Submission, behavior: &BehaviorContext<'_>) -> SpamAnalysis {
        if !self.config.detection_enabled {
            return SpamAnalysis {
                spam_score: 0,
                is_spam: false,
                factors: Vec::new(),
            };
        }

        let mut factors = vec![
            patterns::pattern_analysis(submission),
            patterns::content_quality(submission),
            patterns::email_reputation(submission),
            patterns::submission_behavior(behavior.recent_submissions()),
        ];
        if let Some(factor) = self.ai_content_analysis(submission) {
            factors.push(factor);
        }

        let spam_score = factors
            .iter()
            .map(|factor| u16::from(factor.score))
            .sum::<u16>()
            .min(100) as u8;

        SpamAnalysis {
            spam_score,
            is_spam: self.config.is_spam(spam_score),
            factors,
        }
    }

    fn ai_content_analysis(&self, submission: &Submission) -> Option<FactorScore> {
        if !self.config.ai_check_configured() {
            return None;
        }
        let classifier = self.classifier.as_ref()?;

        let mut factor = FactorScore::new(SpamFactor::AiContentAnalysis);
        let content: String = flatten_text(submission)
            .chars()
            .take(CLASSIFIER_INPUT_LIMIT)
            .collect();
        if content.trim().len() < CLASSIFIER_MIN_CONTENT {
            debug!("content too short for ai spam analysis");
            return Some(factor);
        }

        match classifier.classify(&content) {
            Ok(likelihood) => {
                let points = likelihood.clamp(0, 10) as u8;
                factor.award(points, format!("classifier likelihood {likelihood}/10"));
            }
            Err(ClassifierError::QuotaExhausted(limit)) => {
                debug!(limit, "ai spam quota reached; skipping classifier");
            }
            Err(err) => {
                warn!(error = %err, "ai spam analysis failed; contributing zero");
            }
        }

        Some(factor.capped())
    }
}

/// Independent factor contributing to the spam score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpamFactor {
    PatternAnalysis,
    ContentQuality,
    EmailDomain,
    SubmissionBehavior,
    AiContentAnalysis,
}

impl SpamFactor {
    pub fn max_points(&self) -> u8 {
        match self {
            SpamFactor::PatternAnalysis => 35,
            SpamFactor::ContentQuality => 25,
            SpamFactor::EmailDomain => 20,
            SpamFactor::SubmissionBehavior => 10,
            SpamFactor::AiContentAnalysis => 10,
        }
    }
}

/// Points a factor contributed along with the signals that fired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactorScore {
    pub factor: SpamFactor,
    pub score: u8,
    pub notes: Vec<String>,
}

impl FactorScore {
    pub(crate) fn new(factor: SpamFactor) -> Self {
        Self {
            factor,
            score: 0,
            notes: Vec::new(),
        }
    }

    pub(crate) fn award(&mut self, points: u8, note: impl Into<String>) {
        self.score = self.score.saturating_add(points);
        self.notes.push(note.into());
    }

    pub(crate) fn capped(mut self) -> Self {
        self.score = self.score.min(self.factor.max_points());
        self
    }
}

/// Spam verdict for one submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpamAnalysis {
    pub spam_score: u8,
    pub is_spam: bool,
    pub factors: Vec<FactorScore>,
}

impl SpamAnalysis {
    pub fn factor(&self, factor: SpamFactor) -> u8 {
        self.factors
            .iter()
            .find(|entry| entry.factor == factor)
            .map(|entry| entry.score)
            .unwrap_or(0)
    }
}
