//! Submission quality engine: lead scoring, spam detection, acknowledgement
//! emails, and synthetic sample data for inbound form submissions.
//!
//! Scoring never fails. Malformed or missing fields contribute nothing, and
//! collaborator failures (rate lookups, classifiers, mailers) degrade to zero
//! points or a skipped email while being logged.

pub mod domain;
pub mod fields;
pub mod repository;
pub mod responder;
pub mod router;
pub mod sampling;
pub mod scoring;
pub mod service;
pub mod spam;

#[cfg(test)]
mod tests;

pub use domain::{
    FieldDescriptor, FieldKind, FieldValue, FormId, FormTemplate, ProfileValue, QualityTier,
    Submission, SubmissionId, TemplateError,
};
pub use repository::{
    RepositoryError, SpamStatus, SubmissionQuery, SubmissionRecord, SubmissionRepository,
    SubmissionSummaryView, SUSPICIOUS_FLOOR,
};
pub use responder::{
    AutoResponder, AutoResponse, AutoResponseConfig, MailerError, ResponseMailer,
    ResponsePriority,
};
pub use router::submission_router;
pub use sampling::{
    DateWindow, SampleBatchOptions, SampleDataGenerator, SampleSubmission, TierDistribution,
};
pub use scoring::{
    score_category, score_color, LeadScore, LeadScorer, LeadTier, ScoreCategory, ScoreColor,
    ScoreRange, TierScore,
};
pub use service::{SubmissionEvaluation, SubmissionMeta, SubmissionService, SubmissionServiceError};
pub use spam::{
    BehaviorContext, ClassifierError, FactorScore, QuotaGuardedClassifier,
    RateLookupError, SpamAnalysis, SpamClassifier, SpamConfig, SpamDetector, SpamFactor,
    SubmissionRateLookup, DEFAULT_HOURLY_QUOTA, DEFAULT_SPAM_THRESHOLD,
};
