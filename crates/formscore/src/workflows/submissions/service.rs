use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::domain::{FormId, FormTemplate, Submission, SubmissionId};
use super::repository::{
    RepositoryError, SubmissionQuery, SubmissionRecord, SubmissionRepository,
};
use super::responder::{AutoResponder, AutoResponseConfig, ResponseMailer};
use super::sampling::{SampleBatchOptions, SampleDataGenerator};
use super::scoring::{LeadScore, LeadScorer};
use super::spam::{
    BehaviorContext, SpamAnalysis, SpamClassifier, SpamConfig, SpamDetector, DEFAULT_SPAM_THRESHOLD,
};

/// Request metadata captured alongside a submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionMeta {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub submitted_at: Option<DateTime<Utc>>,
}

/// Both scores for one submission, with breakdowns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionEvaluation {
    pub lead: LeadScore,
    pub spam: SpamAnalysis,
}

/// Service composing the scorer, spam detector, auto-responder, and store.
pub struct SubmissionService<R, M> {
    repository: Arc<R>,
    mailer: Arc<M>,
    scorer: LeadScorer,
    detector: Arc<SpamDetector>,
    responder: AutoResponder,
}

static SUBMISSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_submission_id() -> SubmissionId {
    let id = SUBMISSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SubmissionId(format!("sub-{id:06}"))
}

impl<R, M> SubmissionService<R, M>
where
    R: SubmissionRepository + 'static,
    M: ResponseMailer + 'static,
{
    pub fn new(
        repository: Arc<R>,
        mailer: Arc<M>,
        spam: SpamConfig,
        auto_response: AutoResponseConfig,
    ) -> Self {
        Self {
            repository,
            mailer,
            scorer: LeadScorer::new(),
            detector: Arc::new(SpamDetector::new(spam)),
            responder: AutoResponder::new(auto_response),
        }
    }

    pub fn with_classifier(self, classifier: Arc<dyn SpamClassifier>) -> Self {
        let spam = self.detector.config().clone();
        Self {
            detector: Arc::new(SpamDetector::new(spam).with_classifier(classifier)),
            ..self
        }
    }

    pub fn spam_threshold(&self) -> u8 {
        self.detector.config().threshold
    }

    /// Score a submission without storing it. The address, when given, is
    /// checked against stored traffic.
    pub fn evaluate(&self, data: &Submission, ip_address: Option<&str>) -> SubmissionEvaluation {
        let behavior = BehaviorContext::new(ip_address, self.repository.as_ref());
        SubmissionEvaluation {
            lead: self.scorer.score(data),
            spam: self.detector.analyze(data, &behavior),
        }
    }

    /// Store, score, and acknowledge an inbound submission.
    ///
    /// The record is written before spam analysis so the per-address count
    /// includes this submission. Scores are persisted before the mailer runs;
    /// only the sent flag is written afterwards.
    pub fn submit(
        &self,
        form_id: FormId,
        data: Submission,
        meta: SubmissionMeta,
    ) -> Result<SubmissionRecord, SubmissionServiceError> {
        let record = SubmissionRecord {
            id: next_submission_id(),
            form_id,
            data,
            lead_score: 0,
            spam_score: 0,
            flagged_spam: false,
            ip_address: meta.ip_address,
            user_agent: meta.user_agent,
            submitted_at: meta.submitted_at.unwrap_or_else(Utc::now),
            auto_response_sent: false,
        };
        let mut stored = self.repository.insert(record)?;

        let evaluation = self.evaluate(&stored.data, stored.ip_address.as_deref());
        stored.lead_score = evaluation.lead.total;
        stored.spam_score = evaluation.spam.spam_score;

        self.repository.update(stored.clone())?;

        if evaluation.spam.is_spam {
            info!(
                submission_id = %stored.id,
                spam_score = stored.spam_score,
                "submission classified as spam; auto-response suppressed"
            );
        } else if self.acknowledge(&stored) {
            stored.auto_response_sent = true;
            if let Err(err) = self.repository.update(stored.clone()) {
                warn!(
                    submission_id = %stored.id,
                    auto_response_sent = true,
                    error = %err,
                    "auto-response sent but delivery flag was not saved"
                );
                return Err(err.into());
            }
        }

        info!(
            submission_id = %stored.id,
            form_id = %stored.form_id,
            lead_score = stored.lead_score,
            spam_score = stored.spam_score,
            "submission recorded"
        );
        Ok(stored)
    }

    fn acknowledge(&self, record: &SubmissionRecord) -> bool {
        let Some(response) = self.responder.plan(&record.data, record.lead_score) else {
            debug!(submission_id = %record.id, "no auto-response planned");
            return false;
        };

        match self.mailer.send(&response) {
            Ok(()) => {
                info!(
                    submission_id = %record.id,
                    priority = ?response.priority,
                    "auto-response sent"
                );
                true
            }
            Err(err) => {
                warn!(submission_id = %record.id, error = %err, "auto-response delivery failed");
                false
            }
        }
    }

    pub fn get(&self, id: &SubmissionId) -> Result<SubmissionRecord, SubmissionServiceError> {
        let record = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// Listing with the configured threshold applied to status filters.
    pub fn list(
        &self,
        mut query: SubmissionQuery,
    ) -> Result<Vec<SubmissionRecord>, SubmissionServiceError> {
        query.spam_threshold = self.spam_threshold();
        Ok(self.repository.list(&query)?)
    }

    /// Manual spam override that wins over the computed score.
    pub fn flag_spam(
        &self,
        id: &SubmissionId,
        flagged: bool,
    ) -> Result<SubmissionRecord, SubmissionServiceError> {
        let mut record = self.get(id)?;
        record.flagged_spam = flagged;
        self.repository.update(record.clone())?;
        info!(submission_id = %id, flagged, "spam flag updated");
        Ok(record)
    }

    /// Mean lead score rounded to the nearest integer; 0 with no submissions.
    pub fn average_lead_score(
        &self,
        form_id: Option<FormId>,
    ) -> Result<u8, SubmissionServiceError> {
        let mut query = SubmissionQuery::new(self.spam_threshold());
        query.form_id = form_id;
        let records = self.repository.list(&query)?;
        if records.is_empty() {
            return Ok(0);
        }

        let total: u64 = records.iter().map(|record| u64::from(record.lead_score)).sum();
        let mean = total as f64 / records.len() as f64;
        Ok(mean.round() as u8)
    }

    /// Generate, score, and store a batch of synthetic submissions.
    pub fn seed_samples<G: Rng>(
        &self,
        form_id: FormId,
        template: &FormTemplate,
        options: &SampleBatchOptions,
        generator: &mut SampleDataGenerator<G>,
    ) -> Result<Vec<SubmissionRecord>, SubmissionServiceError> {
        let now = Utc::now();
        let mut stored = Vec::with_capacity(options.count);

        for sample in generator.generate_batch(template, options, now) {
            let lead = self.scorer.score(&sample.data);
            let spam = self.detector.analyze(&sample.data, &BehaviorContext::default());
            let spam_score = match sample.spam_score_floor {
                Some(floor) if spam.spam_score < DEFAULT_SPAM_THRESHOLD => floor,
                _ => spam.spam_score,
            };

            let record = SubmissionRecord {
                id: next_submission_id(),
                form_id,
                data: sample.data,
                lead_score: lead.total,
                spam_score,
                flagged_spam: false,
                ip_address: Some(sample.ip_address),
                user_agent: Some(sample.user_agent),
                submitted_at: sample.submitted_at,
                auto_response_sent: false,
            };
            stored.push(self.repository.insert(record)?);
        }

        info!(
            form_id = %form_id,
            template = %template.name,
            created = stored.len(),
            "sample submissions seeded"
        );
        Ok(stored)
    }
}

/// Error raised by the submission service.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
