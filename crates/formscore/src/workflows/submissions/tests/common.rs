use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{Duration, Utc};
use serde_json::Value;

use crate::workflows::submissions::domain::{Submission, SubmissionId};
use crate::workflows::submissions::repository::{
    RepositoryError, SubmissionQuery, SubmissionRecord, SubmissionRepository,
};
use crate::workflows::submissions::responder::{
    AutoResponse, AutoResponseConfig, MailerError, ResponseMailer,
};
use crate::workflows::submissions::spam::{
    ClassifierError, RateLookupError, SpamClassifier, SpamConfig, SubmissionRateLookup,
};
use crate::workflows::submissions::{submission_router, SubmissionService};

pub(super) fn example_one() -> Submission {
    Submission::new()
        .with("email", "jane@gmail.com")
        .with("full_name", "Jane Doe")
        .with(
            "message",
            "Hi, I'd like a quote for your services please, thanks",
        )
}

pub(super) fn example_two() -> Submission {
    Submission::new()
        .with("email", "temp123@mailinator.com")
        .with("comment", "BUY NOW!!! CLICK HERE!!!")
}

pub(super) fn example_four() -> Submission {
    Submission::new()
        .with("email", "jane@acmecorp.com")
        .with("company", "Acme Corp")
}

/// Submission that maxes every lead tier.
pub(super) fn ideal_lead() -> Submission {
    Submission::new()
        .with("full_name", "Alexandra Wilson")
        .with("email", "alex@northwind.io")
        .with("phone", "(515) 555-0144")
        .with("company", "Northwind Logistics")
        .with(
            "message",
            "We are a regional logistics business evaluating partners for a warehouse \
             automation rollout next quarter and would like a detailed proposal.",
        )
        .with(
            "services",
            vec!["Consulting".to_string(), "Implementation".to_string()],
        )
        .with("preferred_contact", "Phone")
}

pub(super) fn spam_config() -> SpamConfig {
    SpamConfig::default()
}

pub(super) fn responder_config() -> AutoResponseConfig {
    AutoResponseConfig {
        enabled: true,
        skip_low_scores: true,
        from_name: "Dana".to_string(),
        company_name: "Acme Studio".to_string(),
    }
}

pub(super) fn build_service() -> (
    SubmissionService<MemoryRepository, MemoryMailer>,
    Arc<MemoryRepository>,
    Arc<MemoryMailer>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let mailer = Arc::new(MemoryMailer::default());
    let service = SubmissionService::new(
        repository.clone(),
        mailer.clone(),
        spam_config(),
        responder_config(),
    );
    (service, repository, mailer)
}

pub(super) fn router_with_service(
    service: SubmissionService<MemoryRepository, MemoryMailer>,
) -> axum::Router {
    submission_router(Arc::new(service))
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<SubmissionId, SubmissionRecord>>>,
}

impl MemoryRepository {
    pub(super) fn seed(&self, record: SubmissionRecord) {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .insert(record.id.clone(), record);
    }
}

impl SubmissionRateLookup for MemoryRepository {
    fn count_recent_submissions(
        &self,
        ip_address: &str,
        window: Duration,
    ) -> Result<u32, RateLookupError> {
        let since = Utc::now() - window;
        let guard = self.records.lock().expect("repository mutex poisoned");
        let count = guard
            .values()
            .filter(|record| record.ip_address.as_deref() == Some(ip_address))
            .filter(|record| record.submitted_at >= since)
            .count();
        Ok(count as u32)
    }
}

impl SubmissionRepository for MemoryRepository {
    fn insert(&self, record: SubmissionRecord) -> Result<SubmissionRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: SubmissionRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(record.id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &SubmissionId) -> Result<Option<SubmissionRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list(&self, query: &SubmissionQuery) -> Result<Vec<SubmissionRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(query.apply(guard.values().cloned()))
    }
}

pub(super) struct UnavailableRepository;

impl SubmissionRateLookup for UnavailableRepository {
    fn count_recent_submissions(&self, _: &str, _: Duration) -> Result<u32, RateLookupError> {
        Err(RateLookupError::Unavailable("database offline".to_string()))
    }
}

impl SubmissionRepository for UnavailableRepository {
    fn insert(&self, _record: SubmissionRecord) -> Result<SubmissionRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: SubmissionRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &SubmissionId) -> Result<Option<SubmissionRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self, _query: &SubmissionQuery) -> Result<Vec<SubmissionRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// In-memory store that starts failing updates once its allowance runs out.
pub(super) struct LimitedUpdateRepository {
    pub(super) inner: MemoryRepository,
    updates_left: AtomicU32,
}

impl LimitedUpdateRepository {
    pub(super) fn allowing(updates: u32) -> Self {
        Self {
            inner: MemoryRepository::default(),
            updates_left: AtomicU32::new(updates),
        }
    }

    pub(super) fn only_record(&self) -> SubmissionRecord {
        let guard = self.inner.records.lock().expect("repository mutex poisoned");
        assert_eq!(guard.len(), 1);
        guard.values().next().cloned().expect("one record stored")
    }
}

impl SubmissionRateLookup for LimitedUpdateRepository {
    fn count_recent_submissions(
        &self,
        ip_address: &str,
        window: Duration,
    ) -> Result<u32, RateLookupError> {
        self.inner.count_recent_submissions(ip_address, window)
    }
}

impl SubmissionRepository for LimitedUpdateRepository {
    fn insert(&self, record: SubmissionRecord) -> Result<SubmissionRecord, RepositoryError> {
        self.inner.insert(record)
    }

    fn update(&self, record: SubmissionRecord) -> Result<(), RepositoryError> {
        let allowed = self
            .updates_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if !allowed {
            return Err(RepositoryError::Unavailable("write timeout".to_string()));
        }
        self.inner.update(record)
    }

    fn fetch(&self, id: &SubmissionId) -> Result<Option<SubmissionRecord>, RepositoryError> {
        self.inner.fetch(id)
    }

    fn list(&self, query: &SubmissionQuery) -> Result<Vec<SubmissionRecord>, RepositoryError> {
        self.inner.list(query)
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryMailer {
    sent: Arc<Mutex<Vec<AutoResponse>>>,
}

impl MemoryMailer {
    pub(super) fn sent(&self) -> Vec<AutoResponse> {
        self.sent.lock().expect("mailer mutex poisoned").clone()
    }
}

impl ResponseMailer for MemoryMailer {
    fn send(&self, response: &AutoResponse) -> Result<(), MailerError> {
        self.sent
            .lock()
            .expect("mailer mutex poisoned")
            .push(response.clone());
        Ok(())
    }
}

pub(super) struct BouncingMailer;

impl ResponseMailer for BouncingMailer {
    fn send(&self, response: &AutoResponse) -> Result<(), MailerError> {
        Err(MailerError::Rejected(response.recipient.clone()))
    }
}

/// Classifier stub returning a fixed reply and counting calls.
pub(super) struct ScriptedClassifier {
    pub(super) reply: Result<i64, ()>,
    pub(super) calls: AtomicU32,
}

impl ScriptedClassifier {
    pub(super) fn replying(reply: Result<i64, ()>) -> Self {
        Self {
            reply,
            calls: AtomicU32::new(0),
        }
    }

    pub(super) fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SpamClassifier for ScriptedClassifier {
    fn classify(&self, _content: &str) -> Result<i64, ClassifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply
            .map_err(|_| ClassifierError::Transport("connection reset".to_string()))
    }
}

/// Rate lookup reporting a fixed count for every address.
pub(super) struct FixedRate(pub(super) u32);

impl SubmissionRateLookup for FixedRate {
    fn count_recent_submissions(&self, _: &str, _: Duration) -> Result<u32, RateLookupError> {
        Ok(self.0)
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
