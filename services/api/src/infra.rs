use chrono::{Duration, Utc};
use formscore::workflows::submissions::{
    AutoResponse, MailerError, RateLookupError, RepositoryError, ResponseMailer, SubmissionId,
    SubmissionQuery, SubmissionRateLookup, SubmissionRecord, SubmissionRepository,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemorySubmissionRepository {
    records: Arc<Mutex<HashMap<SubmissionId, SubmissionRecord>>>,
}

impl InMemorySubmissionRepository {
    fn guard(
        &self,
    ) -> Result<MutexGuard<'_, HashMap<SubmissionId, SubmissionRecord>>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))
    }
}

impl SubmissionRateLookup for InMemorySubmissionRepository {
    fn count_recent_submissions(
        &self,
        ip_address: &str,
        window: Duration,
    ) -> Result<u32, RateLookupError> {
        let since = Utc::now() - window;
        let guard = self
            .records
            .lock()
            .map_err(|_| RateLookupError::Unavailable("repository mutex poisoned".to_string()))?;
        let count = guard
            .values()
            .filter(|record| record.ip_address.as_deref() == Some(ip_address))
            .filter(|record| record.submitted_at >= since)
            .count();
        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }
}

impl SubmissionRepository for InMemorySubmissionRepository {
    fn insert(&self, record: SubmissionRecord) -> Result<SubmissionRecord, RepositoryError> {
        let mut guard = self.guard()?;
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: SubmissionRecord) -> Result<(), RepositoryError> {
        let mut guard = self.guard()?;
        if guard.contains_key(&record.id) {
            guard.insert(record.id.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &SubmissionId) -> Result<Option<SubmissionRecord>, RepositoryError> {
        Ok(self.guard()?.get(id).cloned())
    }

    fn list(&self, query: &SubmissionQuery) -> Result<Vec<SubmissionRecord>, RepositoryError> {
        let guard = self.guard()?;
        Ok(query.apply(guard.values().cloned()))
    }
}

/// Mailer that writes acknowledgements to the log instead of delivering them.
#[derive(Default, Clone, Copy)]
pub(crate) struct LoggingMailer;

impl ResponseMailer for LoggingMailer {
    fn send(&self, response: &AutoResponse) -> Result<(), MailerError> {
        info!(
            recipient = %response.recipient,
            sender = %response.sender_name,
            priority = ?response.priority,
            subject = %response.subject,
            "auto-response queued"
        );
        Ok(())
    }
}
