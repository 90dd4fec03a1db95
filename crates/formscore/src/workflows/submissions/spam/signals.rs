use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use tracing::warn;

/// Lookup of how often an address submitted recently.
pub trait SubmissionRateLookup: Send + Sync {
    fn count_recent_submissions(
        &self,
        ip_address: &str,
        window: Duration,
    ) -> Result<u32, RateLookupError>;
}

/// Failure raised by a rate lookup backend.
#[derive(Debug, thiserror::Error)]
pub enum RateLookupError {
    #[error("rate lookup unavailable: {0}")]
    Unavailable(String),
}

/// Request-scoped signals about who sent a submission.
#[derive(Clone, Copy, Default)]
pub struct BehaviorContext<'a> {
    pub ip_address: Option<&'a str>,
    pub rate_lookup: Option<&'a dyn SubmissionRateLookup>,
}

impl<'a> BehaviorContext<'a> {
    pub fn new(ip_address: Option<&'a str>, rate_lookup: &'a dyn SubmissionRateLookup) -> Self {
        Self {
            ip_address,
            rate_lookup: Some(rate_lookup),
        }
    }

    /// Submissions from the same address within the last hour. Lookup
    /// failures count as zero.
    pub fn recent_submissions(&self) -> u32 {
        let ip_address = match self.ip_address.map(str::trim) {
            Some(ip) if !ip.is_empty() => ip,
            _ => return 0,
        };
        let Some(lookup) = self.rate_lookup else {
            return 0;
        };

        match lookup.count_recent_submissions(ip_address, Duration::hours(1)) {
            Ok(count) => count,
            Err(err) => {
                warn!(%ip_address, error = %err, "submission rate lookup failed; skipping behavior factor");
                0
            }
        }
    }
}

/// External text classifier returning a 0-10 spam likelihood.
pub trait SpamClassifier: Send + Sync {
    fn classify(&self, content: &str) -> Result<i64, ClassifierError>;
}

/// Failure raised by a spam classifier.
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("classifier transport failed: {0}")]
    Transport(String),
    #[error("classifier timed out")]
    Timeout,
    #[error("classifier responded with status {0}")]
    Status(u16),
    #[error("classifier reply could not be parsed: {0:?}")]
    Unparseable(String),
    #[error("hourly classification quota of {0} reached")]
    QuotaExhausted(u32),
}

pub const DEFAULT_HOURLY_QUOTA: u32 = 100;

struct QuotaWindow {
    started: DateTime<Utc>,
    used: u32,
}

/// Wraps a classifier with a shared hourly call budget. Only successful
/// classifications consume the budget.
pub struct QuotaGuardedClassifier<C> {
    inner: C,
    limit: u32,
    window: Mutex<QuotaWindow>,
}

impl<C: SpamClassifier> QuotaGuardedClassifier<C> {
    pub fn new(inner: C, limit: u32) -> Self {
        Self {
            inner,
            limit,
            window: Mutex::new(QuotaWindow {
                started: Utc::now(),
                used: 0,
            }),
        }
    }

    pub fn used(&self) -> u32 {
        self.window.lock().map(|window| window.used).unwrap_or(0)
    }

    pub(crate) fn classify_at(
        &self,
        content: &str,
        now: DateTime<Utc>,
    ) -> Result<i64, ClassifierError> {
        {
            let mut window = self
                .window
                .lock()
                .map_err(|_| ClassifierError::Transport("quota lock poisoned".to_string()))?;
            if now - window.started >= Duration::hours(1) {
                window.started = now;
                window.used = 0;
            }
            if window.used >= self.limit {
                return Err(ClassifierError::QuotaExhausted(self.limit));
            }
        }

        let likelihood = self.inner.classify(content)?;

        if let Ok(mut window) = self.window.lock() {
            window.used += 1;
        }
        Ok(likelihood)
    }
}

impl<C: SpamClassifier> SpamClassifier for QuotaGuardedClassifier<C> {
    fn classify(&self, content: &str) -> Result<i64, ClassifierError> {
        self.classify_at(content, Utc::now())
    }
}
