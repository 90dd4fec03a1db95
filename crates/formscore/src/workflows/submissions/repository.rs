use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{FormId, Submission, SubmissionId};
use super::scoring::{score_category, score_color, ScoreCategory, ScoreColor, ScoreRange};
use super::spam::SubmissionRateLookup;

/// Lower bound of the suspicious band that sits just below the spam threshold.
pub const SUSPICIOUS_FLOOR: u8 = 40;

/// Stored submission with its scores and delivery metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub id: SubmissionId,
    pub form_id: FormId,
    pub data: Submission,
    pub lead_score: u8,
    pub spam_score: u8,
    pub flagged_spam: bool,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub auto_response_sent: bool,
}

impl SubmissionRecord {
    /// Verdict at read time so a threshold change reclassifies stored rows.
    pub fn is_spam(&self, threshold: u8) -> bool {
        self.flagged_spam || self.spam_score >= threshold
    }

    pub fn summary_view(&self, threshold: u8) -> SubmissionSummaryView {
        SubmissionSummaryView {
            id: self.id.clone(),
            form_id: self.form_id,
            lead_score: self.lead_score,
            lead_category: score_category(self.lead_score),
            score_color: score_color(self.lead_score),
            spam_score: self.spam_score,
            is_spam: self.is_spam(threshold),
            flagged_spam: self.flagged_spam,
            auto_response_sent: self.auto_response_sent,
            submitted_at: self.submitted_at,
        }
    }
}

/// Listing row exposed by the HTTP surface.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionSummaryView {
    pub id: SubmissionId,
    pub form_id: FormId,
    pub lead_score: u8,
    pub lead_category: ScoreCategory,
    pub score_color: ScoreColor,
    pub spam_score: u8,
    pub is_spam: bool,
    pub flagged_spam: bool,
    pub auto_response_sent: bool,
    pub submitted_at: DateTime<Utc>,
}

/// Spam status filter for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpamStatus {
    #[default]
    All,
    Spam,
    NotSpam,
    Suspicious,
}

impl SpamStatus {
    pub fn matches(&self, record: &SubmissionRecord, threshold: u8) -> bool {
        match self {
            SpamStatus::All => true,
            SpamStatus::Spam => record.is_spam(threshold),
            SpamStatus::NotSpam => !record.is_spam(threshold),
            SpamStatus::Suspicious => {
                record.spam_score >= SUSPICIOUS_FLOOR && record.spam_score < threshold
            }
        }
    }
}

/// Listing criteria. Results are newest first unless `ascending` is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionQuery {
    pub form_id: Option<FormId>,
    pub status: SpamStatus,
    pub range: ScoreRange,
    pub spam_threshold: u8,
    pub ascending: bool,
    pub limit: Option<usize>,
    pub offset: usize,
}

impl SubmissionQuery {
    pub fn new(spam_threshold: u8) -> Self {
        Self {
            form_id: None,
            status: SpamStatus::All,
            range: ScoreRange::All,
            spam_threshold,
            ascending: false,
            limit: None,
            offset: 0,
        }
    }

    pub fn matches(&self, record: &SubmissionRecord) -> bool {
        self.form_id.map_or(true, |form_id| record.form_id == form_id)
            && self.status.matches(record, self.spam_threshold)
            && self.range.contains(record.lead_score)
    }

    /// Filters, orders, and pages an in-memory result set.
    pub fn apply<I>(&self, records: I) -> Vec<SubmissionRecord>
    where
        I: IntoIterator<Item = SubmissionRecord>,
    {
        let mut matched: Vec<_> = records
            .into_iter()
            .filter(|record| self.matches(record))
            .collect();
        matched.sort_by(|a, b| {
            a.submitted_at
                .cmp(&b.submitted_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        if !self.ascending {
            matched.reverse();
        }

        matched
            .into_iter()
            .skip(self.offset)
            .take(self.limit.unwrap_or(usize::MAX))
            .collect()
    }
}

/// Storage abstraction; also answers per-address rate lookups for the spam
/// detector.
pub trait SubmissionRepository: SubmissionRateLookup {
    fn insert(&self, record: SubmissionRecord) -> Result<SubmissionRecord, RepositoryError>;
    fn update(&self, record: SubmissionRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &SubmissionId) -> Result<Option<SubmissionRecord>, RepositoryError>;
    fn list(&self, query: &SubmissionQuery) -> Result<Vec<SubmissionRecord>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(id: &str, spam_score: u8, lead_score: u8, minutes_ago: i64) -> SubmissionRecord {
        SubmissionRecord {
            id: SubmissionId(id.to_string()),
            form_id: FormId(1),
            data: Submission::new(),
            lead_score,
            spam_score,
            flagged_spam: false,
            ip_address: None,
            user_agent: None,
            submitted_at: Utc::now() - Duration::minutes(minutes_ago),
            auto_response_sent: false,
        }
    }

    #[test]
    fn manual_flag_marks_spam_regardless_of_score() {
        let mut row = record("a", 10, 50, 0);
        assert!(!SpamStatus::Spam.matches(&row, 60));
        row.flagged_spam = true;
        assert!(SpamStatus::Spam.matches(&row, 60));
        assert!(!SpamStatus::NotSpam.matches(&row, 60));
    }

    #[test]
    fn suspicious_band_sits_below_threshold() {
        assert!(SpamStatus::Suspicious.matches(&record("a", 40, 0, 0), 60));
        assert!(SpamStatus::Suspicious.matches(&record("b", 59, 0, 0), 60));
        assert!(!SpamStatus::Suspicious.matches(&record("c", 60, 0, 0), 60));
        assert!(!SpamStatus::Suspicious.matches(&record("d", 39, 0, 0), 60));
    }

    #[test]
    fn threshold_change_reclassifies_rows() {
        let row = record("a", 55, 0, 0);
        assert!(!row.is_spam(60));
        assert!(row.is_spam(50));
    }

    #[test]
    fn apply_orders_newest_first_and_pages() {
        let rows = vec![
            record("old", 0, 90, 30),
            record("new", 0, 85, 1),
            record("mid", 0, 10, 10),
            record("middle-high", 0, 81, 15),
        ];

        let mut query = SubmissionQuery::new(60);
        query.range = ScoreRange::High;
        let ids: Vec<_> = query
            .apply(rows.clone())
            .into_iter()
            .map(|row| row.id.0)
            .collect();
        assert_eq!(ids, vec!["new", "middle-high", "old"]);

        query.ascending = true;
        query.offset = 1;
        query.limit = Some(1);
        let ids: Vec<_> = query.apply(rows).into_iter().map(|row| row.id.0).collect();
        assert_eq!(ids, vec!["middle-high"]);
    }
}
