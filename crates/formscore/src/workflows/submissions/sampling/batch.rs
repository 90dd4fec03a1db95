use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::super::domain::{FormTemplate, QualityTier, Submission};
use super::{pools, SampleDataGenerator};

/// Percentage of a batch drawn from each tier. Weights need not sum to 100;
/// rolls past the cumulative total fall back to `good`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierDistribution {
    pub excellent: u8,
    pub good: u8,
    pub fair: u8,
    pub poor: u8,
}

impl Default for TierDistribution {
    fn default() -> Self {
        Self {
            excellent: 25,
            good: 40,
            fair: 25,
            poor: 10,
        }
    }
}

impl TierDistribution {
    fn weights(&self) -> [(QualityTier, u8); 4] {
        [
            (QualityTier::Excellent, self.excellent),
            (QualityTier::Good, self.good),
            (QualityTier::Fair, self.fair),
            (QualityTier::Poor, self.poor),
        ]
    }

    fn tier_for_roll(&self, roll: u32) -> QualityTier {
        let mut cumulative = 0u32;
        for (tier, weight) in self.weights() {
            cumulative += u32::from(weight);
            if roll <= cumulative {
                return tier;
            }
        }
        QualityTier::Good
    }
}

/// Span in which sample timestamps are spread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateWindow {
    Today,
    Last7Days,
    #[default]
    Last30Days,
    Last60Days,
    Last90Days,
}

impl DateWindow {
    pub fn start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let days = match self {
            DateWindow::Today => {
                return now
                    .date_naive()
                    .and_hms_opt(0, 0, 0)
                    .map(|midnight| Utc.from_utc_datetime(&midnight))
                    .unwrap_or(now);
            }
            DateWindow::Last7Days => 7,
            DateWindow::Last30Days => 30,
            DateWindow::Last60Days => 60,
            DateWindow::Last90Days => 90,
        };
        now - Duration::days(days)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SampleBatchOptions {
    pub count: usize,
    pub include_spam: bool,
    pub spam_percentage: u8,
    pub tier_distribution: TierDistribution,
    pub date_window: DateWindow,
}

impl Default for SampleBatchOptions {
    fn default() -> Self {
        Self {
            count: 20,
            include_spam: true,
            spam_percentage: 10,
            tier_distribution: TierDistribution::default(),
            date_window: DateWindow::default(),
        }
    }
}

/// One generated submission plus the request metadata it pretends to carry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleSubmission {
    pub tier: QualityTier,
    pub forced_spam: bool,
    pub data: Submission,
    pub ip_address: String,
    pub user_agent: String,
    pub submitted_at: DateTime<Utc>,
    /// Spam score to record when a forced-spam sample scores below 60.
    pub spam_score_floor: Option<u8>,
}

impl<R: Rng> SampleDataGenerator<R> {
    pub fn generate_batch(
        &mut self,
        template: &FormTemplate,
        options: &SampleBatchOptions,
        now: DateTime<Utc>,
    ) -> Vec<SampleSubmission> {
        (0..options.count)
            .map(|_| self.sample(template, options, now))
            .collect()
    }

    fn sample(
        &mut self,
        template: &FormTemplate,
        options: &SampleBatchOptions,
        now: DateTime<Utc>,
    ) -> SampleSubmission {
        let tier = options
            .tier_distribution
            .tier_for_roll(self.rng().gen_range(1..=100));
        let forced_spam = options.include_spam
            && self.rng().gen_range(1..=100u32) <= u32::from(options.spam_percentage);

        let data = self.generate(template, tier, forced_spam);
        let spam_score_floor = forced_spam.then(|| self.rng().gen_range(60..=95u8));

        SampleSubmission {
            tier,
            forced_spam,
            data,
            ip_address: self.ip_address(),
            user_agent: self.pick(&pools::USER_AGENTS).to_string(),
            submitted_at: self.timestamp(options.date_window, now),
            spam_score_floor,
        }
    }

    fn ip_address(&mut self) -> String {
        let rng = self.rng();
        format!(
            "{}.{}.{}.{}",
            rng.gen_range(1..=255u8),
            rng.gen_range(0..=255u8),
            rng.gen_range(0..=255u8),
            rng.gen_range(0..=255u8)
        )
    }

    fn timestamp(&mut self, window: DateWindow, now: DateTime<Utc>) -> DateTime<Utc> {
        let start = window.start(now).timestamp();
        let end = now.timestamp().max(start);
        let seconds = self.rng().gen_range(start..=end);
        Utc.timestamp_opt(seconds, 0).single().unwrap_or(now)
    }
}
