use serde::{Deserialize, Serialize};

pub const DEFAULT_SPAM_THRESHOLD: u8 = 60;

/// Settings read by the spam detector at analysis time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpamConfig {
    pub threshold: u8,
    pub detection_enabled: bool,
    pub ai_check_enabled: bool,
    #[serde(default, skip_serializing)]
    pub ai_api_key: Option<String>,
}

impl SpamConfig {
    /// AI analysis runs only when switched on and a key is present.
    pub fn ai_check_configured(&self) -> bool {
        self.ai_check_enabled
            && self
                .ai_api_key
                .as_deref()
                .map(|key| !key.trim().is_empty())
                .unwrap_or(false)
    }

    pub fn is_spam(&self, spam_score: u8) -> bool {
        spam_score >= self.threshold
    }
}

impl Default for SpamConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_SPAM_THRESHOLD,
            detection_enabled: true,
            ai_check_enabled: false,
            ai_api_key: None,
        }
    }
}
