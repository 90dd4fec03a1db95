use serde::{Deserialize, Serialize};

use super::domain::Submission;
use super::fields::{extract_email, extract_name, is_valid_email};

const LOW_SCORE_CUTOFF: u8 = 30;

/// Toggles and sender identity for acknowledgement emails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoResponseConfig {
    pub enabled: bool,
    pub skip_low_scores: bool,
    pub from_name: String,
    pub company_name: String,
}

impl Default for AutoResponseConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            skip_low_scores: false,
            from_name: "The Team".to_string(),
            company_name: "The Team".to_string(),
        }
    }
}

/// Tone of the acknowledgement, chosen from the lead score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponsePriority {
    High,
    Medium,
    Low,
}

impl ResponsePriority {
    pub fn for_score(lead_score: u8) -> Self {
        match lead_score {
            80..=u8::MAX => ResponsePriority::High,
            50..=79 => ResponsePriority::Medium,
            _ => ResponsePriority::Low,
        }
    }
}

/// Rendered acknowledgement ready for a mailer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoResponse {
    pub recipient: String,
    pub sender_name: String,
    pub priority: ResponsePriority,
    pub subject: String,
    pub body: String,
}

/// Outbound mail transport.
pub trait ResponseMailer: Send + Sync {
    fn send(&self, response: &AutoResponse) -> Result<(), MailerError>;
}

#[derive(Debug, thiserror::Error)]
pub enum MailerError {
    #[error("mail transport unavailable: {0}")]
    Transport(String),
    #[error("recipient rejected: {0}")]
    Rejected(String),
}

/// Decides whether and how a submission is acknowledged.
#[derive(Debug, Clone, Default)]
pub struct AutoResponder {
    config: AutoResponseConfig,
}

impl AutoResponder {
    pub fn new(config: AutoResponseConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AutoResponseConfig {
        &self.config
    }

    /// Returns `None` when responses are off, the lead is too weak, or no
    /// deliverable address was submitted.
    pub fn plan(&self, submission: &Submission, lead_score: u8) -> Option<AutoResponse> {
        if !self.config.enabled {
            return None;
        }
        if self.config.skip_low_scores && lead_score < LOW_SCORE_CUTOFF {
            return None;
        }

        let recipient = extract_email(submission)?.trim();
        if !is_valid_email(recipient) {
            return None;
        }

        let priority = ResponsePriority::for_score(lead_score);
        let name = extract_name(submission).filter(|name| !name.is_empty());
        let sender_name = sanitize_header(&self.config.from_name);
        let (subject, body) = self.render(priority, name.as_deref(), &sender_name);

        Some(AutoResponse {
            recipient: recipient.to_string(),
            sender_name,
            priority,
            subject,
            body,
        })
    }

    fn render(
        &self,
        priority: ResponsePriority,
        name: Option<&str>,
        from_name: &str,
    ) -> (String, String) {
        let company = &self.config.company_name;
        match priority {
            ResponsePriority::High => {
                let subject = match name {
                    Some(name) => format!("Great to hear from you, {name}!"),
                    None => "Great to hear from you!".to_string(),
                };
                let body = format!(
                    "Hi{},\n\n\
                     Thank you for reaching out to us. We're excited about the opportunity to work with you!\n\n\
                     Based on what you've shared, I think we can definitely help. One of our team members will be in touch within 24 hours to discuss your needs in detail.\n\n\
                     Looking forward to connecting!\n\n\
                     Best regards,\n{from_name}\n{company}",
                    greeting_suffix(name)
                );
                (subject, body)
            }
            ResponsePriority::Medium => {
                let body = format!(
                    "Hello{},\n\n\
                     Thank you for contacting us. We've received your message and will review it shortly.\n\n\
                     One of our team members will get back to you within 24-48 hours to discuss how we can assist you.\n\n\
                     Best regards,\n{from_name}\n{company}",
                    greeting_suffix(name)
                );
                ("Thank you for your inquiry".to_string(), body)
            }
            ResponsePriority::Low => {
                let body = format!(
                    "Hello,\n\n\
                     Thank you for your submission. We've received your information and will be in touch if we have any questions.\n\n\
                     Best regards,\n{company}"
                );
                ("We received your submission".to_string(), body)
            }
        }
    }
}

fn greeting_suffix(name: Option<&str>) -> String {
    name.map(|name| format!(" {name}")).unwrap_or_default()
}

/// Drops CR and LF so the sender name cannot inject mail headers.
fn sanitize_header(value: &str) -> String {
    value.chars().filter(|c| !matches!(c, '\r' | '\n')).collect()
}
