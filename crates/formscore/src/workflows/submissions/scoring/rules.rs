use super::super::domain::{FieldValue, Submission};
use super::super::fields::{
    email_domain, flatten_all, has_role_text_longer_than, has_role_value, valid_email, FieldRole,
};
use super::{LeadTier, TierScore};

const PERSONAL_EMAIL_DOMAINS: [&str; 12] = [
    "gmail.com",
    "yahoo.com",
    "hotmail.com",
    "outlook.com",
    "aol.com",
    "icloud.com",
    "live.com",
    "msn.com",
    "ymail.com",
    "mail.com",
    "protonmail.com",
    "zoho.com",
];

const DISPOSABLE_EMAIL_DOMAINS: [&str; 10] = [
    "tempmail.com",
    "10minutemail.com",
    "guerrillamail.com",
    "mailinator.com",
    "throwaway.email",
    "temp-mail.org",
    "fakeinbox.com",
    "trashmail.com",
    "getnada.com",
    "maildrop.cc",
];

const BUSINESS_KEYWORDS: [&str; 10] = [
    "company",
    "business",
    "organization",
    "corporation",
    "enterprise",
    "firm",
    "agency",
    "professional",
    "commercial",
    "b2b",
];

pub(crate) fn essential_fields(submission: &Submission) -> TierScore {
    let mut tier = TierScore::new(LeadTier::EssentialFields);

    if valid_email(submission).is_some() {
        tier.award(20, "valid email address");
    }

    if has_role_text_longer_than(submission, FieldRole::Name, 2) {
        tier.award(10, "name provided");
    }

    let has_phone = has_role_text_longer_than(submission, FieldRole::Phone, 5);
    let has_message = has_role_text_longer_than(submission, FieldRole::Message, 5);
    if has_phone || has_message {
        tier.award(10, "contact method provided");
    }

    tier.capped()
}

// Phone and message are re-checked independently of the essential tier.
pub(crate) fn quality_signals(submission: &Submission) -> TierScore {
    let mut tier = TierScore::new(LeadTier::QualitySignals);

    if has_role_text_longer_than(submission, FieldRole::Phone, 5) {
        tier.award(10, "phone number provided");
    }

    if has_role_text_longer_than(submission, FieldRole::Message, 20) {
        tier.award(10, "detailed message");
    }

    let has_selection = submission
        .iter()
        .any(|(_, value)| matches!(value, FieldValue::List(values) if !values.is_empty()));
    if has_selection {
        tier.award(10, "multiple-choice selections made");
    }

    tier.capped()
}

pub(crate) fn business_indicators(submission: &Submission) -> TierScore {
    let mut tier = TierScore::new(LeadTier::BusinessIndicators);

    if has_role_text_longer_than(submission, FieldRole::Company, 2) {
        tier.award(10, "company name provided");
    }

    if let Some(domain) = valid_email(submission).and_then(email_domain) {
        if is_business_domain(domain) {
            tier.award(5, format!("business email domain {domain}"));
        }
    }

    let content = flatten_all(submission).to_lowercase();
    if let Some(keyword) = BUSINESS_KEYWORDS
        .iter()
        .find(|keyword| content.contains(*keyword))
    {
        tier.award(5, format!("professional keyword '{keyword}'"));
    }

    tier.capped()
}

pub(crate) fn engagement(submission: &Submission) -> TierScore {
    let mut tier = TierScore::new(LeadTier::Engagement);

    if has_role_text_longer_than(submission, FieldRole::Message, 100) {
        tier.award(5, "long message");
    }

    if has_role_value(submission, FieldRole::ContactPreference) {
        tier.award(5, "contact preference specified");
    }

    tier.capped()
}

fn is_business_domain(domain: &str) -> bool {
    let domain = domain.to_lowercase();
    !PERSONAL_EMAIL_DOMAINS.contains(&domain.as_str())
        && !DISPOSABLE_EMAIL_DOMAINS.contains(&domain.as_str())
}
