use once_cell::sync::Lazy;
use regex::Regex;

use super::super::domain::Submission;
use super::super::fields::{email_domain, email_local_part, extract_email, flatten_text};
use super::{FactorScore, SpamFactor};

const SPAM_KEYWORDS: [&str; 20] = [
    "viagra",
    "cialis",
    "casino",
    "lottery",
    "prize",
    "winner",
    "click here",
    "buy now",
    "limited time",
    "act now",
    "free money",
    "work from home",
    "make money fast",
    "weight loss",
    "debt relief",
    "credit repair",
    "enlargement",
    "diploma",
    "earn money",
    "multi-level marketing",
];

const DISPOSABLE_EMAIL_DOMAINS: [&str; 14] = [
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
    "yopmail.com",
    "sharklasers.com",
    "mintemail.com",
    "dispostable.com",
];

const SUSPICIOUS_TLDS: [&str; 7] = [".ru", ".cn", ".tk", ".ml", ".ga", ".cf", ".gq"];

static CONSONANT_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)[bcdfghjklmnpqrstvwxyz]{5,}").expect("consonant pattern"));

static GENERATED_LOCAL_PART: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[a-z]{3,5}[0-9]+$").expect("local part pattern"));

pub(crate) fn pattern_analysis(submission: &Submission) -> FactorScore {
    let mut factor = FactorScore::new(SpamFactor::PatternAnalysis);
    let original = flatten_text(submission);
    let lowered = original.to_lowercase();

    if let Some(keyword) = SPAM_KEYWORDS
        .iter()
        .find(|keyword| lowered.contains(*keyword))
    {
        factor.award(15, format!("spam keyword '{keyword}'"));
    }

    let url_count = lowered.matches("http").count();
    if url_count > 3 {
        factor.award(20, format!("{url_count} links"));
    } else if url_count > 1 {
        factor.award(10, format!("{url_count} links"));
    }

    if is_mostly_uppercase(&original) {
        factor.award(15, "mostly uppercase text");
    }

    if original.contains("!!!") || original.contains("???") {
        factor.award(10, "excessive punctuation");
    }

    factor.capped()
}

pub(crate) fn content_quality(submission: &Submission) -> FactorScore {
    let mut factor = FactorScore::new(SpamFactor::ContentQuality);
    let text = flatten_text(submission);
    let length = text.trim().len();

    if length > 0 && length < 10 {
        factor.award(20, format!("content only {length} characters long"));
    }

    if has_repeated_run(&text, 5) {
        factor.award(15, "repeated characters");
    }

    let clusters = CONSONANT_RUN.find_iter(&text).count();
    if clusters > 3 {
        factor.award(15, format!("{clusters} consonant clusters"));
    }

    if length > 5 {
        let compact = text.replace(' ', "");
        let all_digits = !compact.is_empty() && compact.chars().all(|c| c.is_ascii_digit());
        let no_letters = !compact.chars().any(|c| c.is_ascii_alphabetic());
        if all_digits || no_letters {
            factor.award(10, "no alphabetic content");
        }
    }

    factor.capped()
}

pub(crate) fn email_reputation(submission: &Submission) -> FactorScore {
    let mut factor = FactorScore::new(SpamFactor::EmailDomain);
    let Some(email) = extract_email(submission) else {
        return factor;
    };
    let Some(domain) = email_domain(email) else {
        return factor;
    };
    let domain = domain.to_lowercase();

    if DISPOSABLE_EMAIL_DOMAINS.contains(&domain.as_str()) {
        factor.award(20, format!("disposable domain {domain}"));
    }

    if let Some(tld) = SUSPICIOUS_TLDS.iter().find(|tld| domain.ends_with(*tld)) {
        factor.award(10, format!("suspicious top-level domain {tld}"));
    }

    if email_local_part(email)
        .map(|local| GENERATED_LOCAL_PART.is_match(local))
        .unwrap_or(false)
    {
        factor.award(10, "generated-looking mailbox name");
    }

    factor.capped()
}

pub(crate) fn submission_behavior(recent_submissions: u32) -> FactorScore {
    let mut factor = FactorScore::new(SpamFactor::SubmissionBehavior);

    let note = format!("{recent_submissions} submissions from this address in the last hour");
    if recent_submissions > 5 {
        factor.award(10, note);
    } else if recent_submissions > 3 {
        factor.award(5, note);
    }

    factor.capped()
}

fn is_mostly_uppercase(text: &str) -> bool {
    let stripped: String = text
        .chars()
        .filter(|c| !matches!(c, ' ' | '.' | ',' | '!' | '?' | '\n' | '\r' | '\t'))
        .collect();

    if stripped.len() <= 20 {
        return false;
    }

    let (letters, uppercase) = stripped
        .chars()
        .filter(char::is_ascii_alphabetic)
        .fold((0usize, 0usize), |(letters, uppercase), c| {
            (letters + 1, uppercase + usize::from(c.is_ascii_uppercase()))
        });

    letters > 0 && uppercase * 2 > letters
}

/// Whether some character other than a newline repeats `run` times in a row.
fn has_repeated_run(text: &str, run: usize) -> bool {
    let mut previous = None;
    let mut length = 0;

    for c in text.chars() {
        if c != '\n' && Some(c) == previous {
            length += 1;
        } else {
            previous = Some(c);
            length = 1;
        }
        if c != '\n' && length >= run {
            return true;
        }
    }

    false
}
