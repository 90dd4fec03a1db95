//! Field extraction helpers shared by the lead scorer, spam detector, and
//! auto-responder.
//!
//! Forms carry no schema, so semantic roles are recognised by case-insensitive
//! substring matches on the field name. Lookups walk the submission in its
//! declared order and stop at the first field that satisfies the whole check.

use once_cell::sync::Lazy;
use regex::Regex;

use super::domain::{FieldValue, Submission};

/// Semantic role a field plays, recognised from keywords in its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRole {
    Email,
    Name,
    Phone,
    Message,
    Company,
    ContactPreference,
}

impl FieldRole {
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            FieldRole::Email => &["email"],
            FieldRole::Name => &["name"],
            FieldRole::Phone => &["phone", "tel", "mobile"],
            FieldRole::Message => &["message", "comment", "description", "details"],
            FieldRole::Company => &["company", "organization", "business"],
            FieldRole::ContactPreference => {
                &["prefer", "contact", "reach", "best_time", "availability"]
            }
        }
    }

    pub fn matches(&self, field_name: &str) -> bool {
        let lowered = field_name.to_lowercase();
        self.keywords()
            .iter()
            .any(|keyword| lowered.contains(keyword))
    }
}

const PREFERRED_NAME_FIELDS: [&str; 5] = ["name", "full_name", "first_name", "your_name", "fname"];

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$",
    )
    .expect("email pattern compiles")
});

/// `local@domain.tld` shape check with at least one dot after the `@`.
pub fn is_valid_email(candidate: &str) -> bool {
    candidate.len() <= 254 && EMAIL_PATTERN.is_match(candidate)
}

/// First string value of an email-named field, falling back to the first
/// string value that looks like an address. The named value is returned
/// untouched, so it may itself be invalid.
pub fn extract_email(submission: &Submission) -> Option<&str> {
    let named = submission
        .iter()
        .filter(|(name, _)| FieldRole::Email.matches(name))
        .find_map(|(_, value)| value.as_text());

    named.or_else(|| submission.text_values().find(|value| is_valid_email(value)))
}

/// Extracted email only when it passes validation.
pub fn valid_email(submission: &Submission) -> Option<&str> {
    extract_email(submission).filter(|email| is_valid_email(email))
}

/// Portion after the last `@`, if any.
pub fn email_domain(email: &str) -> Option<&str> {
    email
        .rfind('@')
        .map(|index| &email[index + 1..])
        .filter(|domain| !domain.is_empty())
}

/// Portion before the first `@`.
pub fn email_local_part(email: &str) -> Option<&str> {
    email.find('@').map(|index| &email[..index])
}

/// Preferred name fields first, then any non-empty field with "name" in it.
pub fn extract_name(submission: &Submission) -> Option<String> {
    let preferred = PREFERRED_NAME_FIELDS.iter().find_map(|field| {
        submission
            .get(field)
            .filter(|value| !value.is_empty())
            .and_then(FieldValue::as_text)
    });

    preferred
        .or_else(|| {
            submission
                .iter()
                .filter(|(name, _)| FieldRole::Name.matches(name))
                .filter_map(|(_, value)| value.as_text())
                .find(|value| !value.is_empty())
        })
        .map(|value| value.trim().to_string())
}

/// First string value of a field playing `role` whose trimmed length exceeds
/// `min_len` bytes.
pub fn role_text_longer_than<'a>(
    submission: &'a Submission,
    role: FieldRole,
    min_len: usize,
) -> Option<&'a str> {
    submission
        .iter()
        .filter(|(name, _)| role.matches(name))
        .filter_map(|(_, value)| value.as_text())
        .find(|value| value.trim().len() > min_len)
}

pub fn has_role_text_longer_than(submission: &Submission, role: FieldRole, min_len: usize) -> bool {
    role_text_longer_than(submission, role, min_len).is_some()
}

/// Whether any field playing `role` carries a non-empty value of either shape.
pub fn has_role_value(submission: &Submission, role: FieldRole) -> bool {
    submission
        .iter()
        .any(|(name, value)| role.matches(name) && !value.is_empty())
}

/// Every value with lists joined by `", "`, separated by spaces.
pub fn flatten_all(submission: &Submission) -> String {
    submission
        .iter()
        .map(|(_, value)| value.flatten())
        .collect::<Vec<_>>()
        .join(" ")
}

/// String values only, separated by spaces. Lists are skipped.
pub fn flatten_text(submission: &Submission) -> String {
    submission.text_values().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validator_requires_dotted_domain() {
        assert!(is_valid_email("jane@example.com"));
        assert!(is_valid_email("first.last+tag@mail.example.co.uk"));
        assert!(!is_valid_email("jane@localhost"));
        assert!(!is_valid_email("jane.example.com"));
        assert!(!is_valid_email("jane@@example.com"));
        assert!(!is_valid_email(" jane@example.com"));
        assert!(!is_valid_email(".jane@example.com"));
    }

    #[test]
    fn named_email_field_wins_even_when_invalid() {
        let submission = Submission::new()
            .with("note", "reach me at real@example.com")
            .with("Work_Email", "not-an-address")
            .with("backup", "other@example.com");

        assert_eq!(extract_email(&submission), Some("not-an-address"));
        assert_eq!(valid_email(&submission), None);
    }

    #[test]
    fn email_falls_back_to_first_valid_value() {
        let submission = Submission::new()
            .with("contact", "call me")
            .with("address", "jane@example.com")
            .with("alt", "john@example.com");

        assert_eq!(extract_email(&submission), Some("jane@example.com"));
    }

    #[test]
    fn list_valued_email_field_is_skipped() {
        let submission = Submission::new()
            .with("emails", vec!["a@example.com".to_string()])
            .with("primary_email", "b@example.com");

        assert_eq!(extract_email(&submission), Some("b@example.com"));
    }

    #[test]
    fn name_prefers_known_fields_in_priority_order() {
        let submission = Submission::new()
            .with("company_name", "Acme")
            .with("first_name", "Jane")
            .with("full_name", "  Jane Doe  ");

        assert_eq!(extract_name(&submission).as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn name_falls_back_to_any_name_field() {
        let submission = Submission::new()
            .with("Contact_Name", "")
            .with("Business_Name", " Acme ");

        assert_eq!(extract_name(&submission).as_deref(), Some("Acme"));
        assert_eq!(extract_name(&Submission::new()), None);
    }

    #[test]
    fn role_lookup_skips_fields_that_fail_the_length_check() {
        let submission = Submission::new()
            .with("phone", "123")
            .with("mobile", "555-0100");

        assert_eq!(
            role_text_longer_than(&submission, FieldRole::Phone, 5),
            Some("555-0100")
        );
        assert!(!has_role_text_longer_than(&submission, FieldRole::Message, 5));
    }

    #[test]
    fn flattening_differs_for_lists() {
        let submission = Submission::new()
            .with("name", "Jane")
            .with("topics", vec!["a".to_string(), "b".to_string()])
            .with("note", "hi");

        assert_eq!(flatten_all(&submission), "Jane a, b hi");
        assert_eq!(flatten_text(&submission), "Jane hi");
    }

    #[test]
    fn domain_and_local_part_split_on_at() {
        assert_eq!(email_domain("abc123@mail.ru"), Some("mail.ru"));
        assert_eq!(email_local_part("abc123@mail.ru"), Some("abc123"));
        assert_eq!(email_domain("no-at-sign"), None);
        assert_eq!(email_domain("trailing@"), None);
    }
}
