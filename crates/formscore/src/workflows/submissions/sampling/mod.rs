//! Synthetic submissions for demos and tests.
//!
//! Values are drawn per quality tier so that scoring the generated data with
//! the real engine reproduces the expected ordering: excellent submissions
//! outscore good ones, which outscore fair ones, which outscore poor ones.

mod batch;
mod pools;

pub use batch::{DateWindow, SampleBatchOptions, SampleSubmission, TierDistribution};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::domain::{
    FieldDescriptor, FieldKind, FieldValue, FormTemplate, ProfileValue, QualityTier, Submission,
};
use super::fields::FieldRole;

/// Draws tier-shaped field values from a random source.
pub struct SampleDataGenerator<R = StdRng> {
    rng: R,
    email_counter: u32,
}

impl SampleDataGenerator<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Deterministic generator for reproducible fixtures.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for SampleDataGenerator<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

struct Persona {
    first: String,
    last: String,
}

impl<R: Rng> SampleDataGenerator<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            email_counter: 0,
        }
    }

    pub(crate) fn rng(&mut self) -> &mut R {
        &mut self.rng
    }

    pub fn generate(
        &mut self,
        template: &FormTemplate,
        tier: QualityTier,
        force_spam: bool,
    ) -> Submission {
        let persona = self.persona(tier);
        let mut submission = Submission::new();

        for field in &template.fields {
            if !self.includes(field, tier) {
                continue;
            }
            let value = match template.profile_value(tier, &field.name) {
                Some(profile) if !(force_spam && spam_replaces_profile(field)) => {
                    self.profile_value(profile, &persona, force_spam)
                }
                _ => self.generic_value(field, tier, force_spam),
            };
            submission.insert(field.name.clone(), value);
        }

        submission
    }

    fn includes(&mut self, field: &FieldDescriptor, tier: QualityTier) -> bool {
        if field.required {
            return true;
        }
        match tier {
            QualityTier::Excellent => true,
            QualityTier::Good => self.rng.gen_bool(0.7),
            QualityTier::Fair => self.rng.gen_bool(0.4),
            QualityTier::Poor => false,
        }
    }

    fn persona(&mut self, tier: QualityTier) -> Persona {
        let full = self.pick(pools::names(tier));
        let mut parts = full.split_whitespace();
        let first = parts.next().unwrap_or("Sample").to_string();
        let last = parts.next().unwrap_or("User").to_string();
        Persona { first, last }
    }

    fn profile_value(
        &mut self,
        profile: &ProfileValue,
        persona: &Persona,
        force_spam: bool,
    ) -> FieldValue {
        let raw = match profile {
            ProfileValue::Fixed(value) => return FieldValue::Text(value.clone()),
            ProfileValue::Pool(values) => match values.choose(&mut self.rng) {
                Some(value) => value.clone(),
                None => return FieldValue::Text(String::new()),
            },
        };

        let number = self.rng.gen_range(100..=999).to_string();
        let mut value = raw
            .replace("{first}", &persona.first.to_lowercase())
            .replace("{last}", &persona.last.to_lowercase())
            .replace("{First}", &capitalize(&persona.first))
            .replace("{Last}", &capitalize(&persona.last))
            .replace("{rand}", &number);

        if force_spam {
            if let Some(at) = value.find('@') {
                let domain = self.pick(&pools::DISPOSABLE_DOMAINS);
                value = format!("{}@{domain}", &value[..at]);
            }
        }

        FieldValue::Text(value)
    }

    fn generic_value(
        &mut self,
        field: &FieldDescriptor,
        tier: QualityTier,
        force_spam: bool,
    ) -> FieldValue {
        match field.kind {
            FieldKind::Text => FieldValue::Text(self.text_value(&field.name, tier, force_spam)),
            FieldKind::Email => FieldValue::Text(self.email_value(tier, force_spam)),
            FieldKind::Tel => FieldValue::Text(self.phone_value(tier)),
            FieldKind::Textarea => FieldValue::Text(if force_spam {
                let keyword = self.pick(&pools::SPAM_PHRASES);
                format!(
                    "{}!!! Visit our website NOW! {keyword}",
                    keyword.to_uppercase()
                )
            } else {
                pools::message(tier).to_string()
            }),
            FieldKind::Select | FieldKind::Radio => {
                FieldValue::Text(self.choice_value(&field.options, tier))
            }
            FieldKind::Checkbox => FieldValue::List(self.checkbox_value(&field.options, tier)),
            FieldKind::Other => FieldValue::Text(String::new()),
        }
    }

    fn text_value(&mut self, field_name: &str, tier: QualityTier, force_spam: bool) -> String {
        let lowered = field_name.to_lowercase();

        if FieldRole::Name.matches(&lowered) {
            return self.pick(pools::names(tier)).to_string();
        }
        if is_company_field(&lowered) {
            return self.pick(pools::companies(tier)).to_string();
        }
        if force_spam {
            let keyword = self.pick(&pools::SPAM_PHRASES);
            return format!("{}!!!", keyword.to_uppercase());
        }
        if lowered.contains("subject") {
            return self.pick(pools::subjects(tier)).to_string();
        }
        pools::plain_text(tier).to_string()
    }

    fn email_value(&mut self, tier: QualityTier, force_spam: bool) -> String {
        if force_spam {
            let number = self.rng.gen_range(100..=999);
            let domain = self.pick(&pools::DISPOSABLE_DOMAINS);
            return format!("temp{number}@{domain}");
        }

        let domain = self.pick(pools::email_domains(tier));
        if tier == QualityTier::Poor {
            return format!("test@{domain}");
        }

        self.email_counter += 1;
        format!("user{}@{domain}", self.email_counter)
    }

    fn phone_value(&mut self, tier: QualityTier) -> String {
        match tier {
            QualityTier::Excellent => format!(
                "({}) {}-{}",
                self.rng.gen_range(200..=999),
                self.rng.gen_range(200..=999),
                self.rng.gen_range(1000..=9999)
            ),
            QualityTier::Good => format!(
                "{}-{}-{}",
                self.rng.gen_range(200..=999),
                self.rng.gen_range(200..=999),
                self.rng.gen_range(1000..=9999)
            ),
            QualityTier::Fair => self
                .rng
                .gen_range(2_000_000_000u64..=9_999_999_999)
                .to_string(),
            QualityTier::Poor => "1234567890".to_string(),
        }
    }

    fn choice_value(&mut self, options: &[String], tier: QualityTier) -> String {
        let Some(last) = options.last() else {
            return String::new();
        };

        match tier {
            QualityTier::Poor => {
                return first_present(options, &pools::POOR_CHOICES)
                    .unwrap_or(last.as_str())
                    .to_string();
            }
            QualityTier::Fair if self.rng.gen_bool(0.5) => {
                if let Some(choice) = first_present(options, &pools::FAIR_CHOICES) {
                    return choice.to_string();
                }
            }
            _ => {}
        }

        let ratio = if tier == QualityTier::Excellent { 0.5 } else { 0.7 };
        let window = ((options.len() as f64 * ratio).ceil() as usize).clamp(1, options.len());
        options[..window]
            .choose(&mut self.rng)
            .cloned()
            .unwrap_or_default()
    }

    fn checkbox_value(&mut self, options: &[String], tier: QualityTier) -> Vec<String> {
        let available = options.len();
        let count = match tier {
            QualityTier::Excellent => self.rng.gen_range(2.min(available)..=4.min(available)),
            QualityTier::Good => self.rng.gen_range(1.min(available)..=3.min(available)),
            QualityTier::Fair => self.rng.gen_range(0..=2.min(available)),
            QualityTier::Poor => 0,
        };

        options
            .choose_multiple(&mut self.rng, count)
            .cloned()
            .collect()
    }

    fn pick(&mut self, pool: &[&'static str]) -> &'static str {
        pool.choose(&mut self.rng).copied().unwrap_or_default()
    }
}

fn is_company_field(lowered: &str) -> bool {
    lowered.contains("company")
}

/// Free-text fields whose profile values give way to spam content.
fn spam_replaces_profile(field: &FieldDescriptor) -> bool {
    match field.kind {
        FieldKind::Textarea => true,
        FieldKind::Text => {
            let lowered = field.name.to_lowercase();
            !FieldRole::Name.matches(&lowered) && !is_company_field(&lowered)
        }
        _ => false,
    }
}

fn first_present<'a>(options: &'a [String], preferred: &[&str]) -> Option<&'a str> {
    preferred
        .iter()
        .find_map(|wanted| options.iter().find(|option| option.as_str() == *wanted))
        .map(String::as_str)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
