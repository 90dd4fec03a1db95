use crate::workflows::submissions::domain::{FieldValue, FormTemplate, QualityTier};
use crate::workflows::submissions::fields::{extract_email, is_valid_email};
use crate::workflows::submissions::sampling::SampleDataGenerator;
use crate::workflows::submissions::scoring::LeadScorer;
use crate::workflows::submissions::spam::{BehaviorContext, SpamConfig, SpamDetector};

fn mean_lead_score(generator: &mut SampleDataGenerator, tier: QualityTier) -> f64 {
    let template = FormTemplate::contact_inquiry();
    let scorer = LeadScorer::new();
    let total: u32 = (0..100)
        .map(|_| u32::from(scorer.score(&generator.generate(&template, tier, false)).total))
        .sum();
    f64::from(total) / 100.0
}

#[test]
fn tier_means_are_strictly_ordered() {
    let mut generator = SampleDataGenerator::seeded(2024);

    let excellent = mean_lead_score(&mut generator, QualityTier::Excellent);
    let good = mean_lead_score(&mut generator, QualityTier::Good);
    let fair = mean_lead_score(&mut generator, QualityTier::Fair);
    let poor = mean_lead_score(&mut generator, QualityTier::Poor);

    assert!(excellent > good, "excellent {excellent} vs good {good}");
    assert!(good > fair, "good {good} vs fair {fair}");
    assert!(fair > poor, "fair {fair} vs poor {poor}");
}

#[test]
fn excellent_samples_fill_every_field() {
    let template = FormTemplate::contact_inquiry();
    let mut generator = SampleDataGenerator::seeded(1);
    let submission = generator.generate(&template, QualityTier::Excellent, false);

    assert_eq!(submission.len(), template.fields.len());
    let email = extract_email(&submission).expect("email generated");
    assert!(email.starts_with("user"));
    assert!(is_valid_email(email));
    assert_eq!(LeadScorer::new().score(&submission).total, 100);
}

#[test]
fn poor_samples_only_carry_required_fields() {
    let template = FormTemplate::contact_inquiry();
    let mut generator = SampleDataGenerator::seeded(8);

    for _ in 0..20 {
        let submission = generator.generate(&template, QualityTier::Poor, false);
        let names: Vec<_> = submission.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["full_name", "email", "message"]);
        let email = extract_email(&submission).expect("email generated");
        assert!(email == "test@test.com" || email == "test@example.com", "{email}");
        assert_eq!(
            submission.get("message").and_then(FieldValue::as_text),
            Some("test message")
        );
    }
}

#[test]
fn forced_spam_uses_disposable_mail_and_keyword_text() {
    let template = FormTemplate::contact_inquiry();
    let mut generator = SampleDataGenerator::seeded(99);
    let detector = SpamDetector::new(SpamConfig::default());

    for tier in QualityTier::ALL {
        let submission = generator.generate(&template, tier, true);
        let email = extract_email(&submission).expect("email generated");
        assert!(email.starts_with("temp"), "{email}");

        let message = submission
            .get("message")
            .and_then(FieldValue::as_text)
            .expect("message generated");
        assert!(message.contains("!!! Visit our website NOW!"), "{message}");

        let analysis = detector.analyze(&submission, &BehaviorContext::default());
        assert!(analysis.spam_score >= 40, "{tier}: {}", analysis.spam_score);
    }
}

#[test]
fn seeded_generators_are_reproducible() {
    let template = FormTemplate::contact_inquiry();
    let mut first = SampleDataGenerator::seeded(77);
    let mut second = SampleDataGenerator::seeded(77);

    for tier in QualityTier::ALL {
        assert_eq!(
            first.generate(&template, tier, false),
            second.generate(&template, tier, false)
        );
    }
}
