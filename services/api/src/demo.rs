use crate::infra::{InMemorySubmissionRepository, LoggingMailer};
use chrono::Utc;
use clap::Args;
use formscore::config::{AppConfig, QualityConfig};
use formscore::error::AppError;
use formscore::workflows::submissions::{
    BehaviorContext, FormId, FormTemplate, LeadScorer, QualityTier, SampleBatchOptions,
    SampleDataGenerator, SpamDetector, SpamStatus, Submission, SubmissionEvaluation,
    SubmissionQuery, SubmissionService,
};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Path to a JSON object of posted form field values
    #[arg(long)]
    pub(crate) file: PathBuf,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Number of sample submissions to generate
    #[arg(long, default_value_t = 20)]
    pub(crate) count: usize,
    /// Seed for reproducible output
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Percentage of samples forced to look like spam
    #[arg(long, default_value_t = 10)]
    pub(crate) spam_percentage: u8,
    /// Form template JSON to generate from (defaults to a contact form)
    #[arg(long)]
    pub(crate) template: Option<PathBuf>,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let quality = AppConfig::load()?.quality;
    let document = std::fs::read_to_string(&args.file)?;
    let submission: Submission = serde_json::from_str(&document)?;

    let evaluation = evaluate(&submission, &quality);
    println!("{}", serde_json::to_string_pretty(&evaluation)?);
    Ok(())
}

pub(crate) fn evaluate(submission: &Submission, quality: &QualityConfig) -> SubmissionEvaluation {
    let detector = SpamDetector::new(quality.spam.clone());
    SubmissionEvaluation {
        lead: LeadScorer::new().score(submission),
        spam: detector.analyze(submission, &BehaviorContext::default()),
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub(crate) struct TierStats {
    pub(crate) count: usize,
    pub(crate) forced_spam: usize,
    lead_total: u32,
    spam_total: u32,
}

impl TierStats {
    fn record(&mut self, evaluation: &SubmissionEvaluation, forced_spam: bool) {
        self.count += 1;
        self.forced_spam += usize::from(forced_spam);
        self.lead_total += u32::from(evaluation.lead.total);
        self.spam_total += u32::from(evaluation.spam.spam_score);
    }

    pub(crate) fn mean_lead(&self) -> f64 {
        mean(self.lead_total, self.count)
    }

    pub(crate) fn mean_spam(&self) -> f64 {
        mean(self.spam_total, self.count)
    }
}

fn mean(total: u32, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        f64::from(total) / count as f64
    }
}

pub(crate) fn tier_statistics(
    template: &FormTemplate,
    options: &SampleBatchOptions,
    seed: Option<u64>,
    quality: &QualityConfig,
) -> BTreeMap<QualityTier, TierStats> {
    let mut generator = generator(seed);
    let mut stats = BTreeMap::new();

    for sample in generator.generate_batch(template, options, Utc::now()) {
        let evaluation = evaluate(&sample.data, quality);
        stats
            .entry(sample.tier)
            .or_insert_with(TierStats::default)
            .record(&evaluation, sample.forced_spam);
    }

    stats
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        count,
        seed,
        spam_percentage,
        template,
    } = args;

    let quality = AppConfig::load()?.quality;
    let template = match template {
        Some(path) => FormTemplate::from_json(&std::fs::read_to_string(path)?)?,
        None => FormTemplate::contact_inquiry(),
    };
    let options = SampleBatchOptions {
        count,
        include_spam: spam_percentage > 0,
        spam_percentage: spam_percentage.min(100),
        ..SampleBatchOptions::default()
    };

    println!("Submission quality demo");
    println!(
        "Template: {} ({} fields), {} samples, {}% forced spam",
        template.name,
        template.fields.len(),
        options.count,
        options.spam_percentage
    );

    println!("\nEngine scores by tier");
    let stats = tier_statistics(&template, &options, seed, &quality);
    for tier in QualityTier::ALL {
        let Some(entry) = stats.get(&tier) else {
            println!("- {tier}: no samples");
            continue;
        };
        println!(
            "- {tier}: {} samples, mean lead {:.1}, mean spam {:.1}, {} forced spam",
            entry.count,
            entry.mean_lead(),
            entry.mean_spam(),
            entry.forced_spam
        );
    }

    let service = SubmissionService::new(
        Arc::new(InMemorySubmissionRepository::default()),
        Arc::new(LoggingMailer),
        quality.spam.clone(),
        quality.auto_response.clone(),
    );
    let form_id = FormId(1);
    let seeded = service.seed_samples(form_id, &template, &options, &mut generator(seed))?;

    println!("\nSeeded store");
    println!("- Submissions: {}", seeded.len());
    println!(
        "- Average lead score: {}",
        service.average_lead_score(Some(form_id))?
    );
    for status in [SpamStatus::Spam, SpamStatus::Suspicious, SpamStatus::NotSpam] {
        let mut query = SubmissionQuery::new(service.spam_threshold());
        query.form_id = Some(form_id);
        query.status = status;
        println!("- {:?}: {}", status, service.list(query)?.len());
    }

    if let Some(top) = seeded.iter().max_by_key(|record| record.lead_score) {
        let view = top.summary_view(service.spam_threshold());
        println!(
            "- Strongest lead: {} scored {} ({:?})",
            view.id, view.lead_score, view.lead_category
        );
    }

    Ok(())
}

fn generator(seed: Option<u64>) -> SampleDataGenerator {
    match seed {
        Some(seed) => SampleDataGenerator::seeded(seed),
        None => SampleDataGenerator::new(),
    }
}
