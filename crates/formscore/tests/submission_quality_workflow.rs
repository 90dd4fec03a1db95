//! Integration scenarios for the submission quality engine.
//!
//! Everything goes through the public service facade and HTTP router: raw
//! JSON in, scores and acknowledgements out.

mod common {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use chrono::{Duration, Utc};

    use formscore::workflows::submissions::{
        AutoResponse, AutoResponseConfig, MailerError, RateLookupError, RepositoryError,
        ResponseMailer, SpamConfig, Submission, SubmissionId, SubmissionQuery, SubmissionRateLookup,
        SubmissionRecord, SubmissionRepository, SubmissionService,
    };

    pub(super) fn submission(document: &str) -> Submission {
        serde_json::from_str(document).expect("valid submission document")
    }

    #[derive(Default)]
    pub(super) struct Store {
        records: Mutex<HashMap<SubmissionId, SubmissionRecord>>,
    }

    impl SubmissionRateLookup for Store {
        fn count_recent_submissions(
            &self,
            ip_address: &str,
            window: Duration,
        ) -> Result<u32, RateLookupError> {
            let since = Utc::now() - window;
            let records = self.records.lock().expect("store mutex poisoned");
            Ok(records
                .values()
                .filter(|record| record.ip_address.as_deref() == Some(ip_address))
                .filter(|record| record.submitted_at >= since)
                .count() as u32)
        }
    }

    impl SubmissionRepository for Store {
        fn insert(&self, record: SubmissionRecord) -> Result<SubmissionRecord, RepositoryError> {
            let mut records = self.records.lock().expect("store mutex poisoned");
            if records.contains_key(&record.id) {
                return Err(RepositoryError::Conflict);
            }
            records.insert(record.id.clone(), record.clone());
            Ok(record)
        }

        fn update(&self, record: SubmissionRecord) -> Result<(), RepositoryError> {
            self.records
                .lock()
                .expect("store mutex poisoned")
                .insert(record.id.clone(), record);
            Ok(())
        }

        fn fetch(&self, id: &SubmissionId) -> Result<Option<SubmissionRecord>, RepositoryError> {
            Ok(self
                .records
                .lock()
                .expect("store mutex poisoned")
                .get(id)
                .cloned())
        }

        fn list(&self, query: &SubmissionQuery) -> Result<Vec<SubmissionRecord>, RepositoryError> {
            let records = self.records.lock().expect("store mutex poisoned");
            Ok(query.apply(records.values().cloned()))
        }
    }

    #[derive(Default)]
    pub(super) struct Outbox {
        sent: Mutex<Vec<AutoResponse>>,
    }

    impl Outbox {
        pub(super) fn sent(&self) -> Vec<AutoResponse> {
            self.sent.lock().expect("outbox mutex poisoned").clone()
        }
    }

    impl ResponseMailer for Outbox {
        fn send(&self, response: &AutoResponse) -> Result<(), MailerError> {
            self.sent
                .lock()
                .expect("outbox mutex poisoned")
                .push(response.clone());
            Ok(())
        }
    }

    pub(super) fn build_service() -> (Arc<SubmissionService<Store, Outbox>>, Arc<Outbox>) {
        let outbox = Arc::new(Outbox::default());
        let service = SubmissionService::new(
            Arc::new(Store::default()),
            outbox.clone(),
            SpamConfig::default(),
            AutoResponseConfig {
                enabled: true,
                skip_low_scores: true,
                from_name: "Riley".to_string(),
                company_name: "Northwind Studio".to_string(),
            },
        );
        (Arc::new(service), outbox)
    }
}

mod scoring {
    use super::common::*;
    use formscore::workflows::submissions::{LeadScorer, ScoreCategory};

    #[test]
    fn json_documents_score_in_field_order() {
        let scorer = LeadScorer::new();

        let lead = submission(
            r#"{"email":"jane@gmail.com","full_name":"Jane Doe","message":"Hi, I'd like a quote for your services please, thanks"}"#,
        );
        assert_eq!(scorer.score(&lead).total, 50);

        let business = submission(r#"{"email":"jane@acmecorp.com","company":"Acme Corp"}"#);
        assert_eq!(scorer.score(&business).total, 35);

        assert_eq!(scorer.score(&submission("{}")).total, 0);
    }

    #[test]
    fn first_matching_email_field_wins() {
        let scorer = LeadScorer::new();
        let invalid_first = submission(
            r#"{"work_email":"n/a","personal_email":"sam@example.org","full_name":"Sam Lee"}"#,
        );
        let valid_first = submission(
            r#"{"personal_email":"sam@example.org","work_email":"n/a","full_name":"Sam Lee"}"#,
        );

        assert_eq!(scorer.score(&invalid_first).total, 10);
        let score = scorer.score(&valid_first);
        assert_eq!(score.total, 35);
        assert_eq!(score.category(), ScoreCategory::Low);
    }
}

mod spam {
    use super::common::*;
    use formscore::workflows::submissions::{BehaviorContext, SpamConfig, SpamDetector};

    #[test]
    fn lowering_the_threshold_reclassifies_the_same_content() {
        let shouted = submission(
            r#"{"email":"temp123@mailinator.com","comment":"BUY NOW!!! CLICK HERE!!!"}"#,
        );

        let default = SpamDetector::new(SpamConfig::default())
            .analyze(&shouted, &BehaviorContext::default());
        assert_eq!(default.spam_score, 45);
        assert!(!default.is_spam);

        let strict = SpamDetector::new(SpamConfig {
            threshold: 45,
            ..SpamConfig::default()
        })
        .analyze(&shouted, &BehaviorContext::default());
        assert!(strict.is_spam);
    }
}

mod sampling {
    use formscore::workflows::submissions::{
        FormTemplate, LeadScorer, QualityTier, SampleDataGenerator,
    };

    #[test]
    fn generated_tiers_preserve_lead_ordering() {
        let template = FormTemplate::contact_inquiry();
        let scorer = LeadScorer::new();
        let mut generator = SampleDataGenerator::seeded(31);

        let means: Vec<f64> = QualityTier::ALL
            .iter()
            .map(|tier| {
                let total: u32 = (0..100)
                    .map(|_| {
                        let sample = generator.generate(&template, *tier, false);
                        u32::from(scorer.score(&sample).total)
                    })
                    .sum();
                f64::from(total) / 100.0
            })
            .collect();

        assert!(means.windows(2).all(|pair| pair[0] > pair[1]), "{means:?}");
    }
}

mod routing {
    use super::common::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use formscore::workflows::submissions::submission_router;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn read_json(response: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&body).expect("json payload")
    }

    #[tokio::test]
    async fn intake_then_review_round_trip() {
        let (service, outbox) = build_service();
        let router = submission_router(service);

        let response = router
            .clone()
            .oneshot(
                Request::post("/api/v1/forms/9/submissions")
                    .header(header::CONTENT_TYPE, "application/json")
                    .header("x-forwarded-for", "192.0.2.44")
                    .body(Body::from(
                        json!({
                            "full_name": "Morgan Reyes",
                            "email": "morgan@harborfreight.dev",
                            "company": "Harbor Freight Partners",
                            "phone": "+1 515 555 0199",
                            "message": "Our agency needs help migrating three client sites before the holiday rush."
                        })
                        .to_string(),
                    ))
                    .expect("request builds"),
            )
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = read_json(response).await;
        let id = created
            .get("id")
            .and_then(Value::as_str)
            .expect("id returned")
            .to_string();
        assert_eq!(created.get("lead_score"), Some(&json!(80)));

        let response = router
            .oneshot(
                Request::get(format!("/api/v1/submissions/{id}"))
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
        let detail = read_json(response).await;
        assert_eq!(detail["ip_address"], json!("192.0.2.44"));
        assert_eq!(detail["data"]["company"], json!("Harbor Freight Partners"));

        let sent = outbox.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "Great to hear from you, Morgan Reyes!");
    }
}
