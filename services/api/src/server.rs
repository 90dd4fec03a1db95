use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemorySubmissionRepository, LoggingMailer};
use crate::routes::with_submission_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use formscore::config::AppConfig;
use formscore::error::AppError;
use formscore::telemetry;
use formscore::workflows::submissions::SubmissionService;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let quality = config.quality.clone();
    if quality.spam.ai_check_configured() {
        // No classifier backend ships with the service yet.
        warn!("ai spam check enabled but no classifier is wired; factor will be skipped");
    }

    let submission_service = Arc::new(SubmissionService::new(
        Arc::new(InMemorySubmissionRepository::default()),
        Arc::new(LoggingMailer),
        quality.spam,
        quality.auto_response,
    ));

    let app = with_submission_routes(submission_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "submission quality service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
