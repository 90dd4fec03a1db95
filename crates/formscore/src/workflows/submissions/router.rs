use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{FormId, Submission, SubmissionId};
use super::repository::{RepositoryError, SpamStatus, SubmissionQuery, SubmissionRepository};
use super::responder::ResponseMailer;
use super::scoring::ScoreRange;
use super::service::{SubmissionMeta, SubmissionService, SubmissionServiceError};

/// Router builder exposing intake, review, and scoring endpoints.
pub fn submission_router<R, M>(service: Arc<SubmissionService<R, M>>) -> Router
where
    R: SubmissionRepository + 'static,
    M: ResponseMailer + 'static,
{
    Router::new()
        .route(
            "/api/v1/forms/:form_id/submissions",
            post(submit_handler::<R, M>),
        )
        .route("/api/v1/submissions", get(list_handler::<R, M>))
        .route("/api/v1/submissions/:submission_id", get(detail_handler::<R, M>))
        .route(
            "/api/v1/submissions/:submission_id/spam",
            post(flag_handler::<R, M>),
        )
        .route("/api/v1/score", post(score_handler::<R, M>))
        .with_state(service)
}

pub(crate) async fn submit_handler<R, M>(
    State(service): State<Arc<SubmissionService<R, M>>>,
    Path(form_id): Path<u64>,
    headers: HeaderMap,
    axum::Json(data): axum::Json<Submission>,
) -> Response
where
    R: SubmissionRepository + 'static,
    M: ResponseMailer + 'static,
{
    let meta = SubmissionMeta {
        ip_address: client_address(&headers),
        user_agent: header_text(&headers, header::USER_AGENT.as_str()),
        submitted_at: None,
    };

    match service.submit(FormId(form_id), data, meta) {
        Ok(record) => {
            let view = record.summary_view(service.spam_threshold());
            (StatusCode::CREATED, axum::Json(view)).into_response()
        }
        Err(err) => service_error(err),
    }
}

pub(crate) async fn detail_handler<R, M>(
    State(service): State<Arc<SubmissionService<R, M>>>,
    Path(submission_id): Path<String>,
) -> Response
where
    R: SubmissionRepository + 'static,
    M: ResponseMailer + 'static,
{
    let id = SubmissionId(submission_id);
    match service.get(&id) {
        Ok(record) => {
            let payload = json!({
                "submission": record.summary_view(service.spam_threshold()),
                "data": record.data,
                "ip_address": record.ip_address,
                "user_agent": record.user_agent,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(SubmissionServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "error": "submission not found",
                "submission_id": id.0,
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(err) => service_error(err),
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ListOrder {
    #[default]
    Desc,
    Asc,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ListParams {
    form_id: Option<u64>,
    status: SpamStatus,
    range: ScoreRange,
    order: ListOrder,
    limit: Option<usize>,
    offset: usize,
}

pub(crate) async fn list_handler<R, M>(
    State(service): State<Arc<SubmissionService<R, M>>>,
    Query(params): Query<ListParams>,
) -> Response
where
    R: SubmissionRepository + 'static,
    M: ResponseMailer + 'static,
{
    let threshold = service.spam_threshold();
    let form_id = params.form_id.map(FormId);
    let query = SubmissionQuery {
        form_id,
        status: params.status,
        range: params.range,
        spam_threshold: threshold,
        ascending: matches!(params.order, ListOrder::Asc),
        limit: params.limit,
        offset: params.offset,
    };

    let listing = service
        .list(query)
        .and_then(|records| Ok((records, service.average_lead_score(form_id)?)));
    match listing {
        Ok((records, average)) => {
            let rows: Vec<_> = records
                .iter()
                .map(|record| record.summary_view(threshold))
                .collect();
            let payload = json!({
                "count": rows.len(),
                "average_lead_score": average,
                "submissions": rows,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => service_error(err),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct FlagRequest {
    #[serde(default = "default_flagged")]
    flagged: bool,
}

fn default_flagged() -> bool {
    true
}

pub(crate) async fn flag_handler<R, M>(
    State(service): State<Arc<SubmissionService<R, M>>>,
    Path(submission_id): Path<String>,
    axum::Json(request): axum::Json<FlagRequest>,
) -> Response
where
    R: SubmissionRepository + 'static,
    M: ResponseMailer + 'static,
{
    let id = SubmissionId(submission_id);
    match service.flag_spam(&id, request.flagged) {
        Ok(record) => {
            let view = record.summary_view(service.spam_threshold());
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(SubmissionServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "error": "submission not found",
                "submission_id": id.0,
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(err) => service_error(err),
    }
}

pub(crate) async fn score_handler<R, M>(
    State(service): State<Arc<SubmissionService<R, M>>>,
    axum::Json(data): axum::Json<Submission>,
) -> Response
where
    R: SubmissionRepository + 'static,
    M: ResponseMailer + 'static,
{
    let evaluation = service.evaluate(&data, None);
    (StatusCode::OK, axum::Json(evaluation)).into_response()
}

fn service_error(err: SubmissionServiceError) -> Response {
    let status = match &err {
        SubmissionServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        SubmissionServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        SubmissionServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
    };
    let payload = json!({
        "error": err.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}

/// First hop of `X-Forwarded-For`, else `X-Real-IP`.
fn client_address(headers: &HeaderMap) -> Option<String> {
    header_text(headers, "x-forwarded-for")
        .and_then(|value| {
            value
                .split(',')
                .next()
                .map(str::trim)
                .filter(|hop| !hop.is_empty())
                .map(str::to_string)
        })
        .or_else(|| header_text(headers, "x-real-ip"))
}

fn header_text(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
