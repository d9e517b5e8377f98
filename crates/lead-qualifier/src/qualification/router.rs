use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::answers::AnswerPayload;
use super::classification::QualificationStatus;
use super::questionnaire::Subcategory;
use super::records::{
    QualificationId, QualificationRepository, QualificationSubmission, RepositoryError,
};
use super::scoring::LeadScore;
use super::service::{LeadQualificationService, QualificationServiceError};
use super::store::{KeyValueStore, WeightStoreError};
use super::weights::WeightConfig;

const DEFAULT_RECENT_LIMIT: usize = 20;

#[derive(Debug, Clone, Serialize)]
pub struct ScoreResponse {
    pub score: LeadScore,
    pub status: QualificationStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightUpdateRequest {
    pub option: String,
    pub points: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<usize>,
}

/// Router builder exposing the weight editor, live scoring, and qualification records.
pub fn qualification_router<S, R>(service: Arc<LeadQualificationService<S, R>>) -> Router
where
    S: KeyValueStore + 'static,
    R: QualificationRepository + 'static,
{
    Router::new()
        .route("/api/v1/questionnaire", get(questionnaire_handler::<S, R>))
        .route(
            "/api/v1/weights",
            get(weights_handler::<S, R>).put(replace_weights_handler::<S, R>),
        )
        .route("/api/v1/weights/reset", post(reset_weights_handler::<S, R>))
        .route(
            "/api/v1/weights/:subcategory",
            put(update_weight_handler::<S, R>),
        )
        .route("/api/v1/leads/score", post(score_handler::<S, R>))
        .route(
            "/api/v1/qualifications",
            post(submit_handler::<S, R>).get(recent_handler::<S, R>),
        )
        .route(
            "/api/v1/qualifications/summary",
            get(summary_handler::<S, R>),
        )
        .route(
            "/api/v1/qualifications/:qualification_id",
            get(record_handler::<S, R>),
        )
        .with_state(service)
}

pub(crate) async fn questionnaire_handler<S, R>(
    State(service): State<Arc<LeadQualificationService<S, R>>>,
) -> Response
where
    S: KeyValueStore + 'static,
    R: QualificationRepository + 'static,
{
    (StatusCode::OK, Json(service.questionnaire())).into_response()
}

pub(crate) async fn weights_handler<S, R>(
    State(service): State<Arc<LeadQualificationService<S, R>>>,
) -> Response
where
    S: KeyValueStore + 'static,
    R: QualificationRepository + 'static,
{
    (StatusCode::OK, Json(service.weights())).into_response()
}

pub(crate) async fn replace_weights_handler<S, R>(
    State(service): State<Arc<LeadQualificationService<S, R>>>,
    Json(weights): Json<WeightConfig>,
) -> Response
where
    S: KeyValueStore + 'static,
    R: QualificationRepository + 'static,
{
    match service.update_weights(weights) {
        Ok(stored) => (StatusCode::OK, Json(stored)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn reset_weights_handler<S, R>(
    State(service): State<Arc<LeadQualificationService<S, R>>>,
) -> Response
where
    S: KeyValueStore + 'static,
    R: QualificationRepository + 'static,
{
    match service.reset_weights() {
        Ok(defaults) => (StatusCode::OK, Json(defaults)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn update_weight_handler<S, R>(
    State(service): State<Arc<LeadQualificationService<S, R>>>,
    Path(subcategory): Path<String>,
    Json(request): Json<WeightUpdateRequest>,
) -> Response
where
    S: KeyValueStore + 'static,
    R: QualificationRepository + 'static,
{
    let Some(parsed) = Subcategory::from_key(&subcategory) else {
        let payload = json!({
            "error": format!("unknown subcategory '{subcategory}'"),
        });
        return (StatusCode::NOT_FOUND, Json(payload)).into_response();
    };

    match service.set_weight(parsed, &request.option, request.points) {
        Ok(weights) => (StatusCode::OK, Json(weights)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn score_handler<S, R>(
    State(service): State<Arc<LeadQualificationService<S, R>>>,
    Json(payload): Json<AnswerPayload>,
) -> Response
where
    S: KeyValueStore + 'static,
    R: QualificationRepository + 'static,
{
    let answers = match service.resolve_answers(payload) {
        Ok(answers) => answers,
        Err(err) => return error_response(err),
    };

    let score = service.score(&answers);
    let body = ScoreResponse {
        status: score.status(),
        score,
    };
    (StatusCode::OK, Json(body)).into_response()
}

pub(crate) async fn submit_handler<S, R>(
    State(service): State<Arc<LeadQualificationService<S, R>>>,
    Json(submission): Json<QualificationSubmission>,
) -> Response
where
    S: KeyValueStore + 'static,
    R: QualificationRepository + 'static,
{
    match service.submit(submission) {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn recent_handler<S, R>(
    State(service): State<Arc<LeadQualificationService<S, R>>>,
    Query(query): Query<RecentQuery>,
) -> Response
where
    S: KeyValueStore + 'static,
    R: QualificationRepository + 'static,
{
    let limit = query.limit.unwrap_or(DEFAULT_RECENT_LIMIT);
    match service.recent(limit) {
        Ok(records) => (StatusCode::OK, Json(records)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn summary_handler<S, R>(
    State(service): State<Arc<LeadQualificationService<S, R>>>,
) -> Response
where
    S: KeyValueStore + 'static,
    R: QualificationRepository + 'static,
{
    match service.summary() {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn record_handler<S, R>(
    State(service): State<Arc<LeadQualificationService<S, R>>>,
    Path(qualification_id): Path<String>,
) -> Response
where
    S: KeyValueStore + 'static,
    R: QualificationRepository + 'static,
{
    match service.get(&QualificationId(qualification_id)) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: QualificationServiceError) -> Response {
    let status = match &err {
        QualificationServiceError::Submission(_)
        | QualificationServiceError::Answers(_)
        | QualificationServiceError::Weights(WeightStoreError::Invalid(_)) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        QualificationServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        QualificationServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        QualificationServiceError::Weights(_) | QualificationServiceError::Repository(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({
        "error": err.to_string(),
    });
    (status, Json(payload)).into_response()
}
