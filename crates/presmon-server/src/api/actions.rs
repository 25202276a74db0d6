//! Write handlers that validate a request and forward it to the backend.

use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use presmon_api::{EmailConfig, SentimentFeedback, Target, TriggerRunRequest, WriteAck};

use crate::middleware::RequestId;

use super::{map_backend_error, ApiError, ApiResponse, AppState};

fn validation_error(req_id: &str, message: impl Into<String>) -> ApiError {
    ApiError::new(req_id, "validation_error", message)
}

/// Unwraps a JSON body, turning a malformed or mistyped body into a
/// `validation_error` instead of axum's plain-text rejection.
fn parse_body<T>(req_id: &str, body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| validation_error(req_id, rejection.body_text()))
}

fn validate_feedback(req_id: &str, body: &SentimentFeedback) -> Result<(), ApiError> {
    if body.mention_id.trim().is_empty() {
        return Err(validation_error(req_id, "mention_id must not be empty"));
    }
    if body.comment.as_deref().is_some_and(|c| c.len() > 2000) {
        return Err(validation_error(req_id, "comment must be at most 2000 characters"));
    }
    Ok(())
}

fn validate_email_config(req_id: &str, body: &EmailConfig) -> Result<(), ApiError> {
    if body.enabled && body.recipients.is_empty() {
        return Err(validation_error(
            req_id,
            "at least one recipient is required when reports are enabled",
        ));
    }
    if let Some(bad) = body.recipients.iter().find(|r| !looks_like_email(r)) {
        return Err(validation_error(
            req_id,
            format!("'{bad}' is not a valid email address"),
        ));
    }
    Ok(())
}

fn looks_like_email(value: &str) -> bool {
    let value = value.trim();
    value.split_once('@').is_some_and(|(local, domain)| {
        !local.is_empty()
            && domain.contains('.')
            && !domain.starts_with('.')
            && !domain.ends_with('.')
    }) && !value.contains(char::is_whitespace)
}

fn validate_target(req_id: &str, body: &Target) -> Result<(), ApiError> {
    let name = body.name.trim();
    if name.is_empty() || name.len() > 200 {
        return Err(validation_error(req_id, "name must be 1-200 characters"));
    }
    if body.keywords.iter().any(|k| k.trim().is_empty()) {
        return Err(validation_error(req_id, "keywords must not be blank"));
    }
    Ok(())
}

/// POST /api/v1/feedback
pub(super) async fn send_feedback(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<SentimentFeedback>, JsonRejection>,
) -> Result<Json<ApiResponse<WriteAck>>, ApiError> {
    let body = parse_body(&req_id.0, body)?;
    validate_feedback(&req_id.0, &body)?;
    let ack = state
        .loader
        .client()
        .send_feedback(&body)
        .await
        .map_err(|e| map_backend_error(req_id.0.clone(), &e))?;
    tracing::info!(
        mention_id = %body.mention_id,
        corrected = %body.corrected_sentiment,
        "sentiment feedback forwarded"
    );
    Ok(Json(ApiResponse::new(req_id.0, ack)))
}

/// POST /api/v1/email-config
pub(super) async fn configure_email(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<EmailConfig>, JsonRejection>,
) -> Result<Json<ApiResponse<WriteAck>>, ApiError> {
    let body = parse_body(&req_id.0, body)?;
    validate_email_config(&req_id.0, &body)?;
    let ack = state
        .loader
        .client()
        .configure_email(&body)
        .await
        .map_err(|e| map_backend_error(req_id.0.clone(), &e))?;
    Ok(Json(ApiResponse::new(req_id.0, ack)))
}

/// POST /api/v1/target
pub(super) async fn set_target(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<Target>, JsonRejection>,
) -> Result<Json<ApiResponse<WriteAck>>, ApiError> {
    let body = parse_body(&req_id.0, body)?;
    validate_target(&req_id.0, &body)?;
    let ack = state
        .loader
        .client()
        .set_target(&body)
        .await
        .map_err(|e| map_backend_error(req_id.0.clone(), &e))?;
    tracing::info!(target_name = %body.name, "monitoring target updated");
    Ok(Json(ApiResponse::new(req_id.0, ack)))
}

/// POST /api/v1/agent/trigger-run. The body is optional.
pub(super) async fn trigger_run(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Bytes,
) -> Result<(StatusCode, Json<ApiResponse<WriteAck>>), ApiError> {
    let request: TriggerRunRequest = if body.iter().all(u8::is_ascii_whitespace) {
        TriggerRunRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| validation_error(&req_id.0, format!("invalid request body: {e}")))?
    };
    let ack = state
        .loader
        .client()
        .trigger_agent_run(&request)
        .await
        .map_err(|e| map_backend_error(req_id.0.clone(), &e))?;
    tracing::info!(target_name = ?request.target, "collection run triggered");
    Ok((StatusCode::ACCEPTED, Json(ApiResponse::new(req_id.0, ack))))
}
