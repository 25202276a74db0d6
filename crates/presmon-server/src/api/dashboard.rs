//! Dashboard read handlers.
//!
//! - `GET /api/v1/dashboard`               full report
//! - `GET /api/v1/dashboard/metrics`       label counts and percentages
//! - `GET /api/v1/dashboard/timeline`      bucketed series
//! - `GET /api/v1/dashboard/breakdowns`    per-category breakdowns
//! - `GET /api/v1/dashboard/media-sources` outlet listings and bias
//! - `GET /api/v1/dashboard/policy-impact` policy impact rows
//!
//! Every route accepts `from`, `to`, `platform`, `source_type`, `country`,
//! `sentiment`, `q` and `granularity` query parameters.

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use presmon_analytics::{
    pipeline::Breakdowns, DashboardReport, FilterParams, Granularity, MediaSourceSummary,
    MentionFilter, PolicyImpact, SentimentMetrics, SourceBias, Timeline,
};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState};

#[derive(Debug, Default, Deserialize)]
pub(super) struct DashboardQuery {
    #[serde(flatten)]
    pub filter: FilterParams,
    pub granularity: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct MediaSourcesData {
    pub sources: Vec<MediaSourceSummary>,
    pub bias: Vec<SourceBias>,
}

async fn load_report(
    state: &AppState,
    req_id: &str,
    query: &DashboardQuery,
) -> Result<DashboardReport, ApiError> {
    let filter = MentionFilter::try_from(&query.filter)
        .map_err(|e| ApiError::new(req_id, "bad_request", e.to_string()))?;
    let granularity = query
        .granularity
        .as_deref()
        .map(Granularity::parse)
        .transpose()
        .map_err(|e| ApiError::new(req_id, "bad_request", e.to_string()))?
        .flatten();

    Ok(state.loader.load(filter, granularity).await)
}

pub(super) async fn get_dashboard(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<ApiResponse<DashboardReport>>, ApiError> {
    let report = load_report(&state, &req_id.0, &query).await?;
    Ok(Json(ApiResponse::new(req_id.0, report)))
}

pub(super) async fn get_metrics(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<ApiResponse<SentimentMetrics>>, ApiError> {
    let report = load_report(&state, &req_id.0, &query).await?;
    Ok(Json(ApiResponse::new(req_id.0, report.metrics)))
}

pub(super) async fn get_timeline(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<ApiResponse<Timeline>>, ApiError> {
    let report = load_report(&state, &req_id.0, &query).await?;
    Ok(Json(ApiResponse::new(req_id.0, report.timeline)))
}

pub(super) async fn get_breakdowns(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<ApiResponse<Breakdowns>>, ApiError> {
    let report = load_report(&state, &req_id.0, &query).await?;
    Ok(Json(ApiResponse::new(req_id.0, report.breakdowns)))
}

pub(super) async fn get_media_sources(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<ApiResponse<MediaSourcesData>>, ApiError> {
    let report = load_report(&state, &req_id.0, &query).await?;
    Ok(Json(ApiResponse::new(
        req_id.0,
        MediaSourcesData {
            sources: report.media_sources,
            bias: report.media_bias,
        },
    )))
}

pub(super) async fn get_policy_impact(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<ApiResponse<Vec<PolicyImpact>>>, ApiError> {
    let report = load_report(&state, &req_id.0, &query).await?;
    Ok(Json(ApiResponse::new(req_id.0, report.policy_impact)))
}
