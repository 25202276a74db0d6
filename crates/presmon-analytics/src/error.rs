use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("backend error: {0}")]
    Api(#[from] presmon_api::ApiError),

    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    #[error("invalid granularity: {0}")]
    InvalidGranularity(String),
}
