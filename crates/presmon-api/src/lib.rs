//! Typed client for the sentiment backend that feeds the dashboard.
//!
//! Every endpoint answers with a `{"status": ..., "data": ...}` envelope;
//! [`ApiClient`] unwraps it, surfaces backend-reported failures as
//! [`ApiError::Backend`] and decodes listing rows one at a time so a single
//! malformed row never sinks a whole feed.

pub mod client;
pub mod error;
pub mod types;

mod retry;

pub use client::{ApiClient, ApiClientConfig};
pub use error::ApiError;
pub use types::{
    EmailConfig, MediaSourceKind, RawMediaSource, RawMention, RawPolicyImpact, ReportFrequency,
    SentimentFeedback, Target, TriggerRunRequest, WriteAck,
};
