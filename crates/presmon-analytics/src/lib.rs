//! Analytics for presmon dashboards.
//!
//! Turns loosely-typed backend rows into normalized [`Mention`]s, filters
//! them, and derives the dashboard views: label metrics, categorical
//! breakdowns, time series, media-source bias and policy impact. Failed
//! feeds degrade to built-in sample data (see [`pipeline`]).
//!
//! [`Mention`]: presmon_core::Mention

pub mod country;
pub mod error;
pub mod filter;
pub mod media;
pub mod metrics;
pub mod mock;
pub mod normalize;
pub mod pipeline;
pub mod platform;
pub mod scorer;
pub mod timeseries;

pub use error::AnalyticsError;
pub use filter::{FilterParams, MentionFilter};
pub use media::{MediaSourceSummary, PolicyImpact};
pub use metrics::{bias_level, CategoryBreakdown, SentimentMetrics, SourceBias};
pub use normalize::{normalize_all, normalize_mention, NormalizeContext};
pub use pipeline::{
    build_report, fetch_feeds, DashboardLoader, DashboardReport, DataOrigin, FeedResults,
    FeedStatus, LoaderSettings, ReportOptions,
};
pub use scorer::lexicon_score;
pub use timeseries::{Granularity, GranularityThresholds, SeriesPoint, Timeline};
