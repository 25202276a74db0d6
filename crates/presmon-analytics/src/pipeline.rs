//! Dashboard pipeline: fetch every feed, fall back where a fetch failed,
//! then shape the result into a [`DashboardReport`].

use chrono::{DateTime, Utc};
use futures::future::join_all;
use presmon_api::{
    ApiClient, ApiClientConfig, ApiError, MediaSourceKind, RawMediaSource, RawMention,
    RawPolicyImpact,
};
use presmon_core::{AppConfig, Mention, SentimentLabel};
use rand::Rng;
use serde::Serialize;

use crate::error::AnalyticsError;
use crate::filter::MentionFilter;
use crate::media::{
    normalize_media_sources, normalize_policy_impact, MediaSourceSummary, PolicyImpact,
};
use crate::metrics::{
    breakdown_by_country, breakdown_by_platform, breakdown_by_source, breakdown_by_source_type,
    media_source_bias, sentiment_metrics, top_mentions, CategoryBreakdown, SentimentMetrics,
    SourceBias,
};
use crate::mock::{mock_media_sources, mock_mentions, mock_policy_impact};
use crate::normalize::{normalize_all, NormalizeContext};
use crate::timeseries::{aggregate, aggregate_auto, Granularity, GranularityThresholds, Timeline};

/// Raw outcome of one fetch round, one `Result` per feed.
#[derive(Debug)]
pub struct FeedResults {
    pub mentions: Result<Vec<RawMention>, ApiError>,
    pub media_sources: Vec<(MediaSourceKind, Result<Vec<RawMediaSource>, ApiError>)>,
    pub policy_impact: Result<Vec<RawPolicyImpact>, ApiError>,
}

/// Where a feed's data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataOrigin {
    Live,
    Mock,
    Empty,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedStatus {
    pub feed: String,
    pub origin: DataOrigin,
    pub records: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Breakdowns {
    pub platform: Vec<CategoryBreakdown>,
    pub country: Vec<CategoryBreakdown>,
    pub source_type: Vec<CategoryBreakdown>,
    pub source: Vec<CategoryBreakdown>,
}

/// How many values in the filtered mentions were filled in by normalization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InferenceStats {
    pub dates: usize,
    pub scores: usize,
    pub countries: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub generated_at: DateTime<Utc>,
    pub filter: MentionFilter,
    pub feeds: Vec<FeedStatus>,
    /// Mentions loaded before filtering.
    pub total_loaded: usize,
    pub metrics: SentimentMetrics,
    pub breakdowns: Breakdowns,
    pub timeline: Timeline,
    pub media_bias: Vec<SourceBias>,
    pub media_sources: Vec<MediaSourceSummary>,
    pub policy_impact: Vec<PolicyImpact>,
    pub top_positive: Vec<Mention>,
    pub top_negative: Vec<Mention>,
    /// Newest filtered mentions first.
    pub recent_mentions: Vec<Mention>,
    pub inference: InferenceStats,
}

#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub now: DateTime<Utc>,
    pub default_country: String,
    pub mock_fallback: bool,
    pub filter: MentionFilter,
    /// `None` picks a granularity from the data span.
    pub granularity: Option<Granularity>,
    pub thresholds: GranularityThresholds,
    pub top_n: usize,
    pub recent_limit: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            now: Utc::now(),
            default_country: "Nigeria".to_string(),
            mock_fallback: true,
            filter: MentionFilter::default(),
            granularity: None,
            thresholds: GranularityThresholds::default(),
            top_n: 5,
            recent_limit: 50,
        }
    }
}

/// Fetches every feed concurrently. Never fails: each feed's error is kept
/// for [`build_report`] to handle.
pub async fn fetch_feeds(client: &ApiClient) -> FeedResults {
    let media = join_all(
        MediaSourceKind::ALL
            .into_iter()
            .map(|kind| async move { (kind, client.media_sources(kind).await) }),
    );
    let (mentions, media_sources, policy_impact) =
        tokio::join!(client.latest_data(), media, client.policy_impact());
    FeedResults {
        mentions,
        media_sources,
        policy_impact,
    }
}

/// Applies the fallback policy to one feed.
fn resolve_feed<T>(
    feed: String,
    result: Result<Vec<T>, ApiError>,
    mock_fallback: bool,
    mock: impl FnOnce() -> Vec<T>,
) -> (Vec<T>, FeedStatus) {
    match result {
        Ok(rows) => {
            let status = FeedStatus {
                feed,
                origin: DataOrigin::Live,
                records: rows.len(),
                error: None,
            };
            (rows, status)
        }
        Err(e) => {
            let (rows, origin) = if mock_fallback {
                (mock(), DataOrigin::Mock)
            } else {
                (Vec::new(), DataOrigin::Empty)
            };
            tracing::warn!(
                feed = %feed,
                error = %e,
                fallback = ?origin,
                "feed fetch failed, serving fallback data"
            );
            let status = FeedStatus {
                feed,
                origin,
                records: rows.len(),
                error: Some(e.to_string()),
            };
            (rows, status)
        }
    }
}

/// Shapes fetched feeds into a report.
///
/// Failed feeds are replaced with built-in sample data when
/// `options.mock_fallback` is set and with nothing otherwise. Metrics,
/// breakdowns and the timeline cover the filtered mentions; media-source and
/// policy listings are unfiltered.
pub fn build_report<R: Rng>(
    feeds: FeedResults,
    options: &ReportOptions,
    rng: &mut R,
) -> DashboardReport {
    let fallback = options.mock_fallback;
    let now = options.now;
    let mut statuses = Vec::with_capacity(2 + feeds.media_sources.len());

    let (raw_mentions, status) = resolve_feed("latest_data".to_string(), feeds.mentions, fallback, || {
        mock_mentions(now)
    });
    statuses.push(status);

    let mut media_sources = Vec::new();
    for (kind, result) in feeds.media_sources {
        let (rows, status) = resolve_feed(format!("media_sources/{kind}"), result, fallback, || {
            mock_media_sources(kind)
        });
        statuses.push(status);
        media_sources.extend(normalize_media_sources(kind, &rows));
    }

    let (raw_policy, status) = resolve_feed(
        "policy_impact".to_string(),
        feeds.policy_impact,
        fallback,
        mock_policy_impact,
    );
    statuses.push(status);

    let mut ctx = NormalizeContext::new(now, options.default_country.clone(), rng);
    let all = normalize_all(&raw_mentions, &mut ctx);
    let mentions = options.filter.apply(&all);

    let timeline = match options.granularity {
        Some(granularity) => Timeline {
            granularity,
            points: aggregate(&mentions, granularity),
        },
        None => aggregate_auto(&mentions, options.thresholds),
    };

    let inference = InferenceStats {
        dates: mentions.iter().filter(|m| m.date_inferred).count(),
        scores: mentions.iter().filter(|m| m.score_inferred).count(),
        countries: mentions.iter().filter(|m| m.country_inferred).count(),
    };

    let mut recent_mentions: Vec<Mention> = mentions.clone();
    recent_mentions.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    recent_mentions.truncate(options.recent_limit);

    tracing::info!(
        loaded = all.len(),
        matched = mentions.len(),
        granularity = %timeline.granularity,
        "dashboard report built"
    );

    DashboardReport {
        generated_at: now,
        filter: options.filter.clone(),
        feeds: statuses,
        total_loaded: all.len(),
        metrics: sentiment_metrics(&mentions),
        breakdowns: Breakdowns {
            platform: breakdown_by_platform(&mentions),
            country: breakdown_by_country(&mentions),
            source_type: breakdown_by_source_type(&mentions),
            source: breakdown_by_source(&mentions),
        },
        timeline,
        media_bias: media_source_bias(&mentions),
        media_sources,
        policy_impact: normalize_policy_impact(&raw_policy),
        top_positive: top_mentions(&mentions, SentimentLabel::Positive, options.top_n),
        top_negative: top_mentions(&mentions, SentimentLabel::Negative, options.top_n),
        recent_mentions,
        inference,
    }
}

/// Settings that shape every report a loader builds.
#[derive(Debug, Clone)]
pub struct LoaderSettings {
    pub default_country: String,
    pub mock_fallback: bool,
    pub thresholds: GranularityThresholds,
    pub top_n: usize,
    pub recent_limit: usize,
}

impl LoaderSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        let defaults = ReportOptions::default();
        Self {
            default_country: config.default_country.clone(),
            mock_fallback: config.mock_fallback,
            thresholds: GranularityThresholds {
                daily_max_points: config.daily_max_points,
                weekly_max_points: config.weekly_max_points,
            },
            top_n: defaults.top_n,
            recent_limit: defaults.recent_limit,
        }
    }
}

/// Fetches and shapes dashboard reports against one backend.
#[derive(Debug, Clone)]
pub struct DashboardLoader {
    client: ApiClient,
    settings: LoaderSettings,
}

impl DashboardLoader {
    #[must_use]
    pub fn new(client: ApiClient, settings: LoaderSettings) -> Self {
        Self { client, settings }
    }

    /// # Errors
    ///
    /// Returns [`AnalyticsError::Api`] if the HTTP client cannot be built.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, AnalyticsError> {
        let client = ApiClient::new(&ApiClientConfig::from_app_config(config))?;
        Ok(Self::new(client, LoaderSettings::from_app_config(config)))
    }

    #[must_use]
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    #[must_use]
    pub fn settings(&self) -> &LoaderSettings {
        &self.settings
    }

    /// Loads a fresh report. Feed failures degrade to fallback data and are
    /// reported in [`DashboardReport::feeds`].
    pub async fn load(
        &self,
        filter: MentionFilter,
        granularity: Option<Granularity>,
    ) -> DashboardReport {
        let feeds = fetch_feeds(&self.client).await;
        let options = ReportOptions {
            now: Utc::now(),
            default_country: self.settings.default_country.clone(),
            mock_fallback: self.settings.mock_fallback,
            filter,
            granularity,
            thresholds: self.settings.thresholds,
            top_n: self.settings.top_n,
            recent_limit: self.settings.recent_limit,
        };
        build_report(feeds, &options, &mut rand::rng())
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
