//! Media-source and policy-impact listings.

use presmon_api::{MediaSourceKind, RawMediaSource, RawPolicyImpact};
use presmon_core::{BiasLevel, SentimentLabel};
use serde::Serialize;

use crate::metrics::bias_level;
use crate::normalize::reconcile_label;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaSourceSummary {
    pub name: String,
    pub category: MediaSourceKind,
    pub mentions: u64,
    pub positive: u64,
    pub neutral: u64,
    pub negative: u64,
    pub average_score: f64,
    pub bias: BiasLevel,
    pub country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolicyImpact {
    pub policy: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub impact_score: f64,
    pub sentiment_score: f64,
    pub sentiment: SentimentLabel,
    pub mentions: u64,
}

/// Normalizes one media-source listing, most-mentioned first.
///
/// Rows without a name are skipped. A missing mention count is the sum of
/// the label counts; a missing score is derived from them as
/// `(positive - negative) / total`.
#[must_use]
pub fn normalize_media_sources(
    kind: MediaSourceKind,
    rows: &[RawMediaSource],
) -> Vec<MediaSourceSummary> {
    let mut out: Vec<MediaSourceSummary> = rows
        .iter()
        .filter_map(|row| {
            let name = row.name()?;
            let (positive, neutral, negative) = row.label_counts();
            let labelled = positive.saturating_add(neutral).saturating_add(negative);
            let average_score = row
                .score()
                .map(|s| s.clamp(-1.0, 1.0))
                .or_else(|| score_from_counts(positive, negative, labelled))
                .map_or(0.0, round3);
            Some(MediaSourceSummary {
                name,
                category: kind,
                mentions: row.mentions().unwrap_or(labelled),
                positive,
                neutral,
                negative,
                average_score,
                bias: bias_level(average_score),
                country: row.country(),
            })
        })
        .collect();

    let skipped = rows.len() - out.len();
    if skipped > 0 {
        tracing::debug!(feed = %kind, skipped, "media source rows without a name were skipped");
    }
    out.sort_by(|a, b| b.mentions.cmp(&a.mentions).then_with(|| a.name.cmp(&b.name)));
    out
}

/// Normalizes policy-impact rows, strongest impact first.
///
/// A missing impact score falls back to the sentiment score and vice versa.
#[must_use]
pub fn normalize_policy_impact(rows: &[RawPolicyImpact]) -> Vec<PolicyImpact> {
    let mut out: Vec<PolicyImpact> = rows
        .iter()
        .filter_map(|row| {
            let policy = row.policy()?;
            let impact = row.impact_score();
            let sentiment_score = row
                .sentiment_score()
                .or(impact)
                .map_or(0.0, |s| round3(s.clamp(-1.0, 1.0)));
            let impact_score = impact.map_or(sentiment_score, round3);
            Some(PolicyImpact {
                policy,
                category: row.category(),
                description: row.description(),
                impact_score,
                sentiment_score,
                sentiment: reconcile_label(row.label().as_deref(), Some(sentiment_score)),
                mentions: row.mentions().unwrap_or(0),
            })
        })
        .collect();
    out.sort_by(|a, b| {
        b.impact_score
            .abs()
            .total_cmp(&a.impact_score.abs())
            .then_with(|| a.policy.cmp(&b.policy))
    });
    out
}

#[allow(clippy::cast_precision_loss)]
fn score_from_counts(positive: u64, negative: u64, total: u64) -> Option<f64> {
    (total > 0).then(|| (positive as f64 - negative as f64) / total as f64)
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
