//! Built-in sample data served when a live feed is unavailable.
//!
//! The rows go through the same normalization as live data, so they carry
//! explicit scores and countries and produce identical output on every load.

use chrono::{DateTime, Duration, Utc};
use presmon_api::{MediaSourceKind, RawMediaSource, RawMention, RawPolicyImpact};
use serde_json::{json, Value};

/// `(days ago, text, label, score, platform, source, country)`
const MOCK_MENTIONS: &[(i64, &str, &str, f64, &str, &str, &str)] = &[
    (0, "President commissions new Lagos-Ibadan rail extension", "positive", 0.72, "twitter", "@StateHouseNG", "Nigeria"),
    (0, "Fuel queues return to Abuja filling stations", "negative", -0.61, "newspaper", "Punch", "Nigeria"),
    (1, "Senate debates the 2025 appropriation bill", "neutral", 0.04, "television", "Channels TV", "Nigeria"),
    (1, "Farmers welcome fertilizer subsidy rollout in Kano", "positive", 0.55, "facebook", "Kano Farmers Forum", "Nigeria"),
    (2, "Analysts blame inflation on exchange rate policy", "negative", -0.48, "newspaper", "BusinessDay", "Nigeria"),
    (3, "Presidency responds to criticism over foreign trips", "neutral", -0.12, "online", "Premium Times", "Nigeria"),
    (4, "Youth groups protest rising cost of living", "negative", -0.7, "twitter", "@EndBadGovt", "Nigeria"),
    (5, "Student loan scheme disburses first tranche", "positive", 0.64, "television", "Arise News", "Nigeria"),
    (6, "ECOWAS leaders meet in Accra on regional security", "neutral", 0.1, "newspaper", "Daily Graphic", "Ghana"),
    (8, "Power sector reform praised by investors", "positive", 0.46, "online", "TechCabal", "Nigeria"),
    (10, "Insecurity in the north-west draws condemnation", "negative", -0.66, "radio", "Nigeria Info FM", "Nigeria"),
    (12, "Diaspora town hall in London discusses reforms", "neutral", 0.15, "youtube", "Arise News", "United Kingdom"),
];

/// `(kind, name, score, mentions, positive, neutral, negative)`
const MOCK_SOURCES: &[(MediaSourceKind, &str, f64, u64, u64, u64, u64)] = &[
    (MediaSourceKind::Newspapers, "Punch", -0.34, 120, 28, 30, 62),
    (MediaSourceKind::Newspapers, "Vanguard", -0.08, 96, 30, 34, 32),
    (MediaSourceKind::Newspapers, "Daily Trust", 0.02, 88, 27, 35, 26),
    (MediaSourceKind::Newspapers, "The Nation", 0.31, 74, 38, 22, 14),
    (MediaSourceKind::Television, "Channels TV", -0.05, 140, 40, 58, 42),
    (MediaSourceKind::Television, "Arise News", -0.24, 110, 25, 35, 50),
    (MediaSourceKind::Television, "NTA", 0.42, 90, 55, 25, 10),
    (MediaSourceKind::Twitter, "@StateHouseNG", 0.58, 210, 150, 40, 20),
    (MediaSourceKind::Twitter, "@EndBadGovt", -0.66, 185, 15, 25, 145),
    (MediaSourceKind::Twitter, "@PremiumTimesng", -0.1, 160, 45, 60, 55),
    (MediaSourceKind::Facebook, "Kano Farmers Forum", 0.27, 64, 30, 22, 12),
    (MediaSourceKind::Facebook, "Naija Politics Hub", -0.29, 150, 35, 40, 75),
];

/// `(policy, category, impact, sentiment, mentions)`
const MOCK_POLICIES: &[(&str, &str, f64, &str, u64)] = &[
    ("Fuel subsidy removal", "Economy", -0.72, "negative", 480),
    ("Exchange rate unification", "Economy", -0.41, "negative", 260),
    ("Student loan scheme", "Education", 0.53, "positive", 190),
    ("Tax reform bills", "Fiscal", 0.08, "neutral", 150),
    ("Minimum wage review", "Labour", 0.34, "positive", 220),
];

#[must_use]
pub fn mock_mentions(now: DateTime<Utc>) -> Vec<RawMention> {
    MOCK_MENTIONS
        .iter()
        .enumerate()
        .map(
            |(i, &(days_ago, text, label, score, platform, source, country))| RawMention {
                id: Some(json!(format!("mock-{}", i + 1))),
                text: Some(json!(text)),
                date: Some(json!((now - Duration::days(days_ago)).to_rfc3339())),
                sentiment: Some(json!(label)),
                sentiment_score: Some(json!(score)),
                platform: Some(json!(platform)),
                source: Some(json!(source)),
                country: Some(json!(country)),
                ..RawMention::default()
            },
        )
        .collect()
}

#[must_use]
pub fn mock_media_sources(kind: MediaSourceKind) -> Vec<RawMediaSource> {
    MOCK_SOURCES
        .iter()
        .filter(|row| row.0 == kind)
        .map(
            |&(_, name, score, mentions, positive, neutral, negative)| RawMediaSource {
                name: Some(json!(name)),
                sentiment_score: Some(json!(score)),
                mentions: Some(json!(mentions)),
                positive: Some(json!(positive)),
                neutral: Some(json!(neutral)),
                negative: Some(json!(negative)),
                country: Some(Value::from("Nigeria")),
                ..RawMediaSource::default()
            },
        )
        .collect()
}

#[must_use]
pub fn mock_policy_impact() -> Vec<RawPolicyImpact> {
    MOCK_POLICIES
        .iter()
        .map(|&(policy, category, impact, label, mentions)| RawPolicyImpact {
            policy: Some(json!(policy)),
            category: Some(json!(category)),
            impact_score: Some(json!(impact)),
            sentiment: Some(json!(label)),
            mentions: Some(json!(mentions)),
            ..RawPolicyImpact::default()
        })
        .collect()
}
