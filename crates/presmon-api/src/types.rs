//! Backend request and response types.
//!
//! Listing rows are deliberately loose: the backend aggregates several
//! collectors that disagree on field names and value types, so each known
//! spelling is captured as an optional raw JSON value and resolved by the
//! accessor methods below.

use presmon_core::SentimentLabel;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Top-level `{status, data}` envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope {
    #[serde(default)]
    pub status: Option<Value>,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub message: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
}

impl Envelope {
    /// Returns the backend's error message when the envelope reports failure.
    pub(crate) fn failure_message(&self) -> Option<String> {
        let failed = match &self.status {
            Some(Value::String(s)) => matches!(
                s.trim().to_ascii_lowercase().as_str(),
                "error" | "failed" | "failure" | "fail"
            ),
            Some(Value::Bool(ok)) => !ok,
            _ => false,
        };
        if !failed {
            return None;
        }
        let message = [&self.message, &self.error]
            .into_iter()
            .flatten()
            .find_map(value_as_string)
            .unwrap_or_else(|| "unknown error".to_string());
        Some(message)
    }
}

/// Media-source listing endpoints under `/media-sources/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaSourceKind {
    Newspapers,
    Television,
    Twitter,
    Facebook,
}

impl MediaSourceKind {
    pub const ALL: [MediaSourceKind; 4] = [
        MediaSourceKind::Newspapers,
        MediaSourceKind::Television,
        MediaSourceKind::Twitter,
        MediaSourceKind::Facebook,
    ];

    #[must_use]
    pub fn path_segment(self) -> &'static str {
        match self {
            Self::Newspapers => "newspapers",
            Self::Television => "television",
            Self::Twitter => "twitter",
            Self::Facebook => "facebook",
        }
    }
}

impl std::fmt::Display for MediaSourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path_segment())
    }
}

/// One row of `/latest-data`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawMention {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, rename = "_id", skip_serializing_if = "Option::is_none")]
    pub mongo_id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment_label: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment_score: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_type: Option<Value>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_name: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outlet: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Value>,
}

impl RawMention {
    #[must_use]
    pub fn id(&self) -> Option<String> {
        first_string([&self.id, &self.mongo_id])
    }

    /// Body text. A title and a body are joined with `". "` when both exist.
    #[must_use]
    pub fn text(&self) -> Option<String> {
        let body = first_string([&self.text, &self.content, &self.summary]);
        let title = first_string([&self.title]);
        match (title, body) {
            (Some(t), Some(b)) if b.starts_with(&t) => Some(b),
            (Some(t), Some(b)) => Some(format!("{}. {b}", t.trim_end_matches('.'))),
            (t, b) => b.or(t),
        }
    }

    /// The first timestamp-like field present, in its raw JSON form.
    #[must_use]
    pub fn timestamp(&self) -> Option<&Value> {
        [
            &self.date,
            &self.timestamp,
            &self.published_at,
            &self.created_at,
        ]
        .into_iter()
        .flatten()
        .find(|v| !v.is_null())
    }

    #[must_use]
    pub fn label(&self) -> Option<String> {
        first_string([&self.sentiment, &self.sentiment_label, &self.label])
    }

    /// Numeric score, accepting numbers and numeric strings.
    ///
    /// When `sentiment` holds a number instead of a label it is treated as
    /// the score.
    #[must_use]
    pub fn score(&self) -> Option<f64> {
        [&self.sentiment_score, &self.score, &self.sentiment]
            .into_iter()
            .flatten()
            .find_map(value_as_f64)
            .filter(|s| s.is_finite())
    }

    #[must_use]
    pub fn platform(&self) -> Option<String> {
        first_string([&self.platform, &self.source_type, &self.kind])
    }

    #[must_use]
    pub fn source(&self) -> Option<String> {
        first_string([&self.source, &self.source_name, &self.outlet])
    }

    #[must_use]
    pub fn country(&self) -> Option<String> {
        first_string([&self.country, &self.region])
    }

    #[must_use]
    pub fn url(&self) -> Option<String> {
        first_string([&self.url])
    }

    #[must_use]
    pub fn author(&self) -> Option<String> {
        first_string([&self.author])
    }
}

/// One row of `/media-sources/{kind}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawMediaSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment_score: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_sentiment: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mentions: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub positive: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neutral: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<Value>,
}

impl RawMediaSource {
    #[must_use]
    pub fn name(&self) -> Option<String> {
        first_string([&self.name, &self.source, &self.handle])
    }

    #[must_use]
    pub fn score(&self) -> Option<f64> {
        [&self.sentiment_score, &self.average_sentiment, &self.score]
            .into_iter()
            .flatten()
            .find_map(value_as_f64)
            .filter(|s| s.is_finite())
    }

    /// Mention count as reported, if any.
    #[must_use]
    pub fn mentions(&self) -> Option<u64> {
        [&self.mentions, &self.count]
            .into_iter()
            .flatten()
            .find_map(value_as_count)
    }

    /// `(positive, neutral, negative)` counts; absent counts are zero.
    #[must_use]
    pub fn label_counts(&self) -> (u64, u64, u64) {
        let count = |v: &Option<Value>| v.as_ref().and_then(value_as_count).unwrap_or(0);
        (
            count(&self.positive),
            count(&self.neutral),
            count(&self.negative),
        )
    }

    #[must_use]
    pub fn country(&self) -> Option<String> {
        first_string([&self.country])
    }
}

/// One row of `/policy-impact`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawPolicyImpact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact_score: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment_score: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mentions: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,
}

impl RawPolicyImpact {
    #[must_use]
    pub fn policy(&self) -> Option<String> {
        first_string([&self.policy, &self.title, &self.name])
    }

    #[must_use]
    pub fn impact_score(&self) -> Option<f64> {
        [&self.impact_score, &self.impact]
            .into_iter()
            .flatten()
            .find_map(value_as_f64)
            .filter(|s| s.is_finite())
    }

    /// Sentiment score, or a numeric `sentiment` field.
    #[must_use]
    pub fn sentiment_score(&self) -> Option<f64> {
        [&self.sentiment_score, &self.sentiment]
            .into_iter()
            .flatten()
            .find_map(value_as_f64)
            .filter(|s| s.is_finite())
    }

    /// Textual sentiment label, if `sentiment` holds one.
    #[must_use]
    pub fn label(&self) -> Option<String> {
        self.sentiment
            .as_ref()
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToOwned::to_owned)
    }

    #[must_use]
    pub fn mentions(&self) -> Option<u64> {
        [&self.mentions, &self.count]
            .into_iter()
            .flatten()
            .find_map(value_as_count)
    }

    #[must_use]
    pub fn category(&self) -> Option<String> {
        first_string([&self.category])
    }

    #[must_use]
    pub fn description(&self) -> Option<String> {
        first_string([&self.description])
    }
}

/// Body of `POST /sentiment-feedback`: an analyst's correction of a label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentFeedback {
    pub mention_id: String,
    pub corrected_sentiment: SentimentLabel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_sentiment: Option<SentimentLabel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFrequency {
    Daily,
    Weekly,
    Monthly,
}

/// Body of `POST /email/config`: scheduled report delivery settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailConfig {
    pub recipients: Vec<String>,
    pub frequency: ReportFrequency,
    pub enabled: bool,
}

/// Body of `POST /target`: the individual the collectors monitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub name: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/// Body of `POST /agent/trigger-run`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerRunRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

/// Acknowledgement returned by the write endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriteAck {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

fn first_string<const N: usize>(candidates: [&Option<Value>; N]) -> Option<String> {
    candidates.into_iter().flatten().find_map(value_as_string)
}

/// Non-empty trimmed string for string and number values.
pub(crate) fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub(crate) fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn value_as_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| {
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    let whole = f.round() as u64;
                    whole
                })
        }),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
}
