//! Normalized mention records and the categorical vocabularies used to
//! slice them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Categorical tone of a mention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    pub const ALL: [SentimentLabel; 3] = [
        SentimentLabel::Positive,
        SentimentLabel::Neutral,
        SentimentLabel::Negative,
    ];

    /// Parses a textual label, case-insensitively.
    ///
    /// Accepts the full names and the `pos`/`neu`/`neg` abbreviations some
    /// upstream classifiers emit. Returns `None` for anything else.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "positive" | "pos" => Some(Self::Positive),
            "neutral" | "neu" => Some(Self::Neutral),
            "negative" | "neg" => Some(Self::Negative),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Channel a mention was published on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Twitter,
    Facebook,
    Instagram,
    YouTube,
    TikTok,
    Newspaper,
    Television,
    Radio,
    Online,
    Other,
}

impl Platform {
    /// Coarse grouping used by the per-source-type breakdown.
    #[must_use]
    pub fn source_type(self) -> SourceType {
        match self {
            Self::Twitter | Self::Facebook | Self::Instagram | Self::YouTube | Self::TikTok => {
                SourceType::SocialMedia
            }
            Self::Newspaper => SourceType::Print,
            Self::Television | Self::Radio => SourceType::Broadcast,
            Self::Online => SourceType::Online,
            Self::Other => SourceType::Other,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Twitter => "twitter",
            Self::Facebook => "facebook",
            Self::Instagram => "instagram",
            Self::YouTube => "you_tube",
            Self::TikTok => "tik_tok",
            Self::Newspaper => "newspaper",
            Self::Television => "television",
            Self::Radio => "radio",
            Self::Online => "online",
            Self::Other => "other",
        }
    }

    /// Parses the serialized name back into a platform.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let value = raw.trim().to_ascii_lowercase();
        [
            Self::Twitter,
            Self::Facebook,
            Self::Instagram,
            Self::YouTube,
            Self::TikTok,
            Self::Newspaper,
            Self::Television,
            Self::Radio,
            Self::Online,
            Self::Other,
        ]
        .into_iter()
        .find(|p| p.as_str() == value || p.as_str().replace('_', "") == value)
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    SocialMedia,
    Print,
    Broadcast,
    Online,
    Other,
}

impl SourceType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SocialMedia => "social_media",
            Self::Print => "print",
            Self::Broadcast => "broadcast",
            Self::Online => "online",
            Self::Other => "other",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "social_media" | "social" => Some(Self::SocialMedia),
            "print" => Some(Self::Print),
            "broadcast" => Some(Self::Broadcast),
            "online" => Some(Self::Online),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Three-way stance of a media source, derived from its average score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BiasLevel {
    Supportive,
    Neutral,
    Critical,
}

impl std::fmt::Display for BiasLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Supportive => write!(f, "Supportive"),
            Self::Neutral => write!(f, "Neutral"),
            Self::Critical => write!(f, "Critical"),
        }
    }
}

/// A single piece of analyzed media content with every field resolved.
///
/// The `*_inferred` flags record which values were filled in by
/// normalization rather than supplied by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mention {
    pub id: String,
    pub text: String,
    pub published_at: DateTime<Utc>,
    pub sentiment: SentimentLabel,
    /// Sentiment score in `[-1.0, 1.0]`.
    pub score: f64,
    pub platform: Platform,
    pub source_type: SourceType,
    pub source: String,
    pub country: String,
    pub url: Option<String>,
    pub author: Option<String>,
    pub date_inferred: bool,
    pub score_inferred: bool,
    pub country_inferred: bool,
}
