//! Mention filtering for dashboard views.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use presmon_core::{Mention, Platform, SentimentLabel, SourceType};
use serde::{Deserialize, Serialize};

use crate::country::canonical_country;
use crate::error::AnalyticsError;

/// Conjunctive filter over mentions. Empty sets match anything; date bounds
/// are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MentionFilter {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub platforms: BTreeSet<Platform>,
    pub source_types: BTreeSet<SourceType>,
    pub countries: BTreeSet<String>,
    pub sentiments: BTreeSet<SentimentLabel>,
    pub query: Option<String>,
}

impl MentionFilter {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    #[must_use]
    pub fn matches(&self, mention: &Mention) -> bool {
        if self.from.is_some_and(|from| mention.published_at < from) {
            return false;
        }
        if self.to.is_some_and(|to| mention.published_at > to) {
            return false;
        }
        if !self.platforms.is_empty() && !self.platforms.contains(&mention.platform) {
            return false;
        }
        if !self.source_types.is_empty() && !self.source_types.contains(&mention.source_type) {
            return false;
        }
        if !self.countries.is_empty()
            && !self
                .countries
                .iter()
                .any(|c| c.eq_ignore_ascii_case(&mention.country))
        {
            return false;
        }
        if !self.sentiments.is_empty() && !self.sentiments.contains(&mention.sentiment) {
            return false;
        }
        if let Some(query) = self.query.as_deref() {
            let needle = query.to_lowercase();
            if !mention.text.to_lowercase().contains(&needle)
                && !mention.source.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        true
    }

    /// Returns the matching mentions in input order.
    #[must_use]
    pub fn apply(&self, mentions: &[Mention]) -> Vec<Mention> {
        mentions
            .iter()
            .filter(|m| self.matches(m))
            .cloned()
            .collect()
    }
}

/// Filter parameters as they arrive from a query string or the command line.
///
/// List-valued fields are comma separated. Dates are `YYYY-MM-DD` or
/// RFC 3339; a bare `to` date covers the whole day.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterParams {
    pub from: Option<String>,
    pub to: Option<String>,
    pub platform: Option<String>,
    pub source_type: Option<String>,
    pub country: Option<String>,
    pub sentiment: Option<String>,
    pub q: Option<String>,
}

impl TryFrom<&FilterParams> for MentionFilter {
    type Error = AnalyticsError;

    fn try_from(params: &FilterParams) -> Result<Self, Self::Error> {
        let from = params
            .from
            .as_deref()
            .map(|s| parse_bound(s, "from", NaiveTime::MIN))
            .transpose()?;
        let to = params
            .to
            .as_deref()
            .map(|s| parse_bound(s, "to", end_of_day()))
            .transpose()?;
        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Err(AnalyticsError::InvalidFilter(format!(
                    "from ({from}) is after to ({to})"
                )));
            }
        }

        Ok(Self {
            from,
            to,
            platforms: parse_list(params.platform.as_deref(), "platform", Platform::parse)?,
            source_types: parse_list(
                params.source_type.as_deref(),
                "source_type",
                SourceType::parse,
            )?,
            countries: parse_list(params.country.as_deref(), "country", canonical_country)?,
            sentiments: parse_list(
                params.sentiment.as_deref(),
                "sentiment",
                SentimentLabel::parse,
            )?,
            query: params
                .q
                .as_deref()
                .map(str::trim)
                .filter(|q| !q.is_empty())
                .map(ToOwned::to_owned),
        })
    }
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN)
}

fn parse_bound(raw: &str, field: &str, day_time: NaiveTime) -> Result<DateTime<Utc>, AnalyticsError> {
    let trimmed = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(|d| d.and_time(day_time).and_utc())
        .map_err(|_| {
            AnalyticsError::InvalidFilter(format!(
                "{field}: expected YYYY-MM-DD or RFC 3339, got {raw:?}"
            ))
        })
}

fn parse_list<T: Ord>(
    raw: Option<&str>,
    field: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<BTreeSet<T>, AnalyticsError> {
    let Some(raw) = raw else {
        return Ok(BTreeSet::new());
    };
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            parse(item).ok_or_else(|| {
                AnalyticsError::InvalidFilter(format!("unknown {field} value: {item:?}"))
            })
        })
        .collect()
}
