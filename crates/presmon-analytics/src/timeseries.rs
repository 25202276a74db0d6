//! Time-bucketed sentiment series with automatic granularity.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, Utc};
use presmon_core::Mention;
use serde::{Deserialize, Serialize};

use crate::error::AnalyticsError;
use crate::metrics::LabelCounts;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    Week,
    Month,
}

impl Granularity {
    /// Parses a granularity name. `auto` and blank input yield `None`,
    /// meaning the caller should pick one from the data span.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::InvalidGranularity`] for unknown names.
    pub fn parse(raw: &str) -> Result<Option<Self>, AnalyticsError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "auto" => Ok(None),
            "day" | "daily" => Ok(Some(Self::Day)),
            "week" | "weekly" => Ok(Some(Self::Week)),
            "month" | "monthly" => Ok(Some(Self::Month)),
            other => Err(AnalyticsError::InvalidGranularity(other.to_string())),
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        }
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Gap filling is skipped when the span between the first and last bucket
/// would exceed this many points; only occupied buckets are returned then.
pub const MAX_FILLED_POINTS: usize = 1_000;

/// Largest number of points a daily or weekly series may have before a
/// coarser granularity is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GranularityThresholds {
    pub daily_max_points: usize,
    pub weekly_max_points: usize,
}

impl Default for GranularityThresholds {
    fn default() -> Self {
        Self {
            daily_max_points: 31,
            weekly_max_points: 26,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub bucket_start: NaiveDate,
    /// `2025-03-01`, `2025-W09` or `2025-03` depending on granularity.
    pub label: String,
    pub total: usize,
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
    pub average_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Timeline {
    pub granularity: Granularity,
    pub points: Vec<SeriesPoint>,
}

/// Picks the finest granularity whose point count fits the thresholds.
#[must_use]
pub fn choose_granularity(
    first: NaiveDate,
    last: NaiveDate,
    thresholds: GranularityThresholds,
) -> Granularity {
    let (first, last) = if first <= last { (first, last) } else { (last, first) };
    let days = (last - first).num_days() + 1;
    if usize::try_from(days).is_ok_and(|d| d <= thresholds.daily_max_points) {
        return Granularity::Day;
    }
    let weeks = (week_start(last) - week_start(first)).num_weeks() + 1;
    if usize::try_from(weeks).is_ok_and(|w| w <= thresholds.weekly_max_points) {
        return Granularity::Week;
    }
    Granularity::Month
}

/// Start of the bucket containing `ts`: the UTC calendar day, the ISO week's
/// Monday, or the first of the month.
#[must_use]
pub fn bucket_start(ts: DateTime<Utc>, granularity: Granularity) -> NaiveDate {
    let day = ts.date_naive();
    match granularity {
        Granularity::Day => day,
        Granularity::Week => week_start(day),
        Granularity::Month => day.with_day(1).unwrap_or(day),
    }
}

fn week_start(day: NaiveDate) -> NaiveDate {
    day - Days::new(u64::from(day.weekday().num_days_from_monday()))
}

fn next_bucket(start: NaiveDate, granularity: Granularity) -> Option<NaiveDate> {
    match granularity {
        Granularity::Day => start.checked_add_days(Days::new(1)),
        Granularity::Week => start.checked_add_days(Days::new(7)),
        Granularity::Month => start.checked_add_months(Months::new(1)),
    }
}

/// Number of buckets from `first` to `last` inclusive, saturating.
fn span_points(first: NaiveDate, last: NaiveDate, granularity: Granularity) -> usize {
    let span = match granularity {
        Granularity::Day => (last - first).num_days(),
        Granularity::Week => (last - first).num_weeks(),
        Granularity::Month => {
            i64::from(last.year() - first.year()) * 12 + i64::from(last.month())
                - i64::from(first.month())
        }
    };
    usize::try_from(span).map_or(usize::MAX, |n| n.saturating_add(1))
}

fn bucket_label(start: NaiveDate, granularity: Granularity) -> String {
    match granularity {
        Granularity::Day => start.format("%Y-%m-%d").to_string(),
        Granularity::Week => {
            let iso = start.iso_week();
            format!("{}-W{:02}", iso.year(), iso.week())
        }
        Granularity::Month => start.format("%Y-%m").to_string(),
    }
}

/// Buckets mentions by `granularity`, ascending, with empty buckets between
/// the first and last filled with zeros. Totals always add up to the input
/// length. Spans longer than [`MAX_FILLED_POINTS`] are left sparse.
#[must_use]
pub fn aggregate(mentions: &[Mention], granularity: Granularity) -> Vec<SeriesPoint> {
    let mut buckets: BTreeMap<NaiveDate, LabelCounts> = BTreeMap::new();
    for mention in mentions {
        buckets
            .entry(bucket_start(mention.published_at, granularity))
            .or_default()
            .add(mention);
    }

    let first = buckets.keys().next().copied();
    let last = buckets.keys().next_back().copied();
    let (Some(first), Some(last)) = (first, last) else {
        return Vec::new();
    };

    let span = span_points(first, last, granularity);
    if span > MAX_FILLED_POINTS {
        tracing::debug!(
            %granularity,
            span,
            occupied = buckets.len(),
            "timeline span too wide to gap-fill, returning occupied buckets only"
        );
    }
    let mut cursor = first;
    while span <= MAX_FILLED_POINTS && cursor < last {
        buckets.entry(cursor).or_default();
        match next_bucket(cursor, granularity) {
            Some(next) => cursor = next,
            None => break,
        }
    }

    buckets
        .into_iter()
        .map(|(start, counts)| SeriesPoint {
            bucket_start: start,
            label: bucket_label(start, granularity),
            total: counts.total(),
            positive: counts.positive,
            neutral: counts.neutral,
            negative: counts.negative,
            average_score: counts.average(),
        })
        .collect()
}

/// Chooses a granularity from the span of `mentions`, then aggregates.
/// Empty input yields an empty daily timeline.
#[must_use]
pub fn aggregate_auto(mentions: &[Mention], thresholds: GranularityThresholds) -> Timeline {
    let granularity = mentions
        .iter()
        .map(|m| m.published_at.date_naive())
        .fold(None, |span: Option<(NaiveDate, NaiveDate)>, day| match span {
            None => Some((day, day)),
            Some((lo, hi)) => Some((lo.min(day), hi.max(day))),
        })
        .map_or(Granularity::Day, |(first, last)| {
            choose_granularity(first, last, thresholds)
        });
    Timeline {
        granularity,
        points: aggregate(mentions, granularity),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use presmon_core::{Platform, SentimentLabel};

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32) -> Mention {
        Mention {
            id: format!("{y}-{m}-{d}"),
            text: String::new(),
            published_at: Utc.with_ymd_and_hms(y, m, d, 15, 30, 0).unwrap(),
            sentiment: SentimentLabel::Positive,
            score: 0.5,
            platform: Platform::Twitter,
            source_type: Platform::Twitter.source_type(),
            source: "x".to_string(),
            country: "Nigeria".to_string(),
            url: None,
            author: None,
            date_inferred: false,
            score_inferred: false,
            country_inferred: false,
        }
    }

    #[test]
    fn parse_accepts_names_and_auto() {
        assert_eq!(Granularity::parse("Week").unwrap(), Some(Granularity::Week));
        assert_eq!(Granularity::parse("monthly").unwrap(), Some(Granularity::Month));
        assert_eq!(Granularity::parse("auto").unwrap(), None);
        assert!(Granularity::parse("hourly").is_err());
    }

    #[test]
    fn short_spans_are_daily() {
        let t = GranularityThresholds::default();
        assert_eq!(choose_granularity(date(2025, 3, 1), date(2025, 3, 31), t), Granularity::Day);
        assert_eq!(choose_granularity(date(2025, 3, 1), date(2025, 3, 1), t), Granularity::Day);
    }

    #[test]
    fn medium_spans_are_weekly() {
        let t = GranularityThresholds::default();
        assert_eq!(choose_granularity(date(2025, 3, 1), date(2025, 4, 1), t), Granularity::Week);
        assert_eq!(choose_granularity(date(2025, 1, 1), date(2025, 6, 1), t), Granularity::Week);
    }

    #[test]
    fn long_spans_are_monthly() {
        let t = GranularityThresholds::default();
        assert_eq!(choose_granularity(date(2024, 1, 1), date(2025, 1, 1), t), Granularity::Month);
    }

    #[test]
    fn thresholds_are_configurable() {
        let t = GranularityThresholds {
            daily_max_points: 7,
            weekly_max_points: 2,
        };
        assert_eq!(choose_granularity(date(2025, 3, 3), date(2025, 3, 9), t), Granularity::Day);
        assert_eq!(choose_granularity(date(2025, 3, 3), date(2025, 3, 16), t), Granularity::Week);
        assert_eq!(choose_granularity(date(2025, 3, 3), date(2025, 3, 17), t), Granularity::Month);
    }

    #[test]
    fn bucket_start_uses_iso_monday_and_month_start() {
        let ts = Utc.with_ymd_and_hms(2025, 3, 9, 23, 59, 0).unwrap(); // a Sunday
        assert_eq!(bucket_start(ts, Granularity::Day), date(2025, 3, 9));
        assert_eq!(bucket_start(ts, Granularity::Week), date(2025, 3, 3));
        assert_eq!(bucket_start(ts, Granularity::Month), date(2025, 3, 1));
    }

    #[test]
    fn week_buckets_cross_year_boundaries() {
        let ts = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let start = bucket_start(ts, Granularity::Week);
        assert_eq!(start, date(2024, 12, 30));
        assert_eq!(bucket_label(start, Granularity::Week), "2025-W01");
    }

    #[test]
    fn gaps_are_filled_with_zero_points() {
        let points = aggregate(&[at(2025, 3, 1), at(2025, 3, 4), at(2025, 3, 4)], Granularity::Day);
        let totals: Vec<usize> = points.iter().map(|p| p.total).collect();
        assert_eq!(totals, [1, 0, 0, 2]);
        assert_eq!(points[1].label, "2025-03-02");
        assert!(points[1].average_score.abs() < f64::EPSILON);
    }

    #[test]
    fn far_apart_dates_are_not_gap_filled() {
        let points = aggregate(&[at(2025, 3, 1), at(9999, 12, 31)], Granularity::Day);
        assert_eq!(points.len(), 2);
        assert_eq!(points.iter().map(|p| p.total).sum::<usize>(), 2);
        assert_eq!(points[1].label, "9999-12-31");
    }

    #[test]
    fn span_at_the_fill_limit_is_still_filled() {
        let last = date(2025, 1, 1) + Days::new(u64::try_from(MAX_FILLED_POINTS - 1).unwrap());
        let end = at(last.year(), last.month(), last.day());
        let points = aggregate(&[at(2025, 1, 1), end], Granularity::Day);
        assert_eq!(points.len(), MAX_FILLED_POINTS);
        assert_eq!(span_points(date(2025, 1, 31), date(2025, 3, 1), Granularity::Month), 3);
    }

    #[test]
    fn aggregation_never_drops_records() {
        let items: Vec<Mention> = (1..=28)
            .step_by(3)
            .flat_map(|d| [at(2025, 2, d), at(2025, 5, d)])
            .collect();
        for granularity in [Granularity::Day, Granularity::Week, Granularity::Month] {
            let points = aggregate(&items, granularity);
            assert_eq!(points.iter().map(|p| p.total).sum::<usize>(), items.len());
            assert!(points.windows(2).all(|w| w[0].bucket_start < w[1].bucket_start));
        }
        let months = aggregate(&items, Granularity::Month);
        let labels: Vec<&str> = months.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, ["2025-02", "2025-03", "2025-04", "2025-05"]);
    }

    #[test]
    fn aggregate_auto_picks_from_span() {
        let timeline = aggregate_auto(
            &[at(2025, 3, 1), at(2025, 3, 20)],
            GranularityThresholds::default(),
        );
        assert_eq!(timeline.granularity, Granularity::Day);
        assert_eq!(timeline.points.len(), 20);

        let empty = aggregate_auto(&[], GranularityThresholds::default());
        assert_eq!(empty.granularity, Granularity::Day);
        assert!(empty.points.is_empty());
    }
}
