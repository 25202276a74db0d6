//! Normalization of raw backend rows into [`Mention`]s.
//!
//! Every row produces exactly one mention: missing or malformed fields are
//! defaulted (timestamp to `now`, score to a label-consistent fallback,
//! country to a keyword guess) and flagged as inferred.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use presmon_api::RawMention;
use presmon_core::{Mention, SentimentLabel};
use rand::Rng;
use serde_json::Value;

use crate::country::infer_country;
use crate::platform::categorize_platform;
use crate::scorer::lexicon_score;

/// Scores strictly above this are positive, strictly below its negation negative.
pub const SENTIMENT_THRESHOLD: f64 = 0.2;

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d", "%d-%m-%Y"];

/// Inputs shared by every mention normalized in one load.
pub struct NormalizeContext<R> {
    pub now: DateTime<Utc>,
    pub default_country: String,
    pub rng: R,
    generated_ids: usize,
}

impl<R: Rng> NormalizeContext<R> {
    pub fn new(now: DateTime<Utc>, default_country: impl Into<String>, rng: R) -> Self {
        Self {
            now,
            default_country: default_country.into(),
            rng,
            generated_ids: 0,
        }
    }

    fn next_generated_id(&mut self) -> String {
        self.generated_ids += 1;
        format!("generated-{}", self.generated_ids)
    }
}

/// Parses a timestamp from a raw JSON value.
///
/// Returns `(now, true)` when the value is missing or unparseable, so a
/// record is never dropped for a bad date.
#[must_use]
pub fn parse_timestamp(raw: Option<&Value>, now: DateTime<Utc>) -> (DateTime<Utc>, bool) {
    let parsed = match raw {
        Some(Value::Number(n)) => n.as_f64().and_then(from_epoch),
        Some(Value::String(s)) => parse_timestamp_str(s),
        _ => None,
    };
    parsed.map_or((now, true), |ts| (ts, false))
}

fn parse_timestamp_str(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if s.bytes().all(|b| b.is_ascii_digit()) && s.len() >= 9 {
        return s.parse::<f64>().ok().and_then(from_epoch);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(ts) = DateTime::parse_from_rfc2822(s) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Some(naive) = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    {
        return Some(naive.and_utc());
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Interprets large values as milliseconds, the rest as seconds.
fn from_epoch(value: f64) -> Option<DateTime<Utc>> {
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    #[allow(clippy::cast_possible_truncation)]
    let millis = if value >= 1e12 {
        value as i64
    } else {
        (value * 1000.0) as i64
    };
    DateTime::from_timestamp_millis(millis)
}

/// Chooses a mention's sentiment label.
///
/// A valid textual label wins. Otherwise the score is thresholded at
/// ±[`SENTIMENT_THRESHOLD`] (boundary values are neutral). With neither,
/// the mention is neutral.
#[must_use]
pub fn reconcile_label(label: Option<&str>, score: Option<f64>) -> SentimentLabel {
    if let Some(parsed) = label.and_then(SentimentLabel::parse) {
        return parsed;
    }
    match score {
        Some(s) if s > SENTIMENT_THRESHOLD => SentimentLabel::Positive,
        Some(s) if s < -SENTIMENT_THRESHOLD => SentimentLabel::Negative,
        _ => SentimentLabel::Neutral,
    }
}

/// Resolves a mention's numeric score.
///
/// A present score is clamped to `[-1, 1]`. A missing score is drawn at
/// random from the band of the known label, or computed with the lexicon
/// scorer when there is no label either. The flag is `true` for fallbacks.
pub fn resolve_score<R: Rng + ?Sized>(
    score: Option<f64>,
    label: Option<SentimentLabel>,
    text: &str,
    rng: &mut R,
) -> (f64, bool) {
    if let Some(s) = score.filter(|s| s.is_finite()) {
        return (s.clamp(-1.0, 1.0), false);
    }
    let fallback = match label {
        Some(SentimentLabel::Positive) => round2(rng.random_range(0.21..=1.0)),
        Some(SentimentLabel::Negative) => round2(rng.random_range(-1.0..=-0.21)),
        Some(SentimentLabel::Neutral) => round2(rng.random_range(-0.2..=0.2)),
        None => lexicon_score(text),
    };
    (fallback, true)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Normalizes one raw row.
pub fn normalize_mention<R: Rng>(raw: &RawMention, ctx: &mut NormalizeContext<R>) -> Mention {
    let id = raw.id().unwrap_or_else(|| ctx.next_generated_id());
    let text = raw.text().unwrap_or_default();
    let (published_at, date_inferred) = parse_timestamp(raw.timestamp(), ctx.now);

    let raw_label = raw.label();
    let known_label = raw_label.as_deref().and_then(SentimentLabel::parse);
    let (score, score_inferred) = resolve_score(raw.score(), known_label, &text, &mut ctx.rng);
    let sentiment = reconcile_label(raw_label.as_deref(), Some(score));

    let source = raw.source();
    let url = raw.url();
    let platform = categorize_platform(raw.platform().as_deref(), source.as_deref(), url.as_deref());
    let (country, country_inferred) = infer_country(
        raw.country().as_deref(),
        &text,
        source.as_deref(),
        &ctx.default_country,
    );

    Mention {
        id,
        text,
        published_at,
        sentiment,
        score,
        platform,
        source_type: platform.source_type(),
        source: source.unwrap_or_else(|| "Unknown".to_string()),
        country,
        url,
        author: raw.author(),
        date_inferred,
        score_inferred,
        country_inferred,
    }
}

/// Normalizes every row; output order and length match the input.
pub fn normalize_all<R: Rng>(raws: &[RawMention], ctx: &mut NormalizeContext<R>) -> Vec<Mention> {
    let mentions: Vec<Mention> = raws.iter().map(|raw| normalize_mention(raw, ctx)).collect();
    let inferred_dates = mentions.iter().filter(|m| m.date_inferred).count();
    if inferred_dates > 0 {
        tracing::debug!(
            inferred_dates,
            total = mentions.len(),
            "mentions without a parseable date were stamped with the load time"
        );
    }
    mentions
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap()
    }

    fn ctx() -> NormalizeContext<StdRng> {
        NormalizeContext::new(now(), "Nigeria", StdRng::seed_from_u64(7))
    }

    fn raw(value: Value) -> RawMention {
        serde_json::from_value(value).expect("valid raw mention")
    }

    #[test]
    fn parse_timestamp_accepts_common_formats() {
        let cases = [
            json!("2025-03-01T10:00:00Z"),
            json!("2025-03-01T11:00:00+01:00"),
            json!("2025-03-01 10:00:00"),
            json!("2025-03-01T10:00:00"),
            json!("Sat, 01 Mar 2025 10:00:00 +0000"),
            json!(1_740_823_200),
            json!(1_740_823_200_000_i64),
            json!("1740823200"),
        ];
        let expected = Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap();
        for case in cases {
            let (ts, inferred) = parse_timestamp(Some(&case), now());
            assert_eq!(ts, expected, "case {case}");
            assert!(!inferred, "case {case}");
        }
    }

    #[test]
    fn parse_timestamp_date_only_is_midnight_utc() {
        let expected = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        for case in [json!("2025-03-01"), json!("01/03/2025")] {
            assert_eq!(parse_timestamp(Some(&case), now()), (expected, false));
        }
    }

    #[test]
    fn unparseable_date_becomes_now() {
        for case in [json!("yesterday-ish"), json!(""), json!(true), json!(-5)] {
            assert_eq!(parse_timestamp(Some(&case), now()), (now(), true), "case {case}");
        }
        assert_eq!(parse_timestamp(None, now()), (now(), true));
    }

    #[test]
    fn reconcile_label_prefers_valid_label() {
        assert_eq!(
            reconcile_label(Some("Negative"), Some(0.9)),
            SentimentLabel::Negative
        );
    }

    #[test]
    fn reconcile_label_thresholds_score_when_label_invalid() {
        assert_eq!(
            reconcile_label(Some("mixed"), Some(0.5)),
            SentimentLabel::Positive
        );
        assert_eq!(reconcile_label(None, Some(-0.21)), SentimentLabel::Negative);
        assert_eq!(reconcile_label(None, Some(0.1)), SentimentLabel::Neutral);
    }

    #[test]
    fn reconcile_label_boundaries_are_neutral() {
        assert_eq!(reconcile_label(None, Some(0.2)), SentimentLabel::Neutral);
        assert_eq!(reconcile_label(None, Some(-0.2)), SentimentLabel::Neutral);
        assert_eq!(reconcile_label(None, None), SentimentLabel::Neutral);
    }

    #[test]
    fn resolve_score_clamps_present_values() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(resolve_score(Some(3.5), None, "", &mut rng), (1.0, false));
        assert_eq!(resolve_score(Some(-2.0), None, "", &mut rng), (-1.0, false));
    }

    #[test]
    fn resolve_score_fallback_stays_in_label_band() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let (pos, inferred) = resolve_score(None, Some(SentimentLabel::Positive), "", &mut rng);
            assert!(inferred);
            assert!(pos > SENTIMENT_THRESHOLD && pos <= 1.0, "positive {pos}");

            let (neg, _) = resolve_score(None, Some(SentimentLabel::Negative), "", &mut rng);
            assert!((-1.0..-SENTIMENT_THRESHOLD).contains(&neg), "negative {neg}");

            let (neu, _) = resolve_score(None, Some(SentimentLabel::Neutral), "", &mut rng);
            assert!((-SENTIMENT_THRESHOLD..=SENTIMENT_THRESHOLD).contains(&neu), "neutral {neu}");
        }
    }

    #[test]
    fn resolve_score_without_label_uses_lexicon() {
        let mut rng = StdRng::seed_from_u64(3);
        let (score, inferred) = resolve_score(None, None, "corruption scandal", &mut rng);
        assert!(inferred);
        assert!(score < -SENTIMENT_THRESHOLD);
    }

    #[test]
    fn normalize_mention_fills_every_field() {
        let mut ctx = ctx();
        let mention = normalize_mention(
            &raw(json!({
                "id": "m-1",
                "title": "Fuel scarcity",
                "content": "Long queues in Abuja as prices hike",
                "date": "2025-03-08",
                "sentiment": "negative",
                "platform": "newspaper",
                "source": "Daily Trust"
            })),
            &mut ctx,
        );

        assert_eq!(mention.id, "m-1");
        assert_eq!(mention.text, "Fuel scarcity. Long queues in Abuja as prices hike");
        assert_eq!(mention.sentiment, SentimentLabel::Negative);
        assert!(mention.score < -SENTIMENT_THRESHOLD);
        assert!(mention.score_inferred);
        assert_eq!(mention.platform, presmon_core::Platform::Newspaper);
        assert_eq!(mention.source_type, presmon_core::SourceType::Print);
        assert_eq!(mention.country, "Nigeria");
        assert!(mention.country_inferred);
        assert!(!mention.date_inferred);
    }

    #[test]
    fn normalize_mention_label_agrees_with_lexicon_fallback() {
        let mut ctx = ctx();
        let mention = normalize_mention(
            &raw(json!({"text": "Landmark reform praised as a success"})),
            &mut ctx,
        );
        assert_eq!(mention.sentiment, SentimentLabel::Positive);
        assert!(mention.score > SENTIMENT_THRESHOLD);
        assert_eq!(mention.source, "Unknown");
    }

    #[test]
    fn normalize_all_keeps_every_record_and_generates_ids() {
        let mut ctx = ctx();
        let raws = vec![
            raw(json!({"date": "not a date"})),
            raw(json!({})),
            raw(json!({"id": 5, "score": 0.4})),
        ];
        let mentions = normalize_all(&raws, &mut ctx);
        assert_eq!(mentions.len(), 3);
        assert_eq!(mentions[0].id, "generated-1");
        assert_eq!(mentions[1].id, "generated-2");
        assert_eq!(mentions[2].id, "5");
        assert_eq!(mentions[0].published_at, now());
        assert!(mentions[0].date_inferred);
        assert_eq!(mentions[2].sentiment, SentimentLabel::Positive);
    }
}
