//! Aggregate sentiment metrics and categorical breakdowns.

use std::collections::BTreeMap;

use presmon_core::{BiasLevel, Mention, Platform, SentimentLabel};
use serde::Serialize;

use crate::normalize::SENTIMENT_THRESHOLD;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SentimentMetrics {
    pub total: usize,
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
    pub positive_pct: f64,
    pub neutral_pct: f64,
    pub negative_pct: f64,
    pub average_score: f64,
    /// `positive_pct - negative_pct`.
    pub net_sentiment: f64,
}

/// Per-category counts for one breakdown key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBreakdown {
    pub key: String,
    pub total: usize,
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
    pub average_score: f64,
    /// Share of all mentions in this breakdown, one decimal.
    pub share_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceBias {
    pub source: String,
    pub mentions: usize,
    pub average_score: f64,
    pub bias: BiasLevel,
    pub platform: Platform,
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct LabelCounts {
    pub(crate) positive: usize,
    pub(crate) neutral: usize,
    pub(crate) negative: usize,
    score_sum: f64,
}

impl LabelCounts {
    pub(crate) fn add(&mut self, mention: &Mention) {
        match mention.sentiment {
            SentimentLabel::Positive => self.positive += 1,
            SentimentLabel::Neutral => self.neutral += 1,
            SentimentLabel::Negative => self.negative += 1,
        }
        self.score_sum += mention.score;
    }

    pub(crate) fn total(&self) -> usize {
        self.positive + self.neutral + self.negative
    }

    pub(crate) fn average(&self) -> f64 {
        let n = self.total();
        if n == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let mean = self.score_sum / n as f64;
        round_to(mean, 3)
    }
}

/// Computes label counts, percentages and the average score.
///
/// Percentages carry one decimal and always sum to 100 for non-empty input.
#[must_use]
pub fn sentiment_metrics(mentions: &[Mention]) -> SentimentMetrics {
    let mut counts = LabelCounts::default();
    for mention in mentions {
        counts.add(mention);
    }
    let total = counts.total();
    if total == 0 {
        return SentimentMetrics::default();
    }

    let [pos, neu, neg] = percentages_in_tenths([counts.positive, counts.neutral, counts.negative]);
    SentimentMetrics {
        total,
        positive: counts.positive,
        neutral: counts.neutral,
        negative: counts.negative,
        positive_pct: tenths(pos),
        neutral_pct: tenths(neu),
        negative_pct: tenths(neg),
        average_score: counts.average(),
        net_sentiment: tenths(pos) - tenths(neg),
    }
}

/// Largest-remainder apportionment of 1000 tenths of a percent.
///
/// Ties on the remainder go to the earlier slot.
fn percentages_in_tenths<const N: usize>(counts: [usize; N]) -> [u64; N] {
    let total: u64 = counts.iter().map(|&c| c as u64).sum();
    let mut shares = [0_u64; N];
    if total == 0 {
        return shares;
    }
    let mut remainders: Vec<(usize, u64)> = Vec::with_capacity(N);
    for (i, &count) in counts.iter().enumerate() {
        let scaled = count as u64 * 1000;
        shares[i] = scaled / total;
        remainders.push((i, scaled % total));
    }
    let assigned: u64 = shares.iter().sum();
    remainders.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    for (i, _) in remainders.into_iter().take(usize::try_from(1000 - assigned).unwrap_or(0)) {
        shares[i] += 1;
    }
    shares
}

#[allow(clippy::cast_precision_loss)]
fn tenths(value: u64) -> f64 {
    value as f64 / 10.0
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}

/// Classifies an average score: above `0.2` is supportive, below `-0.2`
/// critical, anything else neutral.
#[must_use]
pub fn bias_level(average_score: f64) -> BiasLevel {
    if average_score > SENTIMENT_THRESHOLD {
        BiasLevel::Supportive
    } else if average_score < -SENTIMENT_THRESHOLD {
        BiasLevel::Critical
    } else {
        BiasLevel::Neutral
    }
}

fn breakdown_by<F>(mentions: &[Mention], key_of: F) -> Vec<CategoryBreakdown>
where
    F: Fn(&Mention) -> String,
{
    let mut groups: BTreeMap<String, LabelCounts> = BTreeMap::new();
    for mention in mentions {
        groups.entry(key_of(mention)).or_default().add(mention);
    }

    let all = mentions.len();
    let mut rows: Vec<CategoryBreakdown> = groups
        .into_iter()
        .map(|(key, counts)| {
            #[allow(clippy::cast_precision_loss)]
            let share_pct = round_to(counts.total() as f64 * 100.0 / all as f64, 1);
            CategoryBreakdown {
                key,
                total: counts.total(),
                positive: counts.positive,
                neutral: counts.neutral,
                negative: counts.negative,
                average_score: counts.average(),
                share_pct,
            }
        })
        .collect();
    rows.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.key.cmp(&b.key)));
    rows
}

#[must_use]
pub fn breakdown_by_platform(mentions: &[Mention]) -> Vec<CategoryBreakdown> {
    breakdown_by(mentions, |m| m.platform.as_str().to_string())
}

#[must_use]
pub fn breakdown_by_country(mentions: &[Mention]) -> Vec<CategoryBreakdown> {
    breakdown_by(mentions, |m| m.country.clone())
}

#[must_use]
pub fn breakdown_by_source_type(mentions: &[Mention]) -> Vec<CategoryBreakdown> {
    breakdown_by(mentions, |m| m.source_type.as_str().to_string())
}

#[must_use]
pub fn breakdown_by_source(mentions: &[Mention]) -> Vec<CategoryBreakdown> {
    breakdown_by(mentions, |m| m.source.clone())
}

/// Per-source stance, most-covered sources first.
///
/// A source's platform is the one most of its mentions were published on.
#[must_use]
pub fn media_source_bias(mentions: &[Mention]) -> Vec<SourceBias> {
    let mut groups: BTreeMap<&str, (LabelCounts, BTreeMap<Platform, usize>)> = BTreeMap::new();
    for mention in mentions {
        let (counts, platforms) = groups.entry(mention.source.as_str()).or_default();
        counts.add(mention);
        *platforms.entry(mention.platform).or_default() += 1;
    }

    let mut rows: Vec<SourceBias> = groups
        .into_iter()
        .map(|(source, (counts, platforms))| {
            let platform = platforms
                .into_iter()
                .fold((Platform::Other, 0), |best, (platform, n)| {
                    if n > best.1 {
                        (platform, n)
                    } else {
                        best
                    }
                })
                .0;
            let average_score = counts.average();
            SourceBias {
                source: source.to_string(),
                mentions: counts.total(),
                average_score,
                bias: bias_level(average_score),
                platform,
            }
        })
        .collect();
    rows.sort_by(|a, b| {
        b.mentions
            .cmp(&a.mentions)
            .then_with(|| a.source.cmp(&b.source))
    });
    rows
}

/// The `n` strongest mentions carrying `label`.
///
/// Positive mentions rank by highest score, negative by lowest, neutral by
/// closeness to zero. Newer mentions win ties.
#[must_use]
pub fn top_mentions(mentions: &[Mention], label: SentimentLabel, n: usize) -> Vec<Mention> {
    let strength = |m: &Mention| match label {
        SentimentLabel::Positive => m.score,
        SentimentLabel::Negative => -m.score,
        SentimentLabel::Neutral => -m.score.abs(),
    };
    let mut picked: Vec<&Mention> = mentions.iter().filter(|m| m.sentiment == label).collect();
    picked.sort_by(|a, b| {
        strength(b)
            .total_cmp(&strength(a))
            .then_with(|| b.published_at.cmp(&a.published_at))
    });
    picked.into_iter().take(n).cloned().collect()
}
