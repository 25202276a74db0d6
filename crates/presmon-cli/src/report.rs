//! Read-only dashboard commands.

use std::fmt::Write as _;

use clap::Args;
use presmon_analytics::{
    DashboardLoader, DashboardReport, DataOrigin, FilterParams, Granularity, MediaSourceSummary,
    MentionFilter,
};
use presmon_api::MediaSourceKind;

/// Filters and output options for `report`.
#[derive(Debug, Clone, Default, Args)]
pub(crate) struct ReportArgs {
    /// First day to include (YYYY-MM-DD or RFC 3339)
    #[arg(long)]
    pub from: Option<String>,

    /// Last day to include (YYYY-MM-DD or RFC 3339)
    #[arg(long)]
    pub to: Option<String>,

    /// Comma-separated platforms, e.g. `twitter,facebook`
    #[arg(long)]
    pub platform: Option<String>,

    /// Comma-separated source types, e.g. `print,broadcast`
    #[arg(long)]
    pub source_type: Option<String>,

    #[arg(long)]
    pub country: Option<String>,

    /// Comma-separated labels
    #[arg(long)]
    pub sentiment: Option<String>,

    /// Case-insensitive text search
    #[arg(long = "query", short = 'q')]
    pub query: Option<String>,

    /// day, week, month or auto
    #[arg(long, default_value = "auto")]
    pub granularity: String,

    /// Print the full report as JSON
    #[arg(long)]
    pub json: bool,
}

impl ReportArgs {
    pub(crate) fn filter_params(&self) -> FilterParams {
        FilterParams {
            from: self.from.clone(),
            to: self.to.clone(),
            platform: self.platform.clone(),
            source_type: self.source_type.clone(),
            country: self.country.clone(),
            sentiment: self.sentiment.clone(),
            q: self.query.clone(),
        }
    }
}

/// Loads and prints a dashboard report.
///
/// # Errors
///
/// Returns an error for invalid filter arguments or if JSON encoding fails.
pub(crate) async fn run_report(loader: &DashboardLoader, args: &ReportArgs) -> anyhow::Result<()> {
    let filter = MentionFilter::try_from(&args.filter_params())?;
    let granularity = Granularity::parse(&args.granularity)?;
    let report = loader.load(filter, granularity).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_report(&report));
    }
    Ok(())
}

/// Prints media-source listings, optionally restricted to one kind.
///
/// # Errors
///
/// Returns an error if JSON encoding fails.
pub(crate) async fn run_sources(
    loader: &DashboardLoader,
    kind: Option<MediaSourceKind>,
    json: bool,
) -> anyhow::Result<()> {
    let report = loader.load(MentionFilter::default(), None).await;
    let sources: Vec<&MediaSourceSummary> = report
        .media_sources
        .iter()
        .filter(|s| kind.is_none_or(|k| s.category == k))
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&sources)?);
    } else if sources.is_empty() {
        println!("no media sources available");
    } else {
        print!("{}", render_sources(&sources));
    }
    Ok(())
}

pub(crate) fn render_report(report: &DashboardReport) -> String {
    let mut out = String::new();
    let m = &report.metrics;

    let _ = writeln!(
        out,
        "Sentiment report ({} of {} mentions, generated {})",
        m.total,
        report.total_loaded,
        report.generated_at.format("%Y-%m-%d %H:%M UTC")
    );
    for feed in report.feeds.iter().filter(|f| f.origin != DataOrigin::Live) {
        let _ = writeln!(
            out,
            "  warning: {} unavailable, showing {} data",
            feed.feed,
            match feed.origin {
                DataOrigin::Mock => "sample",
                _ => "no",
            }
        );
    }
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "positive {:>5} ({:>5.1}%)   neutral {:>5} ({:>5.1}%)   negative {:>5} ({:>5.1}%)",
        m.positive, m.positive_pct, m.neutral, m.neutral_pct, m.negative, m.negative_pct
    );
    let _ = writeln!(
        out,
        "average score {:+.3}   net sentiment {:+.1}",
        m.average_score, m.net_sentiment
    );

    let _ = writeln!(out, "\n{:<18}{:>8}{:>8}{:>8}{:>8}", "PLATFORM", "TOTAL", "POS", "NEU", "NEG");
    for row in &report.breakdowns.platform {
        let _ = writeln!(
            out,
            "{:<18}{:>8}{:>8}{:>8}{:>8}",
            row.key, row.total, row.positive, row.neutral, row.negative
        );
    }

    let _ = writeln!(
        out,
        "\nTIMELINE ({})\n{:<12}{:>8}{:>8}{:>8}{:>8}",
        report.timeline.granularity, "BUCKET", "TOTAL", "POS", "NEU", "NEG"
    );
    for point in &report.timeline.points {
        let _ = writeln!(
            out,
            "{:<12}{:>8}{:>8}{:>8}{:>8}",
            point.label, point.total, point.positive, point.neutral, point.negative
        );
    }

    if !report.policy_impact.is_empty() {
        let _ = writeln!(out, "\n{:<32}{:>8}{:>10}  SENTIMENT", "POLICY", "IMPACT", "MENTIONS");
        for policy in &report.policy_impact {
            let _ = writeln!(
                out,
                "{:<32}{:>+8.2}{:>10}  {}",
                policy.policy, policy.impact_score, policy.mentions, policy.sentiment
            );
        }
    }
    out
}

pub(crate) fn render_sources(sources: &[&MediaSourceSummary]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<28}{:<12}{:>10}{:>8}  BIAS",
        "SOURCE", "KIND", "MENTIONS", "SCORE"
    );
    for s in sources {
        let _ = writeln!(
            out,
            "{:<28}{:<12}{:>10}{:>+8.2}  {}",
            s.name,
            s.category.to_string(),
            s.mentions,
            s.average_score,
            s.bias
        );
    }
    out
}
