use chrono::{TimeZone, Utc};
use presmon_analytics::{build_report, FeedResults, MentionFilter, ReportOptions};
use presmon_api::{ApiError, MediaSourceKind};
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["presmon-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_report_with_filters() {
    let cli = Cli::try_parse_from([
        "presmon-cli",
        "report",
        "--from",
        "2025-03-01",
        "--platform",
        "twitter,facebook",
        "-q",
        "fuel",
        "--granularity",
        "week",
        "--json",
    ])
    .expect("expected valid cli args");

    let Some(Commands::Report(args)) = cli.command else {
        panic!("expected report command");
    };
    assert_eq!(args.from.as_deref(), Some("2025-03-01"));
    assert_eq!(args.granularity, "week");
    assert!(args.json);

    let params = args.filter_params();
    assert_eq!(params.platform.as_deref(), Some("twitter,facebook"));
    assert_eq!(params.q.as_deref(), Some("fuel"));
    assert!(MentionFilter::try_from(&params).is_ok());
}

#[test]
fn report_granularity_defaults_to_auto() {
    let cli = Cli::try_parse_from(["presmon-cli", "report"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Report(ref args)) if args.granularity == "auto" && !args.json
    ));
}

#[test]
fn parses_sources_kind() {
    let cli = Cli::try_parse_from(["presmon-cli", "sources", "--kind", "television"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Sources {
            kind: Some(SourceKindArg::Television),
            json: false
        })
    ));
    assert_eq!(
        presmon_api::MediaSourceKind::from(SourceKindArg::Television),
        MediaSourceKind::Television
    );
}

#[test]
fn parses_feedback_command() {
    let cli = Cli::try_parse_from([
        "presmon-cli",
        "feedback",
        "--mention-id",
        "m-7",
        "--sentiment",
        "neutral",
        "--comment",
        "sarcasm",
    ])
    .unwrap();
    let Some(Commands::Feedback {
        mention_id,
        sentiment,
        original,
        comment,
    }) = cli.command
    else {
        panic!("expected feedback command");
    };
    assert_eq!(mention_id, "m-7");
    assert_eq!(sentiment, "neutral");
    assert!(original.is_none());
    assert_eq!(comment.as_deref(), Some("sarcasm"));
}

#[test]
fn feedback_requires_mention_id() {
    assert!(Cli::try_parse_from(["presmon-cli", "feedback", "--sentiment", "positive"]).is_err());
}

#[test]
fn parses_repeated_email_recipients() {
    let cli = Cli::try_parse_from([
        "presmon-cli",
        "email-config",
        "--recipient",
        "a@example.com",
        "--recipient",
        "b@example.com",
        "--frequency",
        "weekly",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::EmailConfig {
            ref recipients,
            frequency: FrequencyArg::Weekly,
            disabled: false
        }) if recipients.len() == 2
    ));
}

#[test]
fn email_config_requires_a_recipient() {
    assert!(Cli::try_parse_from(["presmon-cli", "email-config"]).is_err());
}

#[test]
fn parses_target_and_trigger_run() {
    let cli = Cli::try_parse_from([
        "presmon-cli",
        "target",
        "--name",
        "Jane Doe",
        "--keyword",
        "jane",
        "--keyword",
        "doe",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Target { ref name, ref keywords, country: None })
            if name == "Jane Doe" && keywords.len() == 2
    ));

    let cli = Cli::try_parse_from(["presmon-cli", "trigger-run"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::TriggerRun { target: None })
    ));
}

#[test]
fn parse_label_accepts_abbreviations() {
    assert_eq!(
        actions::parse_label("NEG").unwrap(),
        presmon_core::SentimentLabel::Negative
    );
    assert!(actions::parse_label("angry").is_err());
}

fn fallback_report() -> presmon_analytics::DashboardReport {
    let down = || ApiError::Backend("offline".to_string());
    let feeds = FeedResults {
        mentions: Err(down()),
        media_sources: MediaSourceKind::ALL
            .into_iter()
            .map(|kind| (kind, Err(down())))
            .collect(),
        policy_impact: Err(down()),
    };
    let options = ReportOptions {
        now: Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap(),
        ..ReportOptions::default()
    };
    build_report(feeds, &options, &mut StdRng::seed_from_u64(1))
}

#[test]
fn render_report_flags_sample_data() {
    let text = report::render_report(&fallback_report());
    assert!(text.contains("warning: latest_data unavailable, showing sample data"));
    assert!(text.contains("PLATFORM"));
    assert!(text.contains("TIMELINE (day)"));
    assert!(text.contains("Fuel subsidy removal"));
}

#[test]
fn render_sources_lists_every_row() {
    let built = fallback_report();
    let rows: Vec<_> = built.media_sources.iter().collect();
    let text = report::render_sources(&rows);
    assert_eq!(text.lines().count(), rows.len() + 1);
    assert!(text.contains("Punch"));
}
