//! Commands that write to the sentiment backend.

use presmon_api::{
    ApiClient, EmailConfig, ReportFrequency, SentimentFeedback, Target, TriggerRunRequest,
    WriteAck,
};
use presmon_core::SentimentLabel;

pub(crate) fn parse_label(raw: &str) -> anyhow::Result<SentimentLabel> {
    SentimentLabel::parse(raw).ok_or_else(|| {
        anyhow::anyhow!("'{raw}' is not a sentiment label (positive, neutral, negative)")
    })
}

fn print_ack(action: &str, ack: &WriteAck) {
    match ack.message.as_deref() {
        Some(message) => println!("{action}: {} ({message})", ack.status),
        None => println!("{action}: {}", ack.status),
    }
}

pub(crate) async fn run_feedback(
    client: &ApiClient,
    mention_id: &str,
    sentiment: &str,
    original: Option<&str>,
    comment: Option<String>,
) -> anyhow::Result<()> {
    let feedback = SentimentFeedback {
        mention_id: mention_id.to_string(),
        corrected_sentiment: parse_label(sentiment)?,
        original_sentiment: original.map(parse_label).transpose()?,
        comment,
    };
    let ack = client.send_feedback(&feedback).await?;
    print_ack("feedback", &ack);
    Ok(())
}

pub(crate) async fn run_email_config(
    client: &ApiClient,
    recipients: Vec<String>,
    frequency: ReportFrequency,
    enabled: bool,
) -> anyhow::Result<()> {
    let ack = client
        .configure_email(&EmailConfig {
            recipients,
            frequency,
            enabled,
        })
        .await?;
    print_ack("email config", &ack);
    Ok(())
}

pub(crate) async fn run_target(
    client: &ApiClient,
    name: String,
    keywords: Vec<String>,
    country: Option<String>,
) -> anyhow::Result<()> {
    if name.trim().is_empty() {
        anyhow::bail!("--name must not be empty");
    }
    let ack = client
        .set_target(&Target {
            name,
            keywords,
            country,
        })
        .await?;
    print_ack("target", &ack);
    Ok(())
}

pub(crate) async fn run_trigger(client: &ApiClient, target: Option<String>) -> anyhow::Result<()> {
    let ack = client.trigger_agent_run(&TriggerRunRequest { target }).await?;
    print_ack("trigger run", &ack);
    Ok(())
}
