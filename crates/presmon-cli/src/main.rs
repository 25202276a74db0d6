mod actions;
mod report;

use clap::{Parser, Subcommand, ValueEnum};
use presmon_analytics::DashboardLoader;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "presmon-cli")]
#[command(about = "Presidential sentiment monitor command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print a dashboard report
    Report(report::ReportArgs),
    /// List media sources with their stance
    Sources {
        /// Restrict to one listing
        #[arg(long, value_enum)]
        kind: Option<SourceKindArg>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Correct the sentiment label of a mention
    Feedback {
        #[arg(long)]
        mention_id: String,

        /// Corrected label: positive, neutral or negative
        #[arg(long)]
        sentiment: String,

        /// Label the mention had before the correction
        #[arg(long)]
        original: Option<String>,

        #[arg(long)]
        comment: Option<String>,
    },
    /// Configure scheduled email reports
    EmailConfig {
        /// Recipient address; repeat for several
        #[arg(long = "recipient", required = true)]
        recipients: Vec<String>,

        #[arg(long, value_enum, default_value_t = FrequencyArg::Daily)]
        frequency: FrequencyArg,

        /// Store the settings with delivery switched off
        #[arg(long)]
        disabled: bool,
    },
    /// Set the individual the collectors monitor
    Target {
        #[arg(long)]
        name: String,

        /// Search keyword; repeat for several
        #[arg(long = "keyword")]
        keywords: Vec<String>,

        #[arg(long)]
        country: Option<String>,
    },
    /// Ask the backend to start a collection run now
    TriggerRun {
        #[arg(long)]
        target: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SourceKindArg {
    Newspapers,
    Television,
    Twitter,
    Facebook,
}

impl From<SourceKindArg> for presmon_api::MediaSourceKind {
    fn from(value: SourceKindArg) -> Self {
        match value {
            SourceKindArg::Newspapers => Self::Newspapers,
            SourceKindArg::Television => Self::Television,
            SourceKindArg::Twitter => Self::Twitter,
            SourceKindArg::Facebook => Self::Facebook,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FrequencyArg {
    Daily,
    Weekly,
    Monthly,
}

impl From<FrequencyArg> for presmon_api::ReportFrequency {
    fn from(value: FrequencyArg) -> Self {
        match value {
            FrequencyArg::Daily => Self::Daily,
            FrequencyArg::Weekly => Self::Weekly,
            FrequencyArg::Monthly => Self::Monthly,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("presmon-cli: run with --help to list commands");
        return Ok(());
    };

    let config = presmon_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let loader = DashboardLoader::from_app_config(&config)?;

    match command {
        Commands::Report(args) => report::run_report(&loader, &args).await,
        Commands::Sources { kind, json } => {
            report::run_sources(&loader, kind.map(Into::into), json).await
        }
        Commands::Feedback {
            mention_id,
            sentiment,
            original,
            comment,
        } => {
            actions::run_feedback(
                loader.client(),
                &mention_id,
                &sentiment,
                original.as_deref(),
                comment,
            )
            .await
        }
        Commands::EmailConfig {
            recipients,
            frequency,
            disabled,
        } => {
            actions::run_email_config(loader.client(), recipients, frequency.into(), !disabled)
                .await
        }
        Commands::Target {
            name,
            keywords,
            country,
        } => actions::run_target(loader.client(), name, keywords, country).await,
        Commands::TriggerRun { target } => actions::run_trigger(loader.client(), target).await,
    }
}

#[cfg(test)]
mod tests;
