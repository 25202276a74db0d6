//! Shared domain types and configuration for presmon.

pub mod app_config;
pub mod config;
pub mod mentions;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use mentions::{BiasLevel, Mention, Platform, SentimentLabel, SourceType};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
