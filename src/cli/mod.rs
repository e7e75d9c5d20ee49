//! Command line configuration

use std::path::PathBuf;

use clap::{Args, Parser};

use policy_pricing::rules::BuiltInKind;

pub(crate) mod logging;

/// Log output format.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub(crate) struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Policy pricing simulator configuration
#[derive(Debug, Parser)]
#[command(
    name = "policy-pricing",
    about = "Quote line items under a stacked discount policy",
    long_about = None
)]
pub(crate) struct CliConfig {
    /// Policy scenario fixture (YAML)
    #[arg(
        short,
        long,
        env = "POLICY_FIXTURE",
        default_value = "fixtures/policies/default.yml"
    )]
    pub fixture: PathBuf,

    /// Switch a built-in rule on (repeatable)
    #[arg(short, long = "enable", value_enum, value_name = "RULE")]
    pub enable: Vec<BuiltInKind>,

    /// Switch a built-in rule off (repeatable, applied after --enable)
    #[arg(short, long = "disable", value_enum, value_name = "RULE")]
    pub disable: Vec<BuiltInKind>,

    /// Exclude line items by SKU (repeatable)
    #[arg(long = "deactivate", value_name = "SKU")]
    pub deactivate: Vec<String>,

    /// Reject negative, NaN or over-100% rule settings before quoting
    #[arg(long)]
    pub validate: bool,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}

impl CliConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub(crate) fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}
