//! Layered worker settings: config file, then `SLUICE__*` environment
//! variables, then command-line flags.

use anyhow::Context;
use clap::Args;
use config::{Config, Environment, File};
use serde::Deserialize;
use sluice_core::PollerConfig;
use std::time::Duration;

fn default_shutdown_timeout_seconds() -> u64 {
    30
}

/// Command-line overrides for the `start` subcommand
#[derive(Debug, Default, Args)]
pub struct StartArgs {
    /// Path to config file
    #[arg(long, short, default_value = "config/sluice.toml")]
    pub config: String,

    /// URL of the queue to consume from
    #[arg(long, short)]
    pub queue_url: Option<String>,

    /// Maximum number of messages processed at the same time
    #[arg(long, short = 'n')]
    pub max_concurrency: Option<usize>,

    /// Long-poll wait per receive call, in seconds
    #[arg(long)]
    pub wait_seconds: Option<u64>,

    /// Request message attributes with every receive
    #[arg(long)]
    pub include_attributes: bool,

    /// Never delete messages, even when they were processed
    #[arg(long)]
    pub keep_messages: bool,

    /// Queue service region
    #[arg(long)]
    pub region: Option<String>,

    /// Queue service endpoint override
    #[arg(long)]
    pub endpoint_url: Option<String>,

    /// Credentials profile
    #[arg(long)]
    pub profile: Option<String>,

    /// Seconds to wait for in-flight messages on shutdown
    #[arg(long)]
    pub shutdown_timeout: Option<u64>,
}

/// Worker settings
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub poller: PollerConfig,

    #[serde(default = "default_shutdown_timeout_seconds")]
    pub shutdown_timeout_seconds: u64,
}

impl Settings {
    /// Load settings from the configured file, environment and flags
    pub fn load(args: &StartArgs) -> anyhow::Result<Self> {
        let config = Config::builder()
            .add_source(File::with_name(&args.config).required(false))
            .add_source(
                Environment::with_prefix("SLUICE")
                    .separator("__")
                    .try_parsing(true),
            );

        let settings: Settings = apply_overrides(config, args)?
            .build()
            .context("Failed to read settings")?
            .try_deserialize()
            .context("Invalid settings")?;

        settings.poller.validate()?;
        Ok(settings)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_seconds)
    }
}

fn apply_overrides(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    args: &StartArgs,
) -> anyhow::Result<config::ConfigBuilder<config::builder::DefaultState>> {
    let builder = builder
        .set_override_option("poller.queue_url", args.queue_url.clone())?
        .set_override_option(
            "poller.max_concurrency",
            args.max_concurrency.map(|n| n as i64),
        )?
        .set_override_option("poller.wait_seconds", args.wait_seconds.map(|n| n as i64))?
        .set_override_option(
            "poller.include_attributes",
            args.include_attributes.then_some(true),
        )?
        .set_override_option("poller.auto_delete", args.keep_messages.then_some(false))?
        .set_override_option("poller.client.region", args.region.clone())?
        .set_override_option("poller.client.endpoint_url", args.endpoint_url.clone())?
        .set_override_option("poller.client.profile", args.profile.clone())?
        .set_override_option(
            "shutdown_timeout_seconds",
            args.shutdown_timeout.map(|n| n as i64),
        )?;

    Ok(builder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn args(config: &str) -> StartArgs {
        StartArgs {
            config: config.to_string(),
            ..StartArgs::default()
        }
    }

    #[test]
    fn flags_alone_are_enough() {
        let mut args = args("does/not/exist.toml");
        args.queue_url = Some("https://sqs.local/000/orders".into());
        args.max_concurrency = Some(25);
        args.keep_messages = true;

        let settings = Settings::load(&args).unwrap();

        assert_eq!(settings.poller.queue_url, "https://sqs.local/000/orders");
        assert_eq!(settings.poller.max_concurrency, 25);
        assert_eq!(settings.poller.wait_seconds, 20);
        assert!(!settings.poller.auto_delete);
        assert!(!settings.poller.include_attributes);
        assert_eq!(settings.shutdown_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn flags_override_file() {
        let path = std::env::temp_dir().join(format!("sluice-settings-{}.toml", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
shutdown_timeout_seconds = 5

[poller]
queue_url = "https://sqs.local/000/from-file"
max_concurrency = 4
include_attributes = true

[poller.client]
region = "eu-west-1"
"#
        )
        .unwrap();

        let mut args = args(path.to_str().unwrap());
        args.max_concurrency = Some(12);
        args.endpoint_url = Some("http://localhost:4566".into());

        let settings = Settings::load(&args).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(settings.poller.queue_url, "https://sqs.local/000/from-file");
        assert_eq!(settings.poller.max_concurrency, 12);
        assert!(settings.poller.include_attributes);
        assert_eq!(settings.poller.client.region.as_deref(), Some("eu-west-1"));
        assert_eq!(
            settings.poller.client.endpoint_url.as_deref(),
            Some("http://localhost:4566")
        );
        assert_eq!(settings.shutdown_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn missing_queue_url_is_rejected() {
        assert!(Settings::load(&args("does/not/exist.toml")).is_err());
    }
}
