use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use slotwatch::alerts::{DesktopAlerter, NoopAlerter};
use slotwatch::config::{Config, LoggingConfig};
use slotwatch::error::Error;
use slotwatch::models::{TargetDate, WatchOutcome};
use slotwatch::portal::PortalClient;
use slotwatch::watcher::Watcher;

#[derive(Parser)]
#[command(
    name = "slotwatch",
    version,
    about = "Watch the appointment portal for a date earlier than the one you hold",
    long_about = None
)]
struct Cli {
    /// Currently booked date (YYYY-MM-DD); any open date at or before it triggers the alert
    target_date: Option<String>,

    /// Load configuration from a TOML file instead of the environment
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Log format (text, json)
    #[arg(long)]
    log_format: Option<String>,

    /// Give up after this many consecutive failed cycles (default: never)
    #[arg(long)]
    max_restarts: Option<u32>,

    /// Log the find without playing a sound or raising a notification
    #[arg(long)]
    no_alert: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    dotenv::dotenv().ok();

    let config = load_config(&cli);
    let logging = config
        .as_ref()
        .map(|c| c.logging.clone())
        .unwrap_or_default();
    setup_tracing(&logging, cli.log_format.as_deref(), cli.verbose);

    let target = match parse_target(cli.target_date.as_deref()) {
        Ok(target) => target,
        Err(e) => {
            error!(error = %e, "Invalid current booked date");
            return ExitCode::FAILURE;
        }
    };

    let mut config = match config {
        Ok(config) => config,
        Err(e) => {
            error!(error = %format!("{e:#}"), "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };
    if cli.max_restarts.is_some() {
        config.polling.max_restarts = cli.max_restarts;
    }
    if cli.no_alert {
        config.alert.enabled = false;
    }

    match watch(&config, target).await {
        Ok(outcome) => {
            info!(date = %outcome.date, "slotwatch finished");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %format!("{e:#}"), "slotwatch stopped");
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };
    config.validate().context("Configuration validation failed")?;
    Ok(config)
}

fn parse_target(raw: Option<&str>) -> std::result::Result<TargetDate, Error> {
    let raw = raw.map(str::trim).unwrap_or_default();
    raw.parse()
        .map_err(|_| Error::InvalidDate(raw.to_string()))
}

async fn watch(config: &Config, target: TargetDate) -> Result<WatchOutcome> {
    let portal = PortalClient::new(&config.portal).context("Failed to create portal client")?;

    let outcome = if config.alert.enabled {
        let alerter = DesktopAlerter::new(&config.alert);
        Watcher::from_config(config, portal, alerter).run(target).await?
    } else {
        Watcher::from_config(config, portal, NoopAlerter).run(target).await?
    };

    Ok(outcome)
}

fn setup_tracing(logging: &LoggingConfig, format_override: Option<&str>, verbose: bool) {
    let level = if verbose { "debug" } else { logging.level.as_str() };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("slotwatch={level},warn")));

    match format_override.unwrap_or(&logging.format) {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}
