//! Homework bot CLI
//!
//! Command-line interface for the homework review status notifier.

use std::path::PathBuf;

use clap::Parser;
use homework_bot::config::load_dotenv;
use homework_bot::{load_config, Config, HomeworkBotBuilder};
use tracing::Level;

#[derive(Parser)]
#[command(name = "homework-bot")]
#[command(about = "Telegram notifier for homework review status changes")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seconds between API polls (overrides config file)
    #[arg(long)]
    retry_interval: Option<u64>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: Level,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stdout)
        .with_max_level(args.log_level)
        .init();

    tracing::debug!(
        "Parsed command line arguments: config={:?}, retry_interval={:?}, log_level={:?}",
        args.config,
        args.retry_interval,
        args.log_level
    );

    let mut config = if let Some(config_path) = &args.config {
        tracing::debug!("Loading configuration from {:?}", config_path);
        load_config(config_path)?
    } else {
        tracing::debug!("Using default configuration");
        Config::default()
    };

    let dotenv = load_dotenv()?;
    if !dotenv.is_empty() {
        tracing::debug!("Loaded {} variables from .env", dotenv.len());
    }
    config.apply_env(|name| dotenv.get(name).cloned());
    config.apply_process_env();

    if let Some(retry_interval) = args.retry_interval {
        config.retry_interval_seconds = retry_interval;
    }

    tracing::info!("Starting homework bot");
    tracing::debug!("Configuration: {:?}", config);

    HomeworkBotBuilder::new(config).build()?.start().await?;

    Ok(())
}
