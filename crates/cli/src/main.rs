//! crosspost CLI entry point

use anyhow::Result;
use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use time::OffsetDateTime;
use time::format_description;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod args;
mod commands;
mod config;

use args::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = cli.log_level.as_deref().unwrap_or("info");
    init_logging(log_level, &cli.log_dir)?;

    // Execute command
    match cli.command {
        Commands::Publish(args) => commands::publish::execute(args, cli.config).await,
        Commands::State(args) => commands::state::execute(args, cli.config).await,
        Commands::Config(args) => commands::config::execute(args).await,
        Commands::Doctor(args) => commands::doctor::execute(args, cli.config).await,
    }
}

/// Human-readable output on stderr, NDJSON audit records in a per-day file
fn init_logging(level: &str, log_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(log_dir)?;

    let day_format = format_description::parse("[year]-[month]-[day]")?;
    let day = OffsetDateTime::now_utc().format(&day_format)?;
    let audit_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join(format!("publish-{day}.log")))?;

    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(
            fmt::layer()
                .json()
                .flatten_event(true)
                .with_writer(Arc::new(audit_file)),
        )
        .with(filter)
        .init();

    Ok(())
}
