//! CLI argument definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// crosspost: publish markdown posts to multiple blogging platforms
#[derive(Parser, Debug)]
#[command(name = "crosspost")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Directory for the per-day NDJSON audit log
    #[arg(long, global = true, default_value = "./logs")]
    pub log_dir: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Publish all posts to every configured platform
    Publish(PublishArgs),

    /// Inspect or edit the publish state
    State(StateArgs),

    /// Configuration management
    Config(ConfigArgs),

    /// Report which platforms have complete credentials
    Doctor(DoctorArgs),
}

#[derive(Args, Debug)]
pub struct PublishArgs {
    /// Perform platform calls but record no state
    #[arg(long)]
    pub dry_run: bool,

    /// Send requests to the mock server instead of the real platforms
    #[arg(long)]
    pub mock: bool,

    /// Override the content directory
    #[arg(long)]
    pub content_dir: Option<PathBuf>,

    /// Override the per-post fan-out width
    #[arg(long)]
    pub concurrency: Option<usize>,
}

#[derive(Args, Debug)]
pub struct StateArgs {
    #[command(subcommand)]
    pub command: StateCommands,
}

#[derive(Subcommand, Debug)]
pub enum StateCommands {
    /// Show mapping counts per file and platform
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Forget the mapping for one (file, platform) pair
    Remove {
        /// Source file path as recorded in the state
        #[arg(long)]
        file: String,

        /// Platform name
        #[arg(long)]
        platform: String,
    },
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Init {
        /// Path to write config file
        #[arg(long, default_value = "./config.toml")]
        path: PathBuf,

        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Debug)]
pub struct DoctorArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
