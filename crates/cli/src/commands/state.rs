//! State command - inspect or edit the publish state file

use anyhow::Result;
use crosspost_adapters::state::JsonStateStore;
use crosspost_domain::{StateStore, SystemClock};
use std::path::PathBuf;
use std::sync::Arc;

use crate::args::{StateArgs, StateCommands};
use crate::config::AppConfig;

pub async fn execute(args: StateArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;
    let store = JsonStateStore::new(&config.general.state_path, Arc::new(SystemClock));

    match args.command {
        StateCommands::Stats { json } => {
            let stats = store.stats().await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("Files with mappings: {}", stats.total_files);
                println!("Total mappings: {}", stats.total_mappings);
                for (platform, count) in &stats.platform_stats {
                    println!("  {platform}: {count}");
                }
            }
        }
        StateCommands::Remove { file, platform } => {
            store.remove_mapping(&file, &platform).await?;
            println!("Removed mapping for {file} on {platform}");
            tracing::info!(file = %file, platform = %platform, "Mapping removed");
        }
    }

    Ok(())
}
