//! Config command - configuration management

use anyhow::{Result, bail};

use crate::args::{ConfigArgs, ConfigCommands};
use crate::config::AppConfig;

pub async fn execute(args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Init { path, force } => {
            if path.exists() && !force {
                bail!(
                    "Config file already exists: {} (use --force to overwrite)",
                    path.display()
                );
            }

            std::fs::write(&path, AppConfig::example_toml())?;
            println!("Wrote example configuration to {}", path.display());
            Ok(())
        }
    }
}
