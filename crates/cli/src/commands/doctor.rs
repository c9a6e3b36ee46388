//! Doctor command - report credential readiness per platform

use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;

use crate::args::DoctorArgs;
use crate::commands::publish::resolve_platforms;
use crate::config::AppConfig;

#[derive(Serialize)]
struct PlatformCheck {
    platform: &'static str,
    enabled: bool,
    ready: bool,
    missing: Vec<String>,
}

pub async fn execute(args: DoctorArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;

    let checks: Vec<PlatformCheck> = resolve_platforms(&config)
        .into_iter()
        .map(|resolved| PlatformCheck {
            platform: resolved.profile.name,
            enabled: resolved.enabled,
            ready: resolved.missing.is_empty(),
            missing: resolved.missing,
        })
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&checks)?);
        return Ok(());
    }

    for check in &checks {
        let status = if !check.enabled {
            "disabled".to_string()
        } else if check.ready {
            "ready".to_string()
        } else {
            format!("missing: {}", check.missing.join(", "))
        };
        println!("{:<10} {status}", check.platform);
    }

    Ok(())
}
