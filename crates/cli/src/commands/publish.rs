//! Publish command - load posts and fan out to every configured platform

use anyhow::{Context, Result};
use crosspost_adapters::content::FsContentRepo;
use crosspost_adapters::platforms::{
    HttpPlatform, PlatformCredentials, PlatformProfile, profiles,
};
use crosspost_adapters::state::JsonStateStore;
use crosspost_domain::{
    PlatformAdapter, SystemClock,
    usecases::{PublishRun, PublishRunConfig},
};
use secrecy::SecretString;
use std::path::PathBuf;
use std::sync::Arc;

use crate::args::PublishArgs;
use crate::config::AppConfig;

pub async fn execute(args: PublishArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;

    let dry_run = args.dry_run || config.general.dry_run;
    let concurrency = args.concurrency.unwrap_or(config.general.concurrency);
    let content_dir = args
        .content_dir
        .clone()
        .unwrap_or_else(|| config.general.content_dir.clone());

    let mock_base = args.mock.then(|| {
        std::env::var("MOCK_SERVER_URL").unwrap_or_else(|_| config.mock.base_url.clone())
    });
    if let Some(base) = &mock_base {
        tracing::info!(mock_server = %base, "Running in mock mode");
    }

    tracing::info!(
        dry_run = dry_run,
        concurrency = concurrency,
        content_dir = %content_dir.display(),
        state_path = %config.general.state_path.display(),
        "Starting publish run"
    );

    let content = Arc::new(
        FsContentRepo::new(&content_dir).context("Failed to open content directory")?,
    );
    let state = Arc::new(JsonStateStore::new(
        &config.general.state_path,
        Arc::new(SystemClock),
    ));

    let platforms = build_platforms(&config, mock_base.as_deref());
    if platforms.is_empty() {
        tracing::warn!("No platforms enabled, nothing to do");
    }

    let run = PublishRun::new(
        content,
        platforms,
        state,
        PublishRunConfig {
            dry_run,
            concurrency,
        },
    );

    run.run().await?;

    tracing::info!("Publish run completed");
    Ok(())
}

/// A profile paired with whatever credentials the environment provides
pub(crate) struct ResolvedPlatform {
    pub profile: &'static PlatformProfile,
    pub enabled: bool,
    pub credentials: PlatformCredentials,
    /// Env var names / config keys that did not resolve
    pub missing: Vec<String>,
}

pub(crate) fn resolve_platforms(config: &AppConfig) -> Vec<ResolvedPlatform> {
    profiles::all()
        .into_iter()
        .map(|profile| resolve_platform(profile, config))
        .collect()
}

fn build_platforms(
    config: &AppConfig,
    mock_base: Option<&str>,
) -> Vec<Arc<dyn PlatformAdapter>> {
    resolve_platforms(config)
        .into_iter()
        .filter(|resolved| resolved.enabled)
        .map(|resolved| {
            let adapter = match mock_base {
                Some(base) => HttpPlatform::with_base_url(
                    resolved.profile,
                    resolved.credentials,
                    mock_url(resolved.profile.name, base),
                ),
                None => HttpPlatform::new(resolved.profile, resolved.credentials),
            };
            Arc::new(adapter) as Arc<dyn PlatformAdapter>
        })
        .collect()
}

fn secret_env(var: &str) -> Option<SecretString> {
    std::env::var(var)
        .ok()
        .filter(|value| !value.is_empty())
        .map(|value| SecretString::new(value.into()))
}

fn require_secret(var: &str, missing: &mut Vec<String>) -> Option<SecretString> {
    let secret = secret_env(var);
    if secret.is_none() {
        missing.push(var.to_string());
    }
    secret
}

fn require_field(value: &Option<String>, key: &str, missing: &mut Vec<String>) -> Option<String> {
    if value.is_none() {
        missing.push(key.to_string());
    }
    value.clone()
}

fn resolve_platform(profile: &'static PlatformProfile, config: &AppConfig) -> ResolvedPlatform {
    let platforms = &config.platforms;
    let mut credentials = PlatformCredentials::default();
    let mut missing = Vec::new();

    let enabled = match profile.name {
        "devto" => {
            credentials.token = require_secret(&platforms.devto.api_key_env, &mut missing);
            platforms.devto.enabled
        }
        "hashnode" => {
            credentials.token = require_secret(&platforms.hashnode.token_env, &mut missing);
            platforms.hashnode.enabled
        }
        "medium" => {
            credentials.token =
                require_secret(&platforms.medium.integration_token_env, &mut missing);
            platforms.medium.enabled
        }
        "wordpress" => {
            credentials.token =
                require_secret(&platforms.wordpress.access_token_env, &mut missing);
            credentials.site = require_field(
                &platforms.wordpress.site,
                "platforms.wordpress.site",
                &mut missing,
            );
            platforms.wordpress.enabled
        }
        "ghost" => {
            credentials.token =
                require_secret(&platforms.ghost.admin_api_key_env, &mut missing);
            credentials.site = require_field(
                &platforms.ghost.admin_url,
                "platforms.ghost.admin_url",
                &mut missing,
            );
            platforms.ghost.enabled
        }
        "blogger" => {
            credentials.token =
                require_secret(&platforms.blogger.oauth_token_env, &mut missing);
            credentials.blog_id = require_field(
                &platforms.blogger.blog_id,
                "platforms.blogger.blog_id",
                &mut missing,
            );
            platforms.blogger.enabled
        }
        "tumblr" => {
            credentials.consumer_key =
                require_secret(&platforms.tumblr.consumer_key_env, &mut missing);
            credentials.consumer_secret =
                require_secret(&platforms.tumblr.consumer_secret_env, &mut missing);
            credentials.token = require_secret(&platforms.tumblr.token_env, &mut missing);
            credentials.token_secret =
                require_secret(&platforms.tumblr.token_secret_env, &mut missing);
            credentials.blog_id = require_field(
                &platforms.tumblr.blog_identifier,
                "platforms.tumblr.blog_identifier",
                &mut missing,
            );
            platforms.tumblr.enabled
        }
        "wix" => {
            credentials.token = require_secret(&platforms.wix.api_token_env, &mut missing);
            credentials.site =
                require_field(&platforms.wix.site_id, "platforms.wix.site_id", &mut missing);
            platforms.wix.enabled
        }
        _ => true,
    };

    ResolvedPlatform {
        profile,
        enabled,
        credentials,
        missing,
    }
}

/// Map a platform onto the mock server's route prefixes
fn mock_url(platform: &str, base: &str) -> String {
    let base = base.trim_end_matches('/');
    match platform {
        "devto" => format!("{base}/devto"),
        "hashnode" => format!("{base}/hashnode"),
        "medium" => format!("{base}/medium"),
        "blogger" => format!("{base}/blogger/v3"),
        "tumblr" => format!("{base}/tumblr"),
        "wix" => format!("{base}/wixapis/blog/v3"),
        // wordpress and ghost routes sit at the mock server root
        _ => base.to_string(),
    }
}
