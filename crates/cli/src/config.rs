//! Configuration loading and management

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub platforms: PlatformsConfig,

    #[serde(default)]
    pub mock: MockConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_content_dir")]
    pub content_dir: PathBuf,

    #[serde(default = "default_state_path")]
    pub state_path: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub dry_run: bool,

    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlatformsConfig {
    #[serde(default)]
    pub devto: DevtoConfig,

    #[serde(default)]
    pub hashnode: HashnodeConfig,

    #[serde(default)]
    pub medium: MediumConfig,

    #[serde(default)]
    pub wordpress: WordPressConfig,

    #[serde(default)]
    pub ghost: GhostConfig,

    #[serde(default)]
    pub blogger: BloggerConfig,

    #[serde(default)]
    pub tumblr: TumblrConfig,

    #[serde(default)]
    pub wix: WixConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DevtoConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_devto_api_key_env")]
    pub api_key_env: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashnodeConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_hashnode_token_env")]
    pub token_env: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediumConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_medium_token_env")]
    pub integration_token_env: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordPressConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_wordpress_token_env")]
    pub access_token_env: String,

    /// Site host, e.g. "myblog.example.com"
    #[serde(default)]
    pub site: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GhostConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_ghost_key_env")]
    pub admin_api_key_env: String,

    /// Admin base URL, e.g. "https://blog.example.com"
    #[serde(default)]
    pub admin_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BloggerConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_blogger_token_env")]
    pub oauth_token_env: String,

    #[serde(default)]
    pub blog_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TumblrConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_tumblr_consumer_key_env")]
    pub consumer_key_env: String,

    #[serde(default = "default_tumblr_consumer_secret_env")]
    pub consumer_secret_env: String,

    #[serde(default = "default_tumblr_token_env")]
    pub token_env: String,

    #[serde(default = "default_tumblr_token_secret_env")]
    pub token_secret_env: String,

    /// Blog identifier, e.g. "example.tumblr.com"
    #[serde(default)]
    pub blog_identifier: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WixConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_wix_token_env")]
    pub api_token_env: String,

    #[serde(default)]
    pub site_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MockConfig {
    /// Base URL the --mock flag points adapters at; MOCK_SERVER_URL wins
    #[serde(default = "default_mock_base_url")]
    pub base_url: String,
}

// Default value functions
fn default_content_dir() -> PathBuf {
    PathBuf::from("./content/posts")
}

fn default_state_path() -> PathBuf {
    PathBuf::from("./.postmap.json")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_concurrency() -> usize {
    3
}

fn default_devto_api_key_env() -> String {
    "DEVTO_API_KEY".to_string()
}

fn default_hashnode_token_env() -> String {
    "HASHNODE_TOKEN".to_string()
}

fn default_medium_token_env() -> String {
    "MEDIUM_INTEGRATION_TOKEN".to_string()
}

fn default_wordpress_token_env() -> String {
    "WP_ACCESS_TOKEN".to_string()
}

fn default_ghost_key_env() -> String {
    "GHOST_ADMIN_API_KEY".to_string()
}

fn default_blogger_token_env() -> String {
    "BLOGGER_OAUTH_TOKEN".to_string()
}

fn default_tumblr_consumer_key_env() -> String {
    "TUMBLR_CONSUMER_KEY".to_string()
}

fn default_tumblr_consumer_secret_env() -> String {
    "TUMBLR_CONSUMER_SECRET".to_string()
}

fn default_tumblr_token_env() -> String {
    "TUMBLR_TOKEN".to_string()
}

fn default_tumblr_token_secret_env() -> String {
    "TUMBLR_TOKEN_SECRET".to_string()
}

fn default_wix_token_env() -> String {
    "WIX_API_TOKEN".to_string()
}

fn default_mock_base_url() -> String {
    "http://localhost:3001".to_string()
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            content_dir: default_content_dir(),
            state_path: default_state_path(),
            log_level: default_log_level(),
            dry_run: false,
            concurrency: default_concurrency(),
        }
    }
}

impl Default for DevtoConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key_env: default_devto_api_key_env(),
        }
    }
}

impl Default for HashnodeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            token_env: default_hashnode_token_env(),
        }
    }
}

impl Default for MediumConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            integration_token_env: default_medium_token_env(),
        }
    }
}

impl Default for WordPressConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            access_token_env: default_wordpress_token_env(),
            site: None,
        }
    }
}

impl Default for GhostConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            admin_api_key_env: default_ghost_key_env(),
            admin_url: None,
        }
    }
}

impl Default for BloggerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            oauth_token_env: default_blogger_token_env(),
            blog_id: None,
        }
    }
}

impl Default for TumblrConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            consumer_key_env: default_tumblr_consumer_key_env(),
            consumer_secret_env: default_tumblr_consumer_secret_env(),
            token_env: default_tumblr_token_env(),
            token_secret_env: default_tumblr_token_secret_env(),
            blog_identifier: None,
        }
    }
}

impl Default for WixConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_token_env: default_wix_token_env(),
            site_id: None,
        }
    }
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            base_url: default_mock_base_url(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        // Try default config path if none specified
        let default_path = PathBuf::from("./config.toml");
        let path = config_path.unwrap_or(&default_path);

        if path.exists() {
            builder = builder.add_source(config::File::from(path));
        } else if config_path.is_some() {
            // User specified a path that doesn't exist
            anyhow::bail!("Config file not found: {}", path.display());
        }

        // Add environment variable overrides
        builder = builder.add_source(
            config::Environment::with_prefix("CROSSPOST")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Generate example configuration as TOML string
    pub fn example_toml() -> String {
        r#"# crosspost configuration

[general]
content_dir = "./content/posts"
state_path = "./.postmap.json"
log_level = "info"
dry_run = false
# Platforms contacted concurrently per post
# (override with CROSSPOST__GENERAL__CONCURRENCY)
concurrency = 3

[platforms.devto]
enabled = true
api_key_env = "DEVTO_API_KEY"

[platforms.hashnode]
enabled = true
token_env = "HASHNODE_TOKEN"

[platforms.medium]
enabled = true
integration_token_env = "MEDIUM_INTEGRATION_TOKEN"

[platforms.wordpress]
enabled = true
access_token_env = "WP_ACCESS_TOKEN"
# site = "myblog.example.com"

[platforms.ghost]
enabled = true
admin_api_key_env = "GHOST_ADMIN_API_KEY"
# admin_url = "https://blog.example.com"

[platforms.blogger]
enabled = true
oauth_token_env = "BLOGGER_OAUTH_TOKEN"
# blog_id = "1234567890"

[platforms.tumblr]
enabled = true
consumer_key_env = "TUMBLR_CONSUMER_KEY"
consumer_secret_env = "TUMBLR_CONSUMER_SECRET"
token_env = "TUMBLR_TOKEN"
token_secret_env = "TUMBLR_TOKEN_SECRET"
# blog_identifier = "example.tumblr.com"

[platforms.wix]
enabled = true
api_token_env = "WIX_API_TOKEN"
# site_id = "00000000-0000-0000-0000-000000000000"

[mock]
# Used by `crosspost publish --mock`; MOCK_SERVER_URL takes precedence
base_url = "http://localhost:3001"
"#
        .to_string()
    }
}
