//! Port definitions (traits) for external dependencies
//!
//! These traits define the boundaries between the domain and external systems.
//! Adapters implement these traits to connect to real infrastructure.

use async_trait::async_trait;
use thiserror::Error;
use time::OffsetDateTime;

use crate::model::{MappingEntry, Post, RemoteRef, StateStats};

/// Error type for content loading operations
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid front-matter in {file}: {message}")]
    Frontmatter { file: String, message: String },
    #[error("Content directory not found: {0}")]
    NotFound(String),
}

/// Port for loading posts from a content source
#[async_trait]
pub trait ContentRepo: Send + Sync {
    /// Load all posts, in filesystem enumeration order
    ///
    /// Any unreadable or malformed file fails the whole load.
    async fn load(&self) -> Result<Vec<Post>, ContentError>;
}

/// Error type for platform adapter operations
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("{platform} credentials not configured: {detail}")]
    MissingCredentials {
        platform: &'static str,
        detail: String,
    },
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },
    #[error("Network error: {0}")]
    Transport(String),
    #[error("{platform} does not support updating published posts")]
    UpdateUnsupported { platform: &'static str },
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

/// Port for publishing posts to one remote platform
#[async_trait]
pub trait PlatformAdapter: Send + Sync {
    /// Platform name (e.g. "devto", "wordpress")
    fn name(&self) -> &'static str;

    /// Create a new remote post
    ///
    /// Fails with [`AdapterError::MissingCredentials`] before any network
    /// call when required credentials are absent.
    async fn publish(&self, post: &Post) -> Result<RemoteRef, AdapterError>;

    /// Update an existing remote post
    ///
    /// Platforms without an update API fail with
    /// [`AdapterError::UpdateUnsupported`].
    async fn update(&self, post: &Post, remote_id: &str) -> Result<RemoteRef, AdapterError>;
}

/// Error type for state store operations
#[derive(Debug, Error)]
pub enum StateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Lock poisoned: {0}")]
    Lock(String),
}

/// Port for persisting the (file, platform) -> remote post mapping
///
/// The store exclusively owns the mapping document; callers never touch the
/// backing file directly.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Look up the mapping for a (file, platform) pair
    async fn get_mapping(
        &self,
        file: &str,
        platform: &str,
    ) -> Result<Option<MappingEntry>, StateError>;

    /// Insert or overwrite a mapping, stamping the publish time, and flush
    async fn set_mapping(
        &self,
        file: &str,
        platform: &str,
        id: &str,
        url: Option<&str>,
    ) -> Result<(), StateError>;

    /// Delete a mapping; drops the file's outer key when it empties
    async fn remove_mapping(&self, file: &str, platform: &str) -> Result<(), StateError>;

    /// Read-only aggregate over the stored mappings
    async fn stats(&self) -> Result<StateStats, StateError>;
}

/// Port for time/clock operations (enables deterministic testing)
pub trait Clock: Send + Sync {
    /// Get the current time
    fn now(&self) -> OffsetDateTime;
}

/// Real clock implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}
