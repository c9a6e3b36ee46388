//! JSON-file publish state store
//!
//! The whole mapping document is loaded once at construction and rewritten
//! in full on every mutation. A second process writing the same file is
//! last-writer-wins; a crash mid-write can leave a partial document, which
//! the next load treats as empty.

use async_trait::async_trait;
use crosspost_domain::{Clock, MappingEntry, StateError, StateStats, StateStore};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

type MappingDocument = BTreeMap<String, BTreeMap<String, MappingEntry>>;

/// File-backed state store keyed by (source file path, platform)
pub struct JsonStateStore {
    path: PathBuf,
    clock: Arc<dyn Clock>,
    state: RwLock<MappingDocument>,
}

impl JsonStateStore {
    /// Open the store, loading any existing document
    ///
    /// A missing file yields an empty store; a malformed one is logged and
    /// also yields an empty store, resetting publish history.
    pub fn new(path: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        let path = path.into();
        let state = Self::load(&path);
        Self {
            path,
            clock,
            state: RwLock::new(state),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(path: &Path) -> MappingDocument {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                return MappingDocument::new();
            }
            Err(error) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %error,
                    "Failed to read state file, starting empty"
                );
                return MappingDocument::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(state) => state,
            Err(error) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %error,
                    "State file is not valid JSON, starting empty"
                );
                MappingDocument::new()
            }
        }
    }

    fn flush(&self, state: &MappingDocument) -> Result<(), StateError> {
        let json = serde_json::to_string_pretty(state)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

#[async_trait]
impl StateStore for JsonStateStore {
    async fn get_mapping(
        &self,
        file: &str,
        platform: &str,
    ) -> Result<Option<MappingEntry>, StateError> {
        let state = self
            .state
            .read()
            .map_err(|e| StateError::Lock(e.to_string()))?;
        Ok(state.get(file).and_then(|p| p.get(platform)).cloned())
    }

    async fn set_mapping(
        &self,
        file: &str,
        platform: &str,
        id: &str,
        url: Option<&str>,
    ) -> Result<(), StateError> {
        let mut state = self
            .state
            .write()
            .map_err(|e| StateError::Lock(e.to_string()))?;

        state.entry(file.to_string()).or_default().insert(
            platform.to_string(),
            MappingEntry {
                id: id.to_string(),
                url: url.map(String::from),
                published_at: self.clock.now(),
            },
        );

        self.flush(&state)
    }

    async fn remove_mapping(&self, file: &str, platform: &str) -> Result<(), StateError> {
        let mut state = self
            .state
            .write()
            .map_err(|e| StateError::Lock(e.to_string()))?;

        let Some(platforms) = state.get_mut(file) else {
            return Ok(());
        };
        if platforms.remove(platform).is_none() {
            return Ok(());
        }
        if platforms.is_empty() {
            state.remove(file);
        }

        self.flush(&state)
    }

    async fn stats(&self) -> Result<StateStats, StateError> {
        let state = self
            .state
            .read()
            .map_err(|e| StateError::Lock(e.to_string()))?;

        let mut stats = StateStats {
            total_files: state.len(),
            ..Default::default()
        };

        for platforms in state.values() {
            for platform in platforms.keys() {
                *stats.platform_stats.entry(platform.clone()).or_default() += 1;
                stats.total_mappings += 1;
            }
        }

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crosspost_domain::SystemClock;
    use tempfile::TempDir;
    use time::OffsetDateTime;

    struct FixedClock;

    impl Clock for FixedClock {
        fn now(&self) -> OffsetDateTime {
            OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap()
        }
    }

    fn store(dir: &TempDir) -> JsonStateStore {
        JsonStateStore::new(dir.path().join(".postmap.json"), Arc::new(FixedClock))
    }

    #[tokio::test]
    async fn set_then_get_roundtrips() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        store
            .set_mapping("posts/a.md", "devto", "123", Some("https://dev.to/a"))
            .await
            .unwrap();

        let entry = store.get_mapping("posts/a.md", "devto").await.unwrap().unwrap();
        assert_eq!(entry.id, "123");
        assert_eq!(entry.url.as_deref(), Some("https://dev.to/a"));
        assert_eq!(entry.published_at.unix_timestamp(), 1_700_000_000);
    }

    #[tokio::test]
    async fn missing_mapping_is_none() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        let entry = store.get_mapping("posts/a.md", "devto").await.unwrap();
        assert!(entry.is_none());
    }

    #[tokio::test]
    async fn mutations_survive_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".postmap.json");

        {
            let store = JsonStateStore::new(&path, Arc::new(FixedClock));
            store
                .set_mapping("posts/a.md", "devto", "123", None)
                .await
                .unwrap();
        }

        let reloaded = JsonStateStore::new(&path, Arc::new(SystemClock));
        let entry = reloaded.get_mapping("posts/a.md", "devto").await.unwrap();
        assert_eq!(entry.unwrap().id, "123");
    }

    #[tokio::test]
    async fn on_disk_format_uses_camel_case_timestamps() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        store
            .set_mapping("posts/a.md", "devto", "123", None)
            .await
            .unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(value["posts/a.md"]["devto"]["publishedAt"].is_string());
        // absent url must be omitted, not null
        assert!(value["posts/a.md"]["devto"].get("url").is_none());
    }

    #[tokio::test]
    async fn removing_last_platform_drops_the_file_key() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        store
            .set_mapping("posts/a.md", "devto", "1", None)
            .await
            .unwrap();
        store
            .set_mapping("posts/a.md", "ghost", "2", None)
            .await
            .unwrap();

        store.remove_mapping("posts/a.md", "devto").await.unwrap();
        assert!(store.get_mapping("posts/a.md", "ghost").await.unwrap().is_some());

        store.remove_mapping("posts/a.md", "ghost").await.unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(value.get("posts/a.md").is_none());
    }

    #[tokio::test]
    async fn remove_of_unknown_mapping_is_a_noop() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        store.remove_mapping("posts/a.md", "devto").await.unwrap();
        // nothing was flushed for a no-op remove
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn corrupt_state_file_degrades_to_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".postmap.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = JsonStateStore::new(&path, Arc::new(FixedClock));
        assert!(store.get_mapping("posts/a.md", "devto").await.unwrap().is_none());

        let stats = store.stats().await.unwrap();
        assert_eq!(stats.total_mappings, 0);
    }

    #[tokio::test]
    async fn stats_counts_files_and_platforms() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        store.set_mapping("a.md", "devto", "1", None).await.unwrap();
        store.set_mapping("a.md", "ghost", "2", None).await.unwrap();
        store.set_mapping("b.md", "devto", "3", None).await.unwrap();

        let stats = store.stats().await.unwrap();
        assert_eq!(stats.total_files, 2);
        assert_eq!(stats.total_mappings, 3);
        assert_eq!(stats.platform_stats["devto"], 2);
        assert_eq!(stats.platform_stats["ghost"], 1);
    }
}
