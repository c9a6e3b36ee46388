//! In-memory state store for testing and dry experimentation

use async_trait::async_trait;
use crosspost_domain::{Clock, MappingEntry, StateError, StateStats, StateStore, SystemClock};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

/// In-memory state store implementation
pub struct InMemoryStateStore {
    clock: Arc<dyn Clock>,
    state: RwLock<BTreeMap<String, BTreeMap<String, MappingEntry>>>,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            state: RwLock::new(BTreeMap::new()),
        }
    }
}

impl Default for InMemoryStateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StateStore for InMemoryStateStore {
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
        Ok(())
    }

    async fn remove_mapping(&self, file: &str, platform: &str) -> Result<(), StateError> {
        let mut state = self
            .state
            .write()
            .map_err(|e| StateError::Lock(e.to_string()))?;
        if let Some(platforms) = state.get_mut(file) {
            platforms.remove(platform);
            if platforms.is_empty() {
                state.remove(file);
            }
        }
        Ok(())
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

    #[tokio::test]
    async fn mapping_roundtrip() {
        let store = InMemoryStateStore::new();

        store
            .set_mapping("a.md", "devto", "1", Some("https://dev.to/a"))
            .await
            .unwrap();

        let entry = store.get_mapping("a.md", "devto").await.unwrap().unwrap();
        assert_eq!(entry.id, "1");
        assert_eq!(entry.url.as_deref(), Some("https://dev.to/a"));
    }

    #[tokio::test]
    async fn remove_drops_empty_file_entry() {
        let store = InMemoryStateStore::new();

        store.set_mapping("a.md", "devto", "1", None).await.unwrap();
        store.remove_mapping("a.md", "devto").await.unwrap();

        let stats = store.stats().await.unwrap();
        assert_eq!(stats.total_files, 0);
        assert_eq!(stats.total_mappings, 0);
    }
}
