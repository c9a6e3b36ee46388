//! Publish use case - fans each post out to every configured platform

use std::sync::Arc;

use futures::future::join_all;

use crate::{
    model::{PlatformResult, Post, PostOutcome, RunSummary},
    ports::{ContentError, ContentRepo, PlatformAdapter, StateStore},
};

/// Configuration for a publish run
#[derive(Debug, Clone)]
pub struct PublishRunConfig {
    /// Dry run mode: adapters are still called, mappings are not recorded
    pub dry_run: bool,
    /// Platforms dispatched concurrently within one post's fan-out
    pub concurrency: usize,
}

impl Default for PublishRunConfig {
    fn default() -> Self {
        Self {
            dry_run: false,
            concurrency: 3,
        }
    }
}

/// Errors that abort a whole run
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("Content error: {0}")]
    Content(#[from] ContentError),
}

/// Publish orchestrator
///
/// Posts are processed strictly one at a time. Within a post the platform
/// list is split into fixed-size batches; calls inside a batch run
/// concurrently and a failure never cancels its siblings or the run.
pub struct PublishRun<R, S>
where
    R: ContentRepo + ?Sized,
    S: StateStore + ?Sized,
{
    content: Arc<R>,
    platforms: Vec<Arc<dyn PlatformAdapter>>,
    state: Arc<S>,
    config: PublishRunConfig,
}

impl<R, S> PublishRun<R, S>
where
    R: ContentRepo + ?Sized,
    S: StateStore + ?Sized,
{
    pub fn new(
        content: Arc<R>,
        platforms: Vec<Arc<dyn PlatformAdapter>>,
        state: Arc<S>,
        config: PublishRunConfig,
    ) -> Self {
        Self {
            content,
            platforms,
            state,
            config,
        }
    }

    /// Load all posts and publish each to every configured platform
    pub async fn run(&self) -> Result<RunSummary, RunError> {
        if self.config.dry_run {
            tracing::info!("Running in DRY RUN mode - no state will be recorded");
        }

        let posts = self.content.load().await?;
        tracing::info!(count = posts.len(), "Loaded posts");

        if posts.is_empty() {
            tracing::warn!("No posts found");
            return Ok(RunSummary::default());
        }

        let mut outcomes = Vec::with_capacity(posts.len());
        for post in &posts {
            outcomes.push(self.publish_post(post).await);
        }

        let summary = RunSummary::from_outcomes(&outcomes);
        self.log_summary(&summary);

        Ok(summary)
    }

    /// Fan one post out to all platforms in sequential fixed-size batches
    async fn publish_post(&self, post: &Post) -> PostOutcome {
        tracing::info!(
            file = %post.source_path,
            title = %post.frontmatter.title,
            "Processing post"
        );

        let batch_size = self.config.concurrency.max(1);
        let mut results = Vec::with_capacity(self.platforms.len());

        for batch in self.platforms.chunks(batch_size) {
            let calls = batch
                .iter()
                .map(|adapter| self.publish_to_platform(post, adapter.as_ref()));
            results.extend(join_all(calls).await);
        }

        PostOutcome {
            file: post.source_path.clone(),
            platforms: results,
        }
    }

    /// One (post, platform) attempt; errors become failure results
    async fn publish_to_platform(
        &self,
        post: &Post,
        adapter: &dyn PlatformAdapter,
    ) -> PlatformResult {
        let platform = adapter.name();

        let mapping = match self.state.get_mapping(&post.source_path, platform).await {
            Ok(mapping) => mapping,
            Err(error) => {
                tracing::warn!(
                    platform = platform,
                    file = %post.source_path,
                    error = %error,
                    "Failed to read mapping, treating as unpublished"
                );
                None
            }
        };

        let call = match &mapping {
            Some(entry) => {
                tracing::info!(
                    platform = platform,
                    file = %post.source_path,
                    remote_id = %entry.id,
                    "Updating existing post"
                );
                adapter.update(post, &entry.id).await
            }
            None => {
                tracing::info!(
                    platform = platform,
                    file = %post.source_path,
                    "Publishing new post"
                );
                adapter.publish(post).await
            }
        };

        match call {
            Ok(remote) => {
                if !self.config.dry_run {
                    if let Err(error) = self
                        .state
                        .set_mapping(
                            &post.source_path,
                            platform,
                            &remote.id,
                            remote.url.as_deref(),
                        )
                        .await
                    {
                        tracing::error!(
                            platform = platform,
                            file = %post.source_path,
                            error = %error,
                            "Failed to record mapping"
                        );
                    }
                }
                PlatformResult::ok(platform, &remote)
            }
            Err(error) => {
                tracing::error!(
                    platform = platform,
                    file = %post.source_path,
                    error = %error,
                    "Publish failed"
                );
                PlatformResult::failed(platform, error.to_string())
            }
        }
    }

    fn log_summary(&self, summary: &RunSummary) {
        tracing::info!(total_files = summary.total_files, "Publish summary");
        for (platform, tally) in &summary.platforms {
            tracing::info!(
                platform = %platform,
                success = tally.success,
                failure = tally.failure,
                "Platform results"
            );
        }
        tracing::info!(
            success = summary.total_success(),
            failure = summary.total_failure(),
            "Overall results"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Frontmatter, MappingEntry, RemoteRef, StateStats};
    use crate::ports::{AdapterError, StateError};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use time::OffsetDateTime;

    fn sample_post(path: &str) -> Post {
        Post {
            frontmatter: Frontmatter {
                title: "Hello".to_string(),
                date: "2024-01-15".to_string(),
                description: "A post".to_string(),
                tags: vec!["a".to_string(), "b".to_string()],
                slug: "hello".to_string(),
                author: "tester".to_string(),
            },
            body: "body".to_string(),
            rendered_html: "<p>body</p>".to_string(),
            source_path: path.to_string(),
        }
    }

    struct FakeContentRepo {
        posts: Vec<Post>,
    }

    #[async_trait]
    impl ContentRepo for FakeContentRepo {
        async fn load(&self) -> Result<Vec<Post>, ContentError> {
            Ok(self.posts.clone())
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Publish(String),
        Update(String, String),
    }

    struct FakePlatform {
        name: &'static str,
        fail: bool,
        calls: Mutex<Vec<Call>>,
    }

    impl FakePlatform {
        fn new(name: &'static str, fail: bool) -> Arc<Self> {
            Arc::new(Self {
                name,
                fail,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PlatformAdapter for FakePlatform {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn publish(&self, post: &Post) -> Result<RemoteRef, AdapterError> {
            self.calls
                .lock()
                .unwrap()
                .push(Call::Publish(post.source_path.clone()));
            if self.fail {
                return Err(AdapterError::Http {
                    status: 500,
                    body: "server error".to_string(),
                });
            }
            Ok(RemoteRef {
                id: format!("{}-id", self.name),
                url: Some(format!("https://{}.example/post", self.name)),
            })
        }

        async fn update(&self, post: &Post, remote_id: &str) -> Result<RemoteRef, AdapterError> {
            self.calls
                .lock()
                .unwrap()
                .push(Call::Update(post.source_path.clone(), remote_id.to_string()));
            if self.fail {
                return Err(AdapterError::Http {
                    status: 500,
                    body: "server error".to_string(),
                });
            }
            Ok(RemoteRef {
                id: remote_id.to_string(),
                url: Some(format!("https://{}.example/post", self.name)),
            })
        }
    }

    #[derive(Default)]
    struct FakeStateStore {
        mappings: Mutex<HashMap<(String, String), MappingEntry>>,
    }

    impl FakeStateStore {
        fn with_mapping(file: &str, platform: &str, id: &str) -> Self {
            let store = Self::default();
            store.mappings.lock().unwrap().insert(
                (file.to_string(), platform.to_string()),
                MappingEntry {
                    id: id.to_string(),
                    url: None,
                    published_at: OffsetDateTime::UNIX_EPOCH,
                },
            );
            store
        }

        fn len(&self) -> usize {
            self.mappings.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl StateStore for FakeStateStore {
        async fn get_mapping(
            &self,
            file: &str,
            platform: &str,
        ) -> Result<Option<MappingEntry>, StateError> {
            Ok(self
                .mappings
                .lock()
                .unwrap()
                .get(&(file.to_string(), platform.to_string()))
                .cloned())
        }

        async fn set_mapping(
            &self,
            file: &str,
            platform: &str,
            id: &str,
            url: Option<&str>,
        ) -> Result<(), StateError> {
            self.mappings.lock().unwrap().insert(
                (file.to_string(), platform.to_string()),
                MappingEntry {
                    id: id.to_string(),
                    url: url.map(String::from),
                    published_at: OffsetDateTime::UNIX_EPOCH,
                },
            );
            Ok(())
        }

        async fn remove_mapping(&self, file: &str, platform: &str) -> Result<(), StateError> {
            self.mappings
                .lock()
                .unwrap()
                .remove(&(file.to_string(), platform.to_string()));
            Ok(())
        }

        async fn stats(&self) -> Result<StateStats, StateError> {
            Ok(StateStats::default())
        }
    }

    #[tokio::test]
    async fn unpublished_post_routes_to_publish() {
        let content = Arc::new(FakeContentRepo {
            posts: vec![sample_post("posts/hello.md")],
        });
        let platform = FakePlatform::new("alpha", false);
        let state = Arc::new(FakeStateStore::default());

        let run = PublishRun::new(
            content,
            vec![platform.clone()],
            state.clone(),
            PublishRunConfig::default(),
        );

        let summary = run.run().await.unwrap();

        assert_eq!(
            platform.calls(),
            vec![Call::Publish("posts/hello.md".to_string())]
        );
        assert_eq!(summary.platforms["alpha"].success, 1);
        assert_eq!(state.len(), 1);
    }

    #[tokio::test]
    async fn existing_mapping_routes_to_update_with_stored_id() {
        let content = Arc::new(FakeContentRepo {
            posts: vec![sample_post("posts/hello.md")],
        });
        let platform = FakePlatform::new("alpha", false);
        let state = Arc::new(FakeStateStore::with_mapping(
            "posts/hello.md",
            "alpha",
            "remote-42",
        ));

        let run = PublishRun::new(
            content,
            vec![platform.clone()],
            state,
            PublishRunConfig::default(),
        );

        run.run().await.unwrap();

        assert_eq!(
            platform.calls(),
            vec![Call::Update(
                "posts/hello.md".to_string(),
                "remote-42".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn dry_run_records_no_mappings() {
        let content = Arc::new(FakeContentRepo {
            posts: vec![sample_post("posts/hello.md")],
        });
        let platform = FakePlatform::new("alpha", false);
        let state = Arc::new(FakeStateStore::default());

        let run = PublishRun::new(
            content,
            vec![platform.clone()],
            state.clone(),
            PublishRunConfig {
                dry_run: true,
                ..Default::default()
            },
        );

        let summary = run.run().await.unwrap();

        // the adapter was still called
        assert_eq!(platform.calls().len(), 1);
        assert_eq!(summary.platforms["alpha"].success, 1);
        // but nothing was recorded
        assert_eq!(state.len(), 0);
    }

    #[tokio::test]
    async fn one_failing_platform_does_not_block_siblings_or_later_posts() {
        let content = Arc::new(FakeContentRepo {
            posts: vec![sample_post("posts/one.md"), sample_post("posts/two.md")],
        });
        let a = FakePlatform::new("alpha", false);
        let b = FakePlatform::new("beta", true);
        let c = FakePlatform::new("gamma", false);
        let state = Arc::new(FakeStateStore::default());

        let run = PublishRun::new(
            content,
            vec![a.clone(), b.clone(), c.clone()],
            state.clone(),
            PublishRunConfig::default(),
        );

        let summary = run.run().await.unwrap();

        // 2 posts x 3 platforms = 6 attempts
        assert_eq!(a.calls().len() + b.calls().len() + c.calls().len(), 6);
        assert_eq!(summary.total_success(), 4);
        assert_eq!(summary.total_failure(), 2);
        assert_eq!(summary.platforms["beta"].failure, 2);
        assert_eq!(summary.platforms["alpha"].success, 2);
        assert_eq!(summary.platforms["gamma"].success, 2);
        // failed platform recorded no mappings
        assert_eq!(state.len(), 4);
    }

    #[tokio::test]
    async fn batches_are_bounded_by_configured_concurrency() {
        let content = Arc::new(FakeContentRepo {
            posts: vec![sample_post("posts/hello.md")],
        });
        let platforms: Vec<Arc<dyn PlatformAdapter>> = vec![
            FakePlatform::new("p1", false),
            FakePlatform::new("p2", false),
            FakePlatform::new("p3", false),
            FakePlatform::new("p4", false),
            FakePlatform::new("p5", false),
        ];
        let state = Arc::new(FakeStateStore::default());

        let run = PublishRun::new(
            content,
            platforms,
            state,
            PublishRunConfig {
                dry_run: false,
                concurrency: 2,
            },
        );

        let summary = run.run().await.unwrap();
        assert_eq!(summary.total_success(), 5);
    }

    #[tokio::test]
    async fn empty_content_dir_yields_empty_summary() {
        let content = Arc::new(FakeContentRepo { posts: vec![] });
        let state = Arc::new(FakeStateStore::default());

        let run = PublishRun::new(content, vec![], state, PublishRunConfig::default());

        let summary = run.run().await.unwrap();
        assert_eq!(summary.total_files, 0);
        assert!(summary.platforms.is_empty());
    }
}
