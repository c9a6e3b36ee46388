//! Domain models and value objects

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::OffsetDateTime;

/// Front-matter metadata parsed from the top of a markdown post
///
/// Every field is required; a document missing one fails to parse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Frontmatter {
    /// Post title
    pub title: String,
    /// Publication date as written in the source file (ISO-ish string)
    pub date: String,
    /// Short description / excerpt
    pub description: String,
    /// Ordered tag list
    pub tags: Vec<String>,
    /// URL slug
    pub slug: String,
    /// Author name
    pub author: String,
}

/// A post loaded from one markdown file
///
/// Constructed fresh on every run and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Post {
    /// Parsed front-matter
    pub frontmatter: Frontmatter,
    /// Raw markdown body (front-matter stripped)
    pub body: String,
    /// Body rendered to HTML
    pub rendered_html: String,
    /// Originating file path; identity key for mapping purposes
    pub source_path: String,
}

impl Post {
    /// Tags truncated to a platform's accepted maximum, original order
    pub fn capped_tags(&self, limit: Option<usize>) -> &[String] {
        let tags = &self.frontmatter.tags;
        match limit {
            Some(max) if tags.len() > max => &tags[..max],
            _ => tags,
        }
    }
}

/// Remote identity returned by a successful publish/update call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRef {
    /// Platform-specific post ID
    pub id: String,
    /// URL to the published content, if the platform reports one
    pub url: Option<String>,
}

/// Stored association between a local file and a platform's remote post
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingEntry {
    /// Remote post ID
    pub id: String,
    /// Remote post URL, if known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// When the last successful publish/update happened
    #[serde(with = "time::serde::rfc3339")]
    pub published_at: OffsetDateTime,
}

/// Outcome of one (post, platform) attempt within a run; not persisted
#[derive(Debug, Clone)]
pub struct PlatformResult {
    /// Platform name
    pub platform: String,
    /// Whether the call succeeded
    pub success: bool,
    /// Error message on failure
    pub error: Option<String>,
    /// Remote ID on success
    pub remote_id: Option<String>,
    /// Remote URL on success, if reported
    pub url: Option<String>,
}

impl PlatformResult {
    pub fn ok(platform: &str, remote: &RemoteRef) -> Self {
        Self {
            platform: platform.to_string(),
            success: true,
            error: None,
            remote_id: Some(remote.id.clone()),
            url: remote.url.clone(),
        }
    }

    pub fn failed(platform: &str, error: String) -> Self {
        Self {
            platform: platform.to_string(),
            success: false,
            error: Some(error),
            remote_id: None,
            url: None,
        }
    }
}

/// All per-platform results for one post
#[derive(Debug, Clone)]
pub struct PostOutcome {
    /// Source file path
    pub file: String,
    /// One result per attempted platform
    pub platforms: Vec<PlatformResult>,
}

/// Per-platform success/failure tally
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlatformTally {
    pub success: usize,
    pub failure: usize,
}

/// End-of-run aggregate
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Number of posts processed
    pub total_files: usize,
    /// Tally per platform, keyed by platform name
    pub platforms: BTreeMap<String, PlatformTally>,
}

impl RunSummary {
    /// Aggregate outcomes into per-platform tallies
    pub fn from_outcomes(outcomes: &[PostOutcome]) -> Self {
        let mut summary = Self {
            total_files: outcomes.len(),
            platforms: BTreeMap::new(),
        };

        for outcome in outcomes {
            for result in &outcome.platforms {
                let tally = summary.platforms.entry(result.platform.clone()).or_default();
                if result.success {
                    tally.success += 1;
                } else {
                    tally.failure += 1;
                }
            }
        }

        summary
    }

    /// Total successful publications across all platforms
    pub fn total_success(&self) -> usize {
        self.platforms.values().map(|t| t.success).sum()
    }

    /// Total failed publications across all platforms
    pub fn total_failure(&self) -> usize {
        self.platforms.values().map(|t| t.failure).sum()
    }
}

/// Read-only aggregate over the publish state store
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateStats {
    /// Files with at least one mapping
    pub total_files: usize,
    /// Mappings across all files and platforms
    pub total_mappings: usize,
    /// Mapping count per platform
    pub platform_stats: BTreeMap<String, usize>,
}
