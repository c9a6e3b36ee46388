//! Filesystem-based content loader

use async_trait::async_trait;
use crosspost_domain::{ContentError, ContentRepo, Frontmatter, Post};
use pulldown_cmark::{Parser, html};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Loads markdown posts from a directory tree
///
/// Files are returned in filesystem enumeration order; callers that need
/// recency order must sort themselves.
pub struct FsContentRepo {
    content_dir: PathBuf,
}

impl FsContentRepo {
    /// Create a loader rooted at the given directory
    pub fn new(content_dir: impl AsRef<Path>) -> Result<Self, ContentError> {
        let content_dir = content_dir.as_ref().to_path_buf();

        if !content_dir.is_dir() {
            return Err(ContentError::NotFound(content_dir.display().to_string()));
        }

        Ok(Self { content_dir })
    }

    fn parse_file(path: &Path) -> Result<Post, ContentError> {
        let raw = std::fs::read_to_string(path)?;
        let file = path.display().to_string();

        let (frontmatter_str, body) =
            split_frontmatter(&raw).ok_or_else(|| ContentError::Frontmatter {
                file: file.clone(),
                message: "missing front-matter block".to_string(),
            })?;

        let frontmatter: Frontmatter =
            serde_yaml::from_str(frontmatter_str).map_err(|error| ContentError::Frontmatter {
                file: file.clone(),
                message: error.to_string(),
            })?;

        let rendered_html = render_html(body);

        Ok(Post {
            frontmatter,
            body: body.to_string(),
            rendered_html,
            source_path: file,
        })
    }
}

/// Split a document into its front-matter block and body
fn split_frontmatter(content: &str) -> Option<(&str, &str)> {
    let rest = content.strip_prefix("---")?;
    let end = rest.find("\n---")?;
    let frontmatter = &rest[..end];
    let body = rest[end + 4..].trim_start_matches(['\r', '\n']);
    Some((frontmatter, body))
}

fn render_html(markdown: &str) -> String {
    let mut out = String::new();
    html::push_html(&mut out, Parser::new(markdown));
    out
}

#[async_trait]
impl ContentRepo for FsContentRepo {
    async fn load(&self) -> Result<Vec<Post>, ContentError> {
        let mut posts = Vec::new();

        for entry in WalkDir::new(&self.content_dir) {
            let entry = entry.map_err(std::io::Error::from)?;
            let path = entry.path();

            if !entry.file_type().is_file() {
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) != Some("md") {
                continue;
            }

            posts.push(Self::parse_file(path)?);
        }

        Ok(posts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const VALID_POST: &str = r#"---
title: Hello World
date: "2024-01-15"
description: First post
tags: [rust, testing]
slug: hello-world
author: Jane
---

# Hello

Some **markdown** body.
"#;

    #[tokio::test]
    async fn load_parses_frontmatter_and_renders_html() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("hello.md"), VALID_POST).unwrap();

        let repo = FsContentRepo::new(dir.path()).unwrap();
        let posts = repo.load().await.unwrap();

        assert_eq!(posts.len(), 1);
        let post = &posts[0];
        assert_eq!(post.frontmatter.title, "Hello World");
        assert_eq!(post.frontmatter.tags, vec!["rust", "testing"]);
        assert!(post.body.contains("Some **markdown** body."));
        assert!(post.rendered_html.contains("<strong>markdown</strong>"));
        assert!(post.source_path.ends_with("hello.md"));
    }

    #[tokio::test]
    async fn load_recurses_into_subdirectories() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("2024").join("01");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join("a.md"), VALID_POST).unwrap();
        std::fs::write(nested.join("b.md"), VALID_POST).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "not markdown").unwrap();

        let repo = FsContentRepo::new(dir.path()).unwrap();
        let posts = repo.load().await.unwrap();

        assert_eq!(posts.len(), 2);
    }

    #[tokio::test]
    async fn missing_required_field_fails_the_load() {
        let dir = TempDir::new().unwrap();
        let no_author = "---\ntitle: T\ndate: \"2024-01-01\"\ndescription: D\ntags: []\nslug: t\n---\nbody\n";
        std::fs::write(dir.path().join("bad.md"), no_author).unwrap();

        let repo = FsContentRepo::new(dir.path()).unwrap();
        let result = repo.load().await;

        match result {
            Err(ContentError::Frontmatter { file, message }) => {
                assert!(file.ends_with("bad.md"));
                assert!(message.contains("author"));
            }
            other => panic!("expected frontmatter error, got {:?}", other.map(|p| p.len())),
        }
    }

    #[tokio::test]
    async fn missing_frontmatter_block_fails_the_load() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("plain.md"), "# Just markdown\n").unwrap();

        let repo = FsContentRepo::new(dir.path()).unwrap();
        let result = repo.load().await;

        assert!(matches!(result, Err(ContentError::Frontmatter { .. })));
    }

    #[test]
    fn nonexistent_directory_is_rejected() {
        let result = FsContentRepo::new("/nonexistent/posts");
        assert!(matches!(result, Err(ContentError::NotFound(_))));
    }
}
