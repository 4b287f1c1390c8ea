//! Rendered document model and the deferred loaders that produce it

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use super::{ComponentMap, FrontMatter, MarkdownRenderer};
use crate::error::LoadError;

/// A loaded temp page, ready to be placed into a layout
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedDocument {
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub date: Option<NaiveDateTime>,
    pub tags: Vec<String>,
    /// Rendered HTML body
    pub html: String,
    /// Custom front-matter fields
    pub extra: HashMap<String, serde_yaml::Value>,
}

/// Everything a loader needs besides its own source
pub struct RenderContext {
    pub markdown: MarkdownRenderer,
    pub components: ComponentMap,
}

impl RenderContext {
    pub fn new(markdown: MarkdownRenderer, components: ComponentMap) -> Self {
        Self {
            markdown,
            components,
        }
    }

    /// Turn raw document text into a rendered document
    pub fn render(&self, slug: &str, source: &str) -> Result<RenderedDocument, LoadError> {
        let (fm, body) = FrontMatter::parse(source).map_err(|source| LoadError::FrontMatter {
            slug: slug.to_string(),
            source,
        })?;

        let html = self.markdown.render(body, &self.components);
        let date = fm.parse_date();

        Ok(RenderedDocument {
            slug: slug.to_string(),
            title: fm.title.unwrap_or_else(|| slug.to_string()),
            description: fm.description,
            date,
            tags: fm.tags,
            html,
            extra: fm.extra,
        })
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new(MarkdownRenderer::new(), ComponentMap::default())
    }
}

/// Deferred, re-invocable accessor for one document's content.
///
/// Every call produces the document afresh; nothing is cached between calls.
#[async_trait]
pub trait DocumentLoader: Send + Sync {
    async fn load(&self, slug: &str) -> Result<RenderedDocument, LoadError>;
}

/// Loads a document from a file on each call
pub struct FileLoader {
    path: PathBuf,
    context: Arc<RenderContext>,
}

impl FileLoader {
    pub fn new(path: PathBuf, context: Arc<RenderContext>) -> Self {
        Self { path, context }
    }
}

#[async_trait]
impl DocumentLoader for FileLoader {
    async fn load(&self, slug: &str) -> Result<RenderedDocument, LoadError> {
        let source = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| LoadError::Io {
                path: self.path.clone(),
                source,
            })?;

        let context = Arc::clone(&self.context);
        let slug_owned = slug.to_string();
        // Highlighting is CPU-bound
        tokio::task::spawn_blocking(move || context.render(&slug_owned, &source))
            .await
            .map_err(|_| LoadError::Panicked(slug.to_string()))?
    }
}

/// Renders in-memory source on each call
pub struct StaticLoader {
    source: String,
    context: Arc<RenderContext>,
}

impl StaticLoader {
    pub fn new(source: impl Into<String>, context: Arc<RenderContext>) -> Self {
        Self {
            source: source.into(),
            context,
        }
    }
}

#[async_trait]
impl DocumentLoader for StaticLoader {
    async fn load(&self, slug: &str) -> Result<RenderedDocument, LoadError> {
        self.context.render(slug, &self.source)
    }
}
