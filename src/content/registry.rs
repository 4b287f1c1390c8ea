//! Content registry - the fixed set of temp pages and their deferred loaders

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use super::{DocumentLoader, FileLoader, RenderContext};
use crate::error::RegistryError;

/// One registered temp page
#[derive(Clone)]
pub struct ContentDocument {
    /// Registry key: the document's file path
    pub key: String,
    /// Filename without the content extension
    pub slug: String,
    loader: Arc<dyn DocumentLoader>,
}

impl ContentDocument {
    /// The deferred loader for this document; invoking it is left to the caller
    pub fn loader(&self) -> Arc<dyn DocumentLoader> {
        Arc::clone(&self.loader)
    }
}

impl std::fmt::Debug for ContentDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentDocument")
            .field("key", &self.key)
            .field("slug", &self.slug)
            .finish_non_exhaustive()
    }
}

/// Read-only mapping from file path to deferred loader.
///
/// Built once; never mutated afterwards.
#[derive(Debug, Clone)]
pub struct ContentRegistry {
    suffix: String,
    documents: BTreeMap<String, ContentDocument>,
}

impl ContentRegistry {
    /// An empty registry for files ending in `suffix` (e.g. `.mdx`)
    pub fn empty(suffix: &str) -> Self {
        Self {
            suffix: suffix.to_string(),
            documents: BTreeMap::new(),
        }
    }

    /// Build a registry from an explicit registration list
    pub fn from_entries<I, K>(suffix: &str, entries: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = (K, Arc<dyn DocumentLoader>)>,
        K: Into<String>,
    {
        let mut registry = Self::empty(suffix);
        for (key, loader) in entries {
            let key = key.into();
            let slug = slug_from_key(&key, suffix)
                .map(str::to_string)
                .ok_or_else(|| RegistryError::MissingExtension {
                    key: key.clone(),
                    suffix: suffix.to_string(),
                })?;
            registry
                .documents
                .insert(key.clone(), ContentDocument { key, slug, loader });
        }
        Ok(registry)
    }

    /// Enumerate `<content_dir>/*<suffix>` on disk.
    ///
    /// Only paths are collected here; no file body is read. A missing
    /// directory gives an empty registry.
    pub fn discover(
        base_dir: &Path,
        content_dir: &Path,
        suffix: &str,
        context: Arc<RenderContext>,
    ) -> Result<Self, RegistryError> {
        if !content_dir.is_dir() {
            tracing::debug!("Content directory {:?} does not exist", content_dir);
            return Ok(Self::empty(suffix));
        }

        let pattern = format!(
            "{}/*{}",
            glob::Pattern::escape(&content_dir.to_string_lossy()),
            suffix
        );

        let mut entries: Vec<(String, Arc<dyn DocumentLoader>)> = Vec::new();
        for entry in glob::glob(&pattern)? {
            let path = match entry {
                Ok(path) => path,
                Err(e) => {
                    tracing::warn!("Skipping unreadable content entry: {}", e);
                    continue;
                }
            };
            if !path.is_file() {
                continue;
            }

            let key = path
                .strip_prefix(base_dir)
                .unwrap_or(&path)
                .to_string_lossy()
                .replace('\\', "/");
            let loader: Arc<dyn DocumentLoader> =
                Arc::new(FileLoader::new(path.clone(), Arc::clone(&context)));
            entries.push((key, loader));
        }

        let registry = Self::from_entries(suffix, entries)?;
        tracing::info!(
            "Discovered {} temp page(s) in {:?}",
            registry.len(),
            content_dir
        );
        Ok(registry)
    }

    /// Content file suffix, dot included
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Registered keys in key order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.documents.keys().map(String::as_str)
    }

    /// Registered documents in key order
    pub fn documents(&self) -> impl Iterator<Item = &ContentDocument> {
        self.documents.values()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Derive a slug from a registry key: last path segment minus the suffix.
///
/// Returns `None` when the key does not end in the suffix or the remaining
/// name is empty.
pub fn slug_from_key<'a>(key: &'a str, suffix: &str) -> Option<&'a str> {
    let file_name = key.rsplit(['/', '\\']).next().unwrap_or(key);
    file_name
        .strip_suffix(suffix)
        .filter(|slug| !slug.is_empty())
}
