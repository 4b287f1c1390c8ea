//! Generator module - exports the temp pages as static HTML files

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::content::{ContentIndex, ContentRegistry};
use crate::resolver::PendingLoad;
use crate::templates::TemplateRenderer;
use crate::Folio;

/// Summary of one export run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GenerateReport {
    pub written: Vec<PathBuf>,
    pub failed: Vec<String>,
}

/// Static exporter using the built-in templates
pub struct Generator<'a> {
    folio: &'a Folio,
    renderer: TemplateRenderer,
}

impl<'a> Generator<'a> {
    /// Create a new generator
    pub fn new(folio: &'a Folio) -> Result<Self> {
        let renderer = TemplateRenderer::new(&folio.config)?;
        Ok(Self { folio, renderer })
    }

    /// Write the index, every temp page and the not-found page.
    ///
    /// A page that fails to load is reported and skipped; the rest of the
    /// export still runs.
    pub async fn generate(&self, registry: &ContentRegistry) -> Result<GenerateReport> {
        let mut report = GenerateReport::default();
        let route = self.folio.config.temp.index_route();
        let temp_dir = self.folio.public_dir.join(route.trim_matches('/'));
        fs::create_dir_all(&temp_dir)?;

        // Index page
        let index = ContentIndex::build(registry, &route);
        let html = self.renderer.render_index(&index)?;
        report.written.push(write_page(&temp_dir.join("index.html"), &html)?);

        // Temp pages
        for doc in registry.documents() {
            if matches!(doc.slug.as_str(), "." | "..") {
                tracing::error!(
                    "Refusing to export {}: slug {:?} is not a directory name",
                    doc.key,
                    doc.slug
                );
                report.failed.push(doc.slug.clone());
                continue;
            }

            match PendingLoad::begin(doc).await {
                Ok(rendered) => {
                    let html = self.renderer.render_page(&rendered)?;
                    // Raw slug on disk; index links carry the encoded form
                    let path = temp_dir.join(&doc.slug).join("index.html");
                    report.written.push(write_page(&path, &html)?);
                }
                Err(e) => {
                    tracing::error!("Failed to export {}: {}", doc.key, e);
                    report.failed.push(doc.slug.clone());
                }
            }
        }

        // Not-found page
        let not_found = self.folio.config.temp.not_found.trim_matches('/');
        let not_found = if not_found.is_empty() { "404" } else { not_found };
        let html = self.renderer.render_not_found()?;
        let path = self.folio.public_dir.join(format!("{}.html", not_found));
        report.written.push(write_page(&path, &html)?);

        Ok(report)
    }
}

fn write_page(path: &Path, html: &str) -> Result<PathBuf> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, html).with_context(|| format!("Failed to write {:?}", path))?;
    tracing::debug!("Generated: {:?}", path);
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_generate_writes_pages() {
        let dir = tempfile::tempdir().unwrap();
        let content = dir.path().join("content/temp");
        fs::create_dir_all(&content).unwrap();
        fs::write(content.join("notes.mdx"), "# Notes").unwrap();
        fs::write(content.join("broken.mdx"), "---\ntitle: [x\n---\n").unwrap();

        let folio = Folio::new(dir.path()).unwrap();
        let registry = folio.discover().unwrap();
        let report = Generator::new(&folio)
            .unwrap()
            .generate(&registry)
            .await
            .unwrap();

        assert_eq!(report.failed, vec!["broken".to_string()]);
        let public = dir.path().join("public");
        let index = fs::read_to_string(public.join("t/index.html")).unwrap();
        assert!(index.contains(r#"href="/t/notes""#));
        assert!(index.contains(r#"href="/t/broken""#));
        let page = fs::read_to_string(public.join("t/notes/index.html")).unwrap();
        assert!(page.contains("<h1>Notes</h1>"));
        assert!(public.join("404.html").exists());
        assert!(!public.join("t/broken/index.html").exists());
    }

    #[tokio::test]
    async fn test_generate_uses_decoded_slug_directories() {
        let dir = tempfile::tempdir().unwrap();
        let content = dir.path().join("content/temp");
        fs::create_dir_all(&content).unwrap();
        fs::write(content.join("two words.mdx"), "# Two").unwrap();

        let folio = Folio::new(dir.path()).unwrap();
        let registry = folio.discover().unwrap();
        Generator::new(&folio)
            .unwrap()
            .generate(&registry)
            .await
            .unwrap();

        let public = dir.path().join("public/t");
        let index = fs::read_to_string(public.join("index.html")).unwrap();
        assert!(index.contains(r#"href="/t/two%20words""#));
        assert!(public.join("two words/index.html").exists());
        assert!(!public.join("two%20words").exists());
    }

    #[tokio::test]
    async fn test_generate_refuses_dot_slugs() {
        use crate::content::{DocumentLoader, RenderContext, StaticLoader};
        use std::sync::Arc;

        let dir = tempfile::tempdir().unwrap();
        let folio = Folio::new(dir.path()).unwrap();
        let context = Arc::new(RenderContext::default());
        let entries: Vec<(&str, Arc<dyn DocumentLoader>)> = vec![
            ("t/..mdx", Arc::new(StaticLoader::new("# Dot", Arc::clone(&context)))),
            ("t/notes.mdx", Arc::new(StaticLoader::new("# Notes", Arc::clone(&context)))),
        ];
        let registry = ContentRegistry::from_entries(".mdx", entries).unwrap();

        let report = Generator::new(&folio)
            .unwrap()
            .generate(&registry)
            .await
            .unwrap();

        assert_eq!(report.failed, vec![".".to_string()]);
        let index = fs::read_to_string(dir.path().join("public/t/index.html")).unwrap();
        assert!(!index.contains("<h1>Dot</h1>"));
        assert!(dir.path().join("public/t/notes/index.html").exists());
    }

    #[tokio::test]
    async fn test_generate_empty_registry() {
        let dir = tempfile::tempdir().unwrap();
        let folio = Folio::new(dir.path()).unwrap();
        let registry = folio.discover().unwrap();
        let report = Generator::new(&folio)
            .unwrap()
            .generate(&registry)
            .await
            .unwrap();

        assert!(report.failed.is_empty());
        let index = fs::read_to_string(dir.path().join("public/t/index.html")).unwrap();
        assert!(index.contains("No temp pages yet."));
    }
}
