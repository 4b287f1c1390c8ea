//! folio-rs: temp pages for a personal portfolio
//!
//! Discovers MDX scratch pages in a content directory, lists them at an
//! index route and renders each one on demand at `<route>/<slug>`.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod generator;
pub mod helpers;
pub mod resolver;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use content::{ComponentMap, ContentRegistry, MarkdownRenderer, RenderContext};

/// The main application
#[derive(Clone)]
pub struct Folio {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Temp page content directory
    pub content_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
    /// Static assets directory
    pub static_dir: PathBuf,
}

impl Folio {
    /// Create a new instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No _config.yml in {:?}, using defaults", base_dir);
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create an instance from an already loaded configuration
    pub fn with_config(base_dir: PathBuf, config: config::SiteConfig) -> Self {
        let content_dir = base_dir.join(&config.temp.dir);
        let public_dir = base_dir.join(&config.public_dir);
        let static_dir = base_dir.join(&config.static_dir);

        Self {
            config,
            base_dir,
            content_dir,
            public_dir,
            static_dir,
        }
    }

    /// Shared rendering setup handed to every loader
    pub fn render_context(&self) -> Arc<RenderContext> {
        Arc::new(RenderContext::new(
            MarkdownRenderer::with_options(self.config.highlight.clone()),
            ComponentMap::new(self.config.components.clone()),
        ))
    }

    /// Enumerate the temp pages on disk
    pub fn discover(&self) -> Result<ContentRegistry> {
        Ok(ContentRegistry::discover(
            &self.base_dir,
            &self.content_dir,
            &self.config.temp.suffix(),
            self.render_context(),
        )?)
    }

    /// Export the temp pages as static files
    pub async fn generate(&self) -> Result<()> {
        commands::generate::run(self).await
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }

    /// Create a new temp page
    pub fn new_page(&self, title: &str, slug: Option<&str>) -> Result<PathBuf> {
        commands::new::create_page(self, title, slug)
    }
}
