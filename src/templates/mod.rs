//! Built-in site templates using the Tera template engine
//!
//! Templates are embedded in the binary.

use anyhow::Result;
use serde::Serialize;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::content::{ContentIndex, RenderedDocument};

/// Marker replaced by the resolved document when a page is streamed
const SLOT: &str = "<!--folio:slot-->";

/// Template renderer with the embedded site theme
pub struct TemplateRenderer {
    tera: Tera,
    site: SiteData,
    empty_message: String,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new(config: &SiteConfig) -> Result<Self> {
        let mut tera = Tera::default();

        // Document bodies are already HTML; text fields use the escape filter
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("site/layout.html")),
            ("temp_index.html", include_str!("site/temp_index.html")),
            ("temp_page.html", include_str!("site/temp_page.html")),
            ("not_found.html", include_str!("site/not_found.html")),
            ("error.html", include_str!("site/error.html")),
            // Partials
            (
                "partials/document.html",
                include_str!("site/partials/document.html"),
            ),
            (
                "partials/resolved.html",
                include_str!("site/partials/resolved.html"),
            ),
            (
                "partials/error.html",
                include_str!("site/partials/error.html"),
            ),
        ])?;

        Ok(Self {
            tera,
            site: SiteData::from_config(config),
            empty_message: config.temp.empty_message.clone(),
        })
    }

    /// Render the temp page listing
    pub fn render_index(&self, index: &ContentIndex) -> Result<String> {
        let mut context = self.base_context();
        context.insert("entries", &index.entries);
        context.insert("empty_message", &self.empty_message);
        self.render("temp_index.html", &context)
    }

    /// Render a loaded document as a complete page
    pub fn render_page(&self, doc: &RenderedDocument) -> Result<String> {
        let mut context = self.base_context();
        context.insert("title", &doc.title);
        context.insert("pending", &false);
        context.insert("doc", &DocumentView::from(doc));
        self.render("temp_page.html", &context)
    }

    /// Render the page shell around a fallback placeholder.
    ///
    /// Returns the markup before and after the spot where the document goes.
    pub fn render_shell(&self, slug: &str) -> Result<(String, String)> {
        let mut context = self.base_context();
        context.insert("title", slug);
        context.insert("pending", &true);
        context.insert("slot", SLOT);
        let page = self.render("temp_page.html", &context)?;

        match page.split_once(SLOT) {
            Some((head, tail)) => Ok((head.to_string(), tail.to_string())),
            None => anyhow::bail!("temp_page.html has no document slot"),
        }
    }

    /// Document markup that replaces the fallback in a streamed page
    pub fn render_resolved(&self, doc: &RenderedDocument) -> Result<String> {
        let mut context = self.base_context();
        context.insert("doc", &DocumentView::from(doc));
        self.render("partials/resolved.html", &context)
    }

    /// Inline error block for a load that failed mid-stream
    pub fn render_error_fragment(&self, message: &str) -> Result<String> {
        let mut context = self.base_context();
        context.insert("message", message);
        self.render("partials/error.html", &context)
    }

    /// Full error page
    pub fn render_error(&self, message: &str) -> Result<String> {
        let mut context = self.base_context();
        context.insert("message", message);
        self.render("error.html", &context)
    }

    /// Generic not-found page
    pub fn render_not_found(&self) -> Result<String> {
        self.render("not_found.html", &self.base_context())
    }

    fn base_context(&self) -> Context {
        let mut context = Context::new();
        context.insert("site", &self.site);
        context
    }

    fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Site-wide values every template sees
#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,
    pub home: String,
    pub temp_index: String,
    pub stylesheet: String,
}

impl SiteData {
    fn from_config(config: &SiteConfig) -> Self {
        Self {
            title: config.title.clone(),
            description: config.description.clone(),
            author: config.author.clone(),
            language: config.language.clone(),
            home: "/".to_string(),
            temp_index: config.temp.index_route(),
            stylesheet: "/style.css".to_string(),
        }
    }
}

/// Template view of a rendered document
#[derive(Debug, Clone, Serialize)]
struct DocumentView<'a> {
    slug: &'a str,
    title: &'a str,
    description: Option<&'a str>,
    date: Option<String>,
    tags: &'a [String],
    html: &'a str,
}

impl<'a> From<&'a RenderedDocument> for DocumentView<'a> {
    fn from(doc: &'a RenderedDocument) -> Self {
        Self {
            slug: &doc.slug,
            title: &doc.title,
            description: doc.description.as_deref(),
            date: doc.date.map(|d| d.format("%Y-%m-%d").to_string()),
            tags: &doc.tags,
            html: &doc.html,
        }
    }
}
