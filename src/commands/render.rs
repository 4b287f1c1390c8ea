//! Render one temp page to stdout

use anyhow::Result;

use crate::resolver::{self, Redirect};
use crate::templates::TemplateRenderer;
use crate::Folio;

/// What a render request produced
#[derive(Debug, PartialEq, Eq)]
pub enum RenderOutput {
    Page(String),
    Redirect(Redirect),
}

/// Resolve `slug` the same way the server does and render the result
pub async fn render(folio: &Folio, slug: Option<&str>) -> Result<RenderOutput> {
    let registry = folio.discover()?;
    match resolver::load(&registry, &folio.config.temp, slug).await? {
        Ok(doc) => {
            let templates = TemplateRenderer::new(&folio.config)?;
            Ok(RenderOutput::Page(templates.render_page(&doc)?))
        }
        Err(redirect) => Ok(RenderOutput::Redirect(redirect)),
    }
}

/// Run the render command
pub async fn run(folio: &Folio, slug: Option<&str>) -> Result<()> {
    match render(folio, slug).await? {
        RenderOutput::Page(html) => println!("{}", html),
        RenderOutput::Redirect(redirect) => {
            eprintln!("Redirect: {}", redirect.target());
        }
    }
    Ok(())
}
