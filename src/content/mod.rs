//! Content module - temp page discovery, loading and markdown processing

mod components;
mod document;
mod frontmatter;
pub mod index;
mod markdown;
pub mod registry;

pub use components::ComponentMap;
pub use document::{DocumentLoader, FileLoader, RenderContext, RenderedDocument, StaticLoader};
pub use frontmatter::FrontMatter;
pub use index::{list_slugs, ContentIndex, ListingEntry};
pub use markdown::MarkdownRenderer;
pub(crate) use markdown::html_escape;
pub use registry::{slug_from_key, ContentDocument, ContentRegistry};
