//! Slug resolver - maps a requested slug to its document or a redirect
//!
//! Each navigation walks a small state machine:
//!
//! ```text
//! entry ──(no slug)──> NoSlug ──> redirect to the index
//!   └──(slug)──> SlugProvided ──(one match)──> Resolved ──> Resolving ──> rendered
//!                     └──(no match)──> NotFound ──> redirect to not-found
//! ```
//!
//! Redirects are ordinary outcomes, not errors. Only a failing load is an
//! error, and it is left to the caller's error boundary.

mod pending;

pub use pending::PendingLoad;

use std::fmt;

use crate::config::TempConfig;
use crate::content::{ContentDocument, ContentRegistry, RenderedDocument};
use crate::error::LoadError;

/// States a single navigation passes through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteState {
    NoSlug,
    SlugProvided,
    Resolved,
    Resolving,
    NotFound,
}

impl fmt::Display for RouteState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NoSlug => "no_slug",
            Self::SlugProvided => "slug_provided",
            Self::Resolved => "resolved",
            Self::Resolving => "resolving",
            Self::NotFound => "not_found",
        };
        f.write_str(name)
    }
}

/// Where a short-circuited navigation is sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Redirect {
    /// No slug was given: back to the listing
    Index(String),
    /// The slug matches no document
    NotFound(String),
}

impl Redirect {
    pub fn target(&self) -> &str {
        match self {
            Self::Index(target) | Self::NotFound(target) => target,
        }
    }
}

/// Result of the lookup step
#[derive(Debug, Clone)]
pub enum Resolution<'a> {
    Redirect(Redirect),
    Resolved(&'a ContentDocument),
}

impl Resolution<'_> {
    /// Terminal state the lookup stopped in
    pub fn state(&self) -> RouteState {
        match self {
            Self::Redirect(Redirect::Index(_)) => RouteState::NoSlug,
            Self::Redirect(Redirect::NotFound(_)) => RouteState::NotFound,
            Self::Resolved(_) => RouteState::Resolved,
        }
    }
}

/// Resolves route requests against a registry
#[derive(Debug, Clone)]
pub struct Resolver<'a> {
    registry: &'a ContentRegistry,
    index_route: String,
    not_found_route: String,
}

impl<'a> Resolver<'a> {
    pub fn new(registry: &'a ContentRegistry, temp: &TempConfig) -> Self {
        Self {
            registry,
            index_route: temp.index_route(),
            not_found_route: temp.not_found.clone(),
        }
    }

    /// Look a slug up by exact match on the derived slug.
    ///
    /// A missing or blank slug redirects to the index. Anything other than
    /// exactly one match redirects to the not-found route.
    pub fn resolve(&self, slug: Option<&str>) -> Resolution<'a> {
        let slug = match slug {
            Some(slug) if !slug.trim().is_empty() => slug,
            _ => {
                tracing::debug!(state = %RouteState::NoSlug, "Redirecting to {}", self.index_route);
                return Resolution::Redirect(Redirect::Index(self.index_route.clone()));
            }
        };
        tracing::debug!(state = %RouteState::SlugProvided, slug, "Resolving temp page");

        let mut matches = self.registry.documents().filter(|doc| doc.slug == slug);
        match (matches.next(), matches.next()) {
            (Some(doc), None) => {
                tracing::debug!(state = %RouteState::Resolved, slug, key = %doc.key, "Matched temp page");
                Resolution::Resolved(doc)
            }
            (first, _) => {
                if first.is_some() {
                    tracing::warn!(slug, "Slug matches more than one document");
                }
                tracing::debug!(state = %RouteState::NotFound, slug, "No temp page for slug");
                Resolution::Redirect(Redirect::NotFound(self.not_found_route.clone()))
            }
        }
    }
}

/// Outcome of a navigation once the load has been started
pub enum Navigation {
    Redirect(Redirect),
    Pending(PendingLoad),
}

/// Resolve a slug and, when it matches, start loading the document
pub fn navigate(
    registry: &ContentRegistry,
    temp: &TempConfig,
    slug: Option<&str>,
) -> Navigation {
    match Resolver::new(registry, temp).resolve(slug) {
        Resolution::Redirect(redirect) => Navigation::Redirect(redirect),
        Resolution::Resolved(doc) => {
            tracing::debug!(state = %RouteState::Resolving, slug = %doc.slug, "Loading temp page");
            Navigation::Pending(PendingLoad::begin(doc))
        }
    }
}

/// Resolve and fully load in one step, for callers without a fallback view
pub async fn load(
    registry: &ContentRegistry,
    temp: &TempConfig,
    slug: Option<&str>,
) -> Result<Result<RenderedDocument, Redirect>, LoadError> {
    match navigate(registry, temp, slug) {
        Navigation::Redirect(redirect) => Ok(Err(redirect)),
        Navigation::Pending(pending) => pending.await.map(Ok),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{DocumentLoader, RenderContext, StaticLoader};
    use std::sync::Arc;

    fn registry(docs: &[(&str, &str)]) -> ContentRegistry {
        let context = Arc::new(RenderContext::default());
        ContentRegistry::from_entries(
            ".mdx",
            docs.iter().map(|(key, source)| {
                let loader: Arc<dyn DocumentLoader> =
                    Arc::new(StaticLoader::new(*source, Arc::clone(&context)));
                (*key, loader)
            }),
        )
        .unwrap()
    }

    #[test]
    fn test_missing_slug_redirects_to_index() {
        let registry = registry(&[("t/notes.mdx", "notes")]);
        let temp = TempConfig::default();
        let resolver = Resolver::new(&registry, &temp);

        for slug in [None, Some(""), Some("   ")] {
            let resolution = resolver.resolve(slug);
            assert_eq!(resolution.state(), RouteState::NoSlug);
            assert!(matches!(
                resolution,
                Resolution::Redirect(Redirect::Index(ref target)) if target == "/t"
            ));
        }
    }

    #[test]
    fn test_unknown_slug_redirects_to_not_found() {
        let registry = registry(&[("t/notes.mdx", "notes")]);
        let temp = TempConfig::default();
        let resolution = Resolver::new(&registry, &temp).resolve(Some("missing"));
        assert_eq!(resolution.state(), RouteState::NotFound);
        match resolution {
            Resolution::Redirect(redirect) => assert_eq!(redirect.target(), "/404"),
            Resolution::Resolved(_) => panic!("expected a redirect"),
        }
    }

    #[test]
    fn test_known_slug_resolves() {
        let registry = registry(&[("t/notes.mdx", "notes"), ("t/draft.mdx", "draft")]);
        let temp = TempConfig::default();
        match Resolver::new(&registry, &temp).resolve(Some("notes")) {
            Resolution::Resolved(doc) => assert_eq!(doc.key, "t/notes.mdx"),
            Resolution::Redirect(r) => panic!("unexpected redirect to {}", r.target()),
        }
    }

    #[test]
    fn test_match_is_exact() {
        let registry = registry(&[("t/notes.mdx", "notes")]);
        let temp = TempConfig::default();
        let resolver = Resolver::new(&registry, &temp);
        assert_eq!(resolver.resolve(Some("Notes")).state(), RouteState::NotFound);
        assert_eq!(resolver.resolve(Some("note")).state(), RouteState::NotFound);
        assert_eq!(resolver.resolve(Some("notes.mdx")).state(), RouteState::NotFound);
    }

    #[test]
    fn test_surrounding_whitespace_is_part_of_slug() {
        let registry = registry(&[("t/notes.mdx", "notes"), ("t/ spaced.mdx", "spaced")]);
        let temp = TempConfig::default();
        let resolver = Resolver::new(&registry, &temp);
        assert_eq!(resolver.resolve(Some(" notes")).state(), RouteState::NotFound);
        assert_eq!(resolver.resolve(Some("notes ")).state(), RouteState::NotFound);
        match resolver.resolve(Some(" spaced")) {
            Resolution::Resolved(doc) => assert_eq!(doc.key, "t/ spaced.mdx"),
            Resolution::Redirect(r) => panic!("unexpected redirect to {}", r.target()),
        }
    }

    #[test]
    fn test_ambiguous_slug_is_not_found() {
        let registry = registry(&[("a/notes.mdx", "one"), ("b/notes.mdx", "two")]);
        let temp = TempConfig::default();
        let resolution = Resolver::new(&registry, &temp).resolve(Some("notes"));
        assert_eq!(resolution.state(), RouteState::NotFound);
    }

    #[tokio::test]
    async fn test_load_renders_document() {
        let registry = registry(&[("t/notes.mdx", "# Notes")]);
        let temp = TempConfig::default();
        let doc = load(&registry, &temp, Some("notes"))
            .await
            .unwrap()
            .unwrap();
        assert!(doc.html.contains("<h1>Notes</h1>"));
    }

    #[tokio::test]
    async fn test_load_twice_is_idempotent() {
        let registry = registry(&[("t/notes.mdx", "# Notes")]);
        let temp = TempConfig::default();
        let first = load(&registry, &temp, Some("notes")).await.unwrap().unwrap();
        let second = load(&registry, &temp, Some("notes")).await.unwrap().unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_load_redirects() {
        let registry = registry(&[("t/notes.mdx", "# Notes")]);
        let temp = TempConfig::default();
        let redirect = load(&registry, &temp, Some("missing"))
            .await
            .unwrap()
            .unwrap_err();
        assert_eq!(redirect, Redirect::NotFound("/404".to_string()));

        let redirect = load(&registry, &temp, None).await.unwrap().unwrap_err();
        assert_eq!(redirect, Redirect::Index("/t".to_string()));
    }
}
