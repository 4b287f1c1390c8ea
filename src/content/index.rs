//! Discovery index - the sorted slug listing shown at the temp index route

use serde::Serialize;
use std::cmp::Ordering;

use super::registry::{slug_from_key, ContentRegistry};
use crate::helpers::temp_url;

/// One link on the index page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingEntry {
    pub slug: String,
    pub href: String,
}

/// Listing computed for a single render pass
#[derive(Debug, Clone, Serialize)]
pub struct ContentIndex {
    pub entries: Vec<ListingEntry>,
}

impl ContentIndex {
    /// Build the listing for the index route mounted at `route`
    pub fn build(registry: &ContentRegistry, route: &str) -> Self {
        let entries = list_slugs(registry)
            .into_iter()
            .map(|slug| ListingEntry {
                href: temp_url(route, &slug),
                slug,
            })
            .collect();
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Sorted, de-duplicated slugs of every registered document.
///
/// Works on keys alone; no loader is invoked.
pub fn list_slugs(registry: &ContentRegistry) -> Vec<String> {
    let mut slugs: Vec<String> = registry
        .keys()
        .filter_map(|key| slug_from_key(key, registry.suffix()))
        .map(str::to_string)
        .collect();

    slugs.sort_by(|a, b| locale_compare(a, b));
    for slug in duplicate_slugs(&slugs) {
        tracing::warn!(
            slug,
            "Slug is registered more than once; its link resolves to the not-found route"
        );
    }
    slugs.dedup();
    slugs
}

/// Slugs that occur more than once in an already sorted list
fn duplicate_slugs(sorted: &[String]) -> Vec<&str> {
    let mut duplicates: Vec<&str> = sorted
        .windows(2)
        .filter(|pair| pair[0] == pair[1])
        .map(|pair| pair[0].as_str())
        .collect();
    duplicates.dedup();
    duplicates
}

/// Locale-style ordering: case-insensitive first, lowercase before
/// uppercase on ties, byte order last.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    if folded != Ordering::Equal {
        return folded;
    }

    for (x, y) in a.chars().zip(b.chars()) {
        if x != y {
            match (x.is_lowercase(), y.is_lowercase()) {
                (true, false) => return Ordering::Less,
                (false, true) => return Ordering::Greater,
                _ => {}
            }
        }
    }

    a.cmp(b)
}
