//! Site configuration (_config.yml)

use anyhow::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,

    // Directory
    pub public_dir: String,
    pub static_dir: String,

    // Temp pages
    #[serde(default)]
    pub temp: TempConfig,

    // Rendering
    #[serde(default)]
    pub highlight: HighlightConfig,

    /// Custom elements available inside content, keyed by element name
    #[serde(default = "default_components")]
    pub components: IndexMap<String, ComponentConfig>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Portfolio".to_string(),
            description: String::new(),
            author: "John Doe".to_string(),
            language: "en".to_string(),

            public_dir: "public".to_string(),
            static_dir: "static".to_string(),

            temp: TempConfig::default(),
            highlight: HighlightConfig::default(),
            components: default_components(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

/// Temp page configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TempConfig {
    /// Directory holding the content documents, relative to the site root
    pub dir: String,
    /// Content file extension, without the dot
    pub extension: String,
    /// Route of the listing index
    pub route: String,
    /// Route of the generic not-found page
    pub not_found: String,
    /// How long a request waits for a document before streaming the fallback
    pub fallback_delay_ms: u64,
    /// Message shown by the index when no document is registered
    pub empty_message: String,
}

impl Default for TempConfig {
    fn default() -> Self {
        Self {
            dir: "content/temp".to_string(),
            extension: "mdx".to_string(),
            route: "/t".to_string(),
            not_found: "/404".to_string(),
            fallback_delay_ms: 50,
            empty_message: "No temp pages yet.".to_string(),
        }
    }
}

impl TempConfig {
    /// Index route without a trailing slash
    pub fn index_route(&self) -> String {
        let route = self.route.trim_end_matches('/');
        if route.is_empty() {
            "/".to_string()
        } else if route.starts_with('/') {
            route.to_string()
        } else {
            format!("/{}", route)
        }
    }

    /// Suffix every content file carries, dot included
    pub fn suffix(&self) -> String {
        format!(".{}", self.extension.trim_start_matches('.'))
    }
}

/// Syntax highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub enable: bool,
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            enable: true,
            theme: "base16-ocean.dark".to_string(),
            line_number: false,
        }
    }
}

/// Concrete element a content component renders as
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentConfig {
    pub tag: String,
    #[serde(default)]
    pub class: Option<String>,
}

impl ComponentConfig {
    pub fn new(tag: &str, class: Option<&str>) -> Self {
        Self {
            tag: tag.to_string(),
            class: class.map(str::to_string),
        }
    }
}

fn default_components() -> IndexMap<String, ComponentConfig> {
    let mut components = IndexMap::new();
    components.insert(
        "Callout".to_string(),
        ComponentConfig::new("div", Some("callout")),
    );
    components.insert("Note".to_string(), ComponentConfig::new("aside", Some("note")));
    components.insert(
        "Figure".to_string(),
        ComponentConfig::new("figure", Some("figure")),
    );
    components
}
