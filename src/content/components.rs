//! Component substitution for custom elements embedded in content
//!
//! Content documents may use capitalised elements such as `<Callout>`.
//! A [`ComponentMap`] maps each name to a concrete HTML element; the
//! markdown renderer rewrites raw HTML through it.

use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::config::ComponentConfig;

lazy_static! {
    static ref COMPONENT_TAG: Regex =
        Regex::new(r"<(/?)([A-Z][A-Za-z0-9]*)(\s[^<>]*?)?(/?)>").expect("valid component regex");
}

/// Mapping from content element names to the HTML they render as
#[derive(Debug, Clone, Default)]
pub struct ComponentMap {
    components: IndexMap<String, ComponentConfig>,
}

impl ComponentMap {
    pub fn new(components: IndexMap<String, ComponentConfig>) -> Self {
        Self { components }
    }

    pub fn get(&self, name: &str) -> Option<&ComponentConfig> {
        self.components.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Rewrite known component tags in a raw HTML fragment.
    ///
    /// Unknown capitalised elements are left untouched.
    pub fn substitute(&self, html: &str) -> String {
        if self.is_empty() {
            return html.to_string();
        }

        COMPONENT_TAG
            .replace_all(html, |caps: &Captures| {
                let name = &caps[2];
                let Some(component) = self.get(name) else {
                    return caps[0].to_string();
                };

                let closing = &caps[1] == "/";
                if closing {
                    return format!("</{}>", component.tag);
                }

                let attrs = caps.get(3).map(|m| m.as_str()).unwrap_or("");
                let self_closing = &caps[4] == "/";
                let class_attr = component
                    .class
                    .as_ref()
                    .map(|class| format!(r#" class="{}""#, class))
                    .unwrap_or_default();

                if self_closing {
                    format!(
                        "<{tag}{class_attr}{attrs}></{tag}>",
                        tag = component.tag,
                        attrs = attrs.trim_end()
                    )
                } else {
                    format!("<{}{}{}>", component.tag, class_attr, attrs)
                }
            })
            .into_owned()
    }
}
