//! MDX-flavoured markdown rendering with syntax highlighting

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use super::ComponentMap;
use crate::config::HighlightConfig;

/// Markdown renderer with syntax highlighting and component substitution
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    highlight: HighlightConfig,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::with_options(HighlightConfig::default())
    }

    /// Create with custom settings
    pub fn with_options(highlight: HighlightConfig) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            highlight,
        }
    }

    /// Render a document body to HTML
    pub fn render(&self, source: &str, components: &ComponentMap) -> String {
        let markdown = strip_esm(source);

        // Front matter is split off before rendering
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_SMART_PUNCTUATION
            | Options::ENABLE_HEADING_ATTRIBUTES
            | Options::ENABLE_GFM;
        let parser = Parser::new_ext(&markdown, options);

        let mut events: Vec<Event> = Vec::new();
        let mut code_block: Option<Option<String>> = None;
        let mut code_block_content = String::new();

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(lang) if !lang.is_empty() => {
                            // Keep only the language token from info strings like "rust title=x"
                            lang.split_whitespace().next().map(str::to_string)
                        }
                        _ => None,
                    };
                    code_block = Some(lang);
                    code_block_content.clear();
                }
                Event::End(TagEnd::CodeBlock) => {
                    let lang = code_block.take().flatten();
                    let highlighted = self.highlight_code(&code_block_content, lang.as_deref());
                    events.push(Event::Html(CowStr::from(highlighted)));
                }
                Event::Text(text) if code_block.is_some() => {
                    code_block_content.push_str(&text);
                }
                Event::Html(raw) => {
                    events.push(Event::Html(CowStr::from(components.substitute(&raw))));
                }
                Event::InlineHtml(raw) => {
                    events.push(Event::InlineHtml(CowStr::from(components.substitute(&raw))));
                }
                other => events.push(other),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());
        html_output
    }

    /// Highlight a code block
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        let lang = lang.unwrap_or("text");

        if !self.highlight.enable {
            return plain_code_block(code, lang);
        }

        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let Some(theme) = self
            .theme_set
            .themes
            .get(&self.highlight.theme)
            .or_else(|| self.theme_set.themes.values().next())
        else {
            return plain_code_block(code, lang);
        };

        match highlighted_html_for_string(code, &self.syntax_set, syntax, theme) {
            Ok(highlighted) if self.highlight.line_number => {
                add_line_numbers(&highlighted, lang)
            }
            Ok(highlighted) => format!(
                r#"<figure class="highlight {}">{}</figure>"#,
                lang, highlighted
            ),
            Err(e) => {
                tracing::debug!("Highlighting failed for {}: {}", lang, e);
                plain_code_block(code, lang)
            }
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Drop top-level MDX `import`/`export` statements.
///
/// Lines inside fenced code blocks are kept.
fn strip_esm(source: &str) -> String {
    let mut output = String::with_capacity(source.len());
    let mut fence: Option<&str> = None;

    for line in source.lines() {
        let trimmed = line.trim_start();
        match fence {
            Some(marker) => {
                if trimmed.starts_with(marker) {
                    fence = None;
                }
            }
            None => {
                if trimmed.starts_with("```") {
                    fence = Some("```");
                } else if trimmed.starts_with("~~~") {
                    fence = Some("~~~");
                } else if line.starts_with("import ") || line.starts_with("export ") {
                    continue;
                }
            }
        }
        output.push_str(line);
        output.push('\n');
    }

    output
}

/// Add line numbers to highlighted code
fn add_line_numbers(code: &str, lang: &str) -> String {
    let lines: Vec<&str> = code.lines().collect();

    let gutter = (1..=lines.len())
        .map(|n| format!(r#"<span class="line-number">{}</span>"#, n))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<figure class="highlight {}"><table><tr><td class="gutter"><pre>{}</pre></td><td class="code">{}</td></tr></table></figure>"#,
        lang,
        gutter,
        lines.join("\n")
    )
}

fn plain_code_block(code: &str, lang: &str) -> String {
    format!(
        r#"<pre><code class="language-{}">{}</code></pre>"#,
        lang,
        html_escape(code)
    )
}

/// Simple HTML escaping
pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ComponentConfig;
    use indexmap::IndexMap;

    fn callout_components() -> ComponentMap {
        let mut map = IndexMap::new();
        map.insert(
            "Callout".to_string(),
            ComponentConfig::new("div", Some("callout")),
        );
        ComponentMap::new(map)
    }

    #[test]
    fn test_render_basic_markdown() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("# Hello World\n\nThis is a test.", &ComponentMap::default());
        assert!(html.contains("<h1>Hello World</h1>"));
        assert!(html.contains("<p>This is a test.</p>"));
    }

    #[test]
    fn test_render_code_block() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("```rust\nfn main() {}\n```", &ComponentMap::default());
        assert!(html.contains("highlight rust"));
        assert!(html.contains("main"));
    }

    #[test]
    fn test_render_code_block_without_highlighting() {
        let renderer = MarkdownRenderer::with_options(HighlightConfig {
            enable: false,
            ..Default::default()
        });
        let html = renderer.render("```\na < b\n```", &ComponentMap::default());
        assert!(html.contains(r#"<code class="language-text">a &lt; b"#));
    }

    #[test]
    fn test_component_substitution() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render(
            "<Callout>\nHeads up\n</Callout>\n\nafter",
            &callout_components(),
        );
        assert!(html.contains(r#"<div class="callout">"#));
        assert!(html.contains("</div>"));
        assert!(!html.contains("Callout"));
    }

    #[test]
    fn test_esm_lines_are_dropped() {
        let renderer = MarkdownRenderer::new();
        let source = "import Chart from './chart'\nexport const meta = {}\n\n# Title\n";
        let html = renderer.render(source, &ComponentMap::default());
        assert!(!html.contains("import"));
        assert!(!html.contains("export"));
        assert!(html.contains("<h1>Title</h1>"));
    }

    #[test]
    fn test_esm_inside_fence_is_kept() {
        let stripped = strip_esm("```js\nimport x from 'y'\n```\n");
        assert!(stripped.contains("import x from 'y'"));
    }
}
