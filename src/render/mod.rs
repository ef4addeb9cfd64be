//! Markdown to HTML for the preview pane.
//!
//! The editor only depends on the [`RenderBridge`] trait. The default
//! implementation, [`MarkdownRenderer`], parses with comrak and hands fenced
//! code to [`crate::highlight`].

use comrak::nodes::{NodeHtmlBlock, NodeValue};
use comrak::{Arena, Options, format_html, parse_document};
use thiserror::Error;
use tracing::{debug_span, warn};

/// Errors produced while rendering a preview.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A component the renderer needs is missing.
    #[error("{0} is not available")]
    Unavailable(String),

    #[error("failed to write HTML: {0}")]
    Io(#[from] std::io::Error),

    #[error("renderer produced invalid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Converts raw markdown into preview HTML.
pub trait RenderBridge {
    /// Short description used in logs and the startup banner.
    fn name(&self) -> &str;

    /// Check that everything the renderer depends on is loaded.
    ///
    /// # Errors
    /// Returns [`RenderError::Unavailable`] naming the missing component.
    fn probe(&self) -> Result<(), RenderError> {
        Ok(())
    }

    /// Render `markdown` to HTML.
    ///
    /// # Errors
    /// Returns an error if the HTML could not be produced.
    fn render(&self, markdown: &str) -> Result<String, RenderError>;
}

/// comrak-backed renderer with syntect code highlighting.
#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    highlight_code: bool,
}

impl MarkdownRenderer {
    pub const fn new() -> Self {
        Self {
            highlight_code: true,
        }
    }

    /// Enable or disable syntax highlighting of code fences.
    pub const fn with_highlighting(mut self, enabled: bool) -> Self {
        self.highlight_code = enabled;
        self
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderBridge for MarkdownRenderer {
    fn name(&self) -> &str {
        "comrak markdown renderer"
    }

    fn render(&self, markdown: &str) -> Result<String, RenderError> {
        let _span = debug_span!("render", bytes = markdown.len()).entered();
        let arena = Arena::new();
        let mut options = Options::default();
        configure_options(&mut options);
        let root = parse_document(&arena, markdown, &options);

        if self.highlight_code {
            for node in root.descendants() {
                let mut data = node.data.borrow_mut();
                let highlighted = match &data.value {
                    NodeValue::CodeBlock(block) => {
                        let language = block.info.split_whitespace().next();
                        match crate::highlight::highlight_html(language, &block.literal) {
                            Ok(html) => html,
                            Err(err) => {
                                // Leave the block as plain <pre><code>.
                                warn!(%err, ?language, "code highlighting failed");
                                continue;
                            }
                        }
                    }
                    _ => continue,
                };
                data.value = NodeValue::HtmlBlock(NodeHtmlBlock {
                    block_type: 0,
                    literal: highlighted,
                });
            }
        }

        let mut html = Vec::new();
        format_html(root, &options, &mut html)?;
        Ok(String::from_utf8(html)?)
    }
}

fn configure_options(options: &mut Options) {
    // Enable GFM extensions
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options.extension.footnotes = true;

    // Raw HTML passes through, and highlighted code is injected as HTML.
    options.render.unsafe_ = true;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_heading_and_paragraph() {
        let html = MarkdownRenderer::new().render("# Title\n\nHello *world*").unwrap();
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<em>world</em>"));
    }

    #[test]
    fn test_render_gfm_table_and_strikethrough() {
        let md = "| a | b |\n|---|---|\n| 1 | 2 |\n\n~~gone~~";
        let html = MarkdownRenderer::new().render(md).unwrap();
        assert!(html.contains("<table>"));
        assert!(html.contains("<del>gone</del>"));
    }

    #[test]
    fn test_code_fence_is_highlighted() {
        let md = "```rust\nfn main() {}\n```\n";
        let html = MarkdownRenderer::new().render(md).unwrap();
        assert!(html.contains("<pre style="));
        assert!(html.contains("<span style="));
        assert!(!html.contains("<code class=\"language-rust\">"));
    }

    #[test]
    fn test_code_fence_without_highlighting() {
        let md = "```rust\nfn main() {}\n```\n";
        let html = MarkdownRenderer::new()
            .with_highlighting(false)
            .render(md)
            .unwrap();
        assert!(html.contains("<code class=\"language-rust\">"));
    }

    #[test]
    fn test_empty_input_renders_empty() {
        let html = MarkdownRenderer::new().render("").unwrap();
        assert!(html.trim().is_empty());
    }

    #[test]
    fn test_default_probe_succeeds() {
        assert!(MarkdownRenderer::new().probe().is_ok());
    }
}
