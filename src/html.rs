//! HTML serialization
//!
//! Produces a standalone HTML5 document with an embedded stylesheet, suitable
//! for a browser preview or for handing to an external HTML-to-PDF renderer.

use html_escape::encode_text_to_string;
use tracing::debug;

use crate::block::{DocumentBlock, TextRun};
use crate::config::Config;

/// Options for HTML serialization
#[derive(Debug, Clone, Default)]
pub struct HtmlOptions {
    /// Document title; falls back to the first heading, then "Document"
    pub title: Option<String>,
    pub config: Config,
}

impl HtmlOptions {
    pub fn new(config: Config) -> Self {
        Self {
            title: None,
            config,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Serialize blocks to a complete HTML document
pub fn blocks_to_html(blocks: &[DocumentBlock], options: &HtmlOptions) -> String {
    let mut body = String::new();
    for block in blocks {
        block_to_html(block, &mut body);
    }

    let title = options
        .title
        .clone()
        .or_else(|| first_heading(blocks))
        .unwrap_or_else(|| "Document".to_string());

    debug!(blocks = blocks.len(), %title, "generated html");
    wrap_in_document(&body, &title, &options.config)
}

fn first_heading(blocks: &[DocumentBlock]) -> Option<String> {
    blocks.iter().find_map(|block| match block {
        DocumentBlock::Heading { .. } => Some(block.plain_text()),
        _ => None,
    })
}

fn block_to_html(block: &DocumentBlock, out: &mut String) {
    match block {
        DocumentBlock::Heading { level, runs } => {
            out.push_str(&format!("<h{level}>"));
            runs_to_html(runs, out);
            out.push_str(&format!("</h{level}>\n"));
        }
        DocumentBlock::Paragraph { runs } => {
            out.push_str("<p>");
            runs_to_html(runs, out);
            out.push_str("</p>\n");
        }
        DocumentBlock::List { ordered, items } => {
            let tag = if *ordered { "ol" } else { "ul" };
            out.push_str(&format!("<{tag}>\n"));
            for item in items {
                out.push_str("<li>");
                runs_to_html(item, out);
                out.push_str("</li>\n");
            }
            out.push_str(&format!("</{tag}>\n"));
        }
        DocumentBlock::Blockquote { runs } => {
            out.push_str("<blockquote><p>");
            runs_to_html(runs, out);
            out.push_str("</p></blockquote>\n");
        }
        DocumentBlock::CodeBlock { raw_text } => {
            out.push_str("<pre><code>");
            encode_text_to_string(raw_text, out);
            out.push_str("</code></pre>\n");
        }
        DocumentBlock::Rule => out.push_str("<hr>\n"),
    }
}

fn runs_to_html(runs: &[TextRun], out: &mut String) {
    for run in runs {
        let style = run.style;
        if style.bold {
            out.push_str("<strong>");
        }
        if style.italic {
            out.push_str("<em>");
        }
        if style.code {
            out.push_str("<code>");
        }
        encode_text_to_string(&run.text, out);
        if style.code {
            out.push_str("</code>");
        }
        if style.italic {
            out.push_str("</em>");
        }
        if style.bold {
            out.push_str("</strong>");
        }
    }
}

fn wrap_in_document(body_html: &str, title: &str, config: &Config) -> String {
    let mut escaped_title = String::new();
    encode_text_to_string(title, &mut escaped_title);
    let css = stylesheet(config);

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <meta name="generator" content="mdpdf">
  <title>{escaped_title}</title>
  <style>
{css}
  </style>
</head>
<body>
<div class="container">
{body_html}</div>
</body>
</html>
"#
    )
}

fn stylesheet(config: &Config) -> String {
    let body_font = css_font(&config.font.body);
    let mono_font = css_font(&config.font.mono);
    let max_width = &config.html.max_width;
    format!(
        r#"    body {{ font-family: {body_font}, serif; line-height: 1.6; color: #333; }}
    .container {{ max-width: {max_width}; margin: 0 auto; padding: 2em; }}
    h1 {{ border-bottom: 1px solid #eee; padding-bottom: 0.3em; }}
    pre {{ background: #f5f5f5; padding: 1em; border-radius: 5px; overflow-x: auto; }}
    code {{ font-family: {mono_font}, monospace; }}
    blockquote {{ margin-left: 0; padding-left: 1em; border-left: 4px solid #eee; color: #666; font-style: italic; }}
    hr {{ border: none; border-bottom: 1px solid #eee; margin: 1.5em 0; }}"#
    )
}

/// Quote a font family name for CSS.
fn css_font(family: &str) -> String {
    let cleaned: String = family
        .chars()
        .filter(|c| !matches!(c, '"' | '\\' | '<' | '>' | ';' | '{' | '}'))
        .collect();
    format!("\"{cleaned}\"")
}
