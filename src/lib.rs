mod block;
mod config;
mod error;
mod html;
mod inline;
mod parser;
mod text;
mod typst;

pub use block::{DocumentBlock, Style, TextRun};
pub use config::{Config, FontConfig, HtmlConfig, LayoutConfig, PageConfig};
pub use error::{Error, Result};
pub use html::HtmlOptions;
pub use inline::inline_parse;

use tracing::{debug, info, warn};
use typst_as_lib::TypstEngine;
use typst_as_lib::typst_kit_options::TypstKitFontOptions;
use typst_library::layout::PagedDocument;
use typst_pdf::PdfOptions;

/// Convert markdown text into a vector of blocks.
pub fn convert(markdown: &str) -> Vec<DocumentBlock> {
    parser::convert(markdown)
}

/// Convert markdown to Typst markup using default config.
pub fn markdown_to_typst(markdown: &str) -> String {
    markdown_to_typst_with_config(markdown, &Config::compiled_default())
}

/// Convert markdown to Typst markup with custom config.
pub fn markdown_to_typst_with_config(markdown: &str, config: &Config) -> String {
    let blocks = convert(markdown);
    typst::blocks_to_typst(&blocks, config)
}

/// Convert markdown to a standalone HTML document.
pub fn markdown_to_html(markdown: &str, options: &HtmlOptions) -> String {
    let blocks = convert(markdown);
    html::blocks_to_html(&blocks, options)
}

/// Convert markdown to plain text for terminal output.
pub fn markdown_to_text(markdown: &str) -> String {
    text::blocks_to_text(&convert(markdown))
}

/// Convert markdown to PDF bytes using default config.
pub fn markdown_to_pdf(markdown: &str) -> Result<Vec<u8>> {
    markdown_to_pdf_with_config(markdown, &Config::compiled_default())
}

/// Compile markdown to a Typst document, logging any compiler warnings.
fn compile_document(markdown: &str, config: &Config) -> Result<PagedDocument> {
    let typst_content = markdown_to_typst_with_config(markdown, config);

    let font_options = TypstKitFontOptions::new()
        .include_embedded_fonts(true)
        .include_system_fonts(config.font.system_fonts)
        .include_dirs(config.font.dirs.iter().cloned());

    let engine = TypstEngine::builder()
        .main_file(typst_content)
        .search_fonts_with(font_options)
        .build();

    let compiled = engine.compile();
    for warning in &compiled.warnings {
        warn!(message = %warning.message, "typst warning");
    }

    let doc: PagedDocument = compiled
        .output
        .map_err(|e| Error::Compile(format!("{e:?}")))?;
    debug!(pages = doc.pages.len(), "compiled typst document");
    Ok(doc)
}

/// Convert markdown to PDF bytes with custom config.
pub fn markdown_to_pdf_with_config(markdown: &str, config: &Config) -> Result<Vec<u8>> {
    let doc = compile_document(markdown, config)?;

    let bytes =
        typst_pdf::pdf(&doc, &PdfOptions::default()).map_err(|e| Error::Pdf(format!("{e:?}")))?;
    info!(bytes = bytes.len(), "generated pdf");
    Ok(bytes)
}

/// Download name for a generated PDF: the given name with a `.pdf` suffix,
/// or `document.pdf` when the name is blank.
pub fn pdf_file_name(name: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        "document.pdf".to_string()
    } else if name.to_ascii_lowercase().ends_with(".pdf") {
        name.to_string()
    } else {
        format!("{name}.pdf")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;
    use std::path::PathBuf;
    use typst_library::layout::{Frame, FrameItem};

    #[test]
    fn pdf_file_names() {
        assert_eq!(pdf_file_name("report"), "report.pdf");
        assert_eq!(pdf_file_name("report.pdf"), "report.pdf");
        assert_eq!(pdf_file_name("Report.PDF"), "Report.PDF");
        assert_eq!(pdf_file_name("notes.md"), "notes.md.pdf");
        assert_eq!(pdf_file_name("  "), "document.pdf");
    }

    #[test]
    fn pdf_has_magic_header() {
        let bytes = markdown_to_pdf("# Title\n\nSome **bold** text.\n\n- a\n- b\n").unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }

    fn font_families(doc: &PagedDocument) -> BTreeSet<String> {
        fn walk(frame: &Frame, out: &mut BTreeSet<String>) {
            for (_, item) in frame.items() {
                match item {
                    FrameItem::Group(group) => walk(&group.frame, out),
                    FrameItem::Text(text) => {
                        out.insert(text.font.info().family.clone());
                    }
                    _ => {}
                }
            }
        }

        let mut out = BTreeSet::new();
        for page in &doc.pages {
            walk(&page.frame, &mut out);
        }
        out
    }

    #[test]
    fn configured_font_dir_is_searched() {
        let mut config = Config::default();
        config.font.body = "Tuffy".into();
        config.font.dirs = vec![PathBuf::from(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/tests/fonts"
        ))];

        let doc = compile_document("Body text", &config).unwrap();
        assert!(font_families(&doc).contains("Tuffy"));
    }

    #[test]
    fn unknown_font_falls_back_to_embedded() {
        let mut config = Config::default();
        config.font.body = "Tuffy".into();

        let doc = compile_document("Body text", &config).unwrap();
        assert!(!font_families(&doc).contains("Tuffy"));
    }

    #[test]
    fn text_wrapper_uses_converter() {
        assert_eq!(markdown_to_text("1. a"), "1. a\n\n");
    }
}
