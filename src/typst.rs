use tracing::debug;

use crate::block::{DocumentBlock, TextRun};
use crate::config::Config;

/// Convert blocks to Typst markup
pub fn blocks_to_typst(blocks: &[DocumentBlock], config: &Config) -> String {
    let mut out = String::new();
    emit_preamble(config, &mut out);

    let mut i = 0;
    while i < blocks.len() {
        let block = &blocks[i];

        match block {
            DocumentBlock::Heading { .. } if config.layout.keep_heading_with_next => {
                // Keep heading with following content using a block that prevents breaks
                out.push_str("#block(breakable: false)[\n");
                emit_block(block, config, &mut out);

                if i + 1 < blocks.len() {
                    i += 1;
                    emit_block(&blocks[i], config, &mut out);
                }
                out.push_str("]\n\n");
            }
            _ => emit_block(block, config, &mut out),
        }

        i += 1;
    }

    debug!(blocks = blocks.len(), bytes = out.len(), "generated typst markup");
    out
}

fn emit_preamble(config: &Config, out: &mut String) {
    let page = &config.page;
    let font = &config.font;

    out.push_str("#set page(paper: ");
    push_string_literal(&page.paper, out);
    out.push_str(&format!(", margin: {}", page.margin));
    if page.numbers {
        out.push_str(", numbering: \"1\"");
    }
    out.push_str(")\n");

    out.push_str("#set text(font: ");
    push_string_literal(&font.body, out);
    out.push_str(&format!(", size: {})\n", font.size));

    out.push_str("#show raw: set text(font: ");
    push_string_literal(&font.mono, out);
    out.push_str(")\n");

    out.push_str("#set par(linebreaks: \"optimized\")\n\n");
}

fn emit_block(block: &DocumentBlock, config: &Config, out: &mut String) {
    match block {
        DocumentBlock::Heading { level, runs } => {
            for _ in 0..*level {
                out.push('=');
            }
            out.push(' ');
            runs_to_typst(runs, out);
            out.push_str("\n\n");
        }
        DocumentBlock::Paragraph { runs } => {
            runs_to_typst(runs, out);
            out.push_str("\n\n");
        }
        DocumentBlock::List { ordered, items } => {
            // Keep small lists together, allow breaks in large ones
            if items.len() <= config.layout.keep_list_together_max {
                out.push_str("#block(breakable: false)[\n");
                list_to_typst(*ordered, items, out);
                out.push_str("]\n\n");
            } else {
                list_to_typst(*ordered, items, out);
                out.push('\n');
            }
        }
        DocumentBlock::Blockquote { runs } => {
            out.push_str("#quote(block: true)[");
            runs_to_typst(runs, out);
            out.push_str("]\n\n");
        }
        DocumentBlock::CodeBlock { raw_text } => {
            out.push_str("#block(breakable: false)[#raw(block: true, ");
            push_string_literal(raw_text.strip_suffix('\n').unwrap_or(raw_text), out);
            out.push_str(")]\n\n");
        }
        DocumentBlock::Rule => {
            out.push_str("#line(length: 100%)\n\n");
        }
    }
}

fn list_to_typst(ordered: bool, items: &[Vec<TextRun>], out: &mut String) {
    // Typst numbers `+` items itself, 1..N by position
    let prefix = if ordered { "+ " } else { "- " };
    for item in items {
        out.push_str(prefix);
        runs_to_typst(item, out);
        out.push('\n');
    }
}

fn runs_to_typst(runs: &[TextRun], out: &mut String) {
    let mut after_call = false;
    let mut line_start = true;
    for run in runs {
        run_to_typst(run, after_call, line_start, out);
        after_call = !run.style.is_plain();
        line_start = line_start && run.style.is_plain() && run.text.trim().is_empty();
    }
}

fn run_to_typst(run: &TextRun, after_call: bool, line_start: bool, out: &mut String) {
    let style = run.style;
    if style.bold {
        out.push_str("#strong[");
    }
    if style.italic {
        out.push_str("#emph[");
    }
    if style.code {
        out.push_str("#raw(");
        push_string_literal(&run.text, out);
        out.push(')');
    } else {
        escape_markup(&run.text, after_call, line_start, out);
    }
    if style.italic {
        out.push(']');
    }
    if style.bold {
        out.push(']');
    }
}

/// Escape text for Typst markup mode.
///
/// At the start of a block, leading whitespace is dropped and the `.` of a
/// leading number is escaped so `1. x` stays text instead of an enum item.
fn escape_markup(text: &str, after_call: bool, line_start: bool, out: &mut String) {
    let (text, digits) = if line_start {
        let text = text.trim_start();
        (text, text.bytes().take_while(u8::is_ascii_digit).count())
    } else {
        (text, 0)
    };
    for (i, ch) in text.char_indices() {
        match ch {
            '#' | '*' | '_' | '@' | '$' | '\\' | '`' | '<' | '>' | '[' | ']' | '=' | '+'
            | '-' | '/' | '~' => {
                out.push('\\');
                out.push(ch);
            }
            // A leading `.` or `(` would continue the preceding `#strong[..]` etc.
            '.' | '(' if i == 0 && after_call => {
                out.push('\\');
                out.push(ch);
            }
            '.' if digits > 0 && i == digits => {
                out.push('\\');
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
}

/// Write `text` as a Typst string literal.
fn push_string_literal(text: &str, out: &mut String) {
    out.push('"');
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::convert;
    use pretty_assertions::assert_eq;

    fn body(markdown: &str) -> String {
        body_with(markdown, &Config::default())
    }

    fn body_with(markdown: &str, config: &Config) -> String {
        let full = blocks_to_typst(&convert(markdown), config);
        let (_, body) = full
            .split_once("#set par(linebreaks: \"optimized\")\n\n")
            .expect("preamble present");
        body.to_string()
    }

    #[test]
    fn preamble_uses_config() {
        let mut config = Config::default();
        config.page.paper = "us-letter".into();
        config.page.numbers = true;
        let out = blocks_to_typst(&[], &config);
        assert!(out.starts_with(
            "#set page(paper: \"us-letter\", margin: 0.4in, numbering: \"1\")\n\
             #set text(font: \"Libertinus Serif\", size: 11pt)\n"
        ));
        assert!(out.contains("#show raw: set text(font: \"DejaVu Sans Mono\")"));
    }

    #[test]
    fn heading() {
        assert_eq!(body("# Hello"), "#block(breakable: false)[\n= Hello\n\n]\n\n");
    }

    #[test]
    fn heading_with_following_content() {
        assert_eq!(
            body("### Title\n\nSome text."),
            "#block(breakable: false)[\n=== Title\n\nSome text.\n\n]\n\n"
        );
    }

    #[test]
    fn heading_not_grouped_when_disabled() {
        let mut config = Config::default();
        config.layout.keep_heading_with_next = false;
        assert_eq!(body_with("## Title\ntext", &config), "== Title\n\ntext\n\n");
    }

    #[test]
    fn paragraph() {
        assert_eq!(body("Hello world"), "Hello world\n\n");
    }

    #[test]
    fn inline_styles() {
        assert_eq!(body("**bold**"), "#strong[bold]\n\n");
        assert_eq!(body("*italic*"), "#emph[italic]\n\n");
        assert_eq!(body("`co\"de`"), "#raw(\"co\\\"de\")\n\n");
    }

    #[test]
    fn stacked_styles_nest() {
        let run = TextRun::styled(
            "x",
            crate::block::Style::BOLD.union(crate::block::Style::ITALIC),
        );
        let mut out = String::new();
        run_to_typst(&run, false, false, &mut out);
        assert_eq!(out, "#strong[#emph[x]]");
    }

    #[test]
    fn text_after_code_cannot_continue_call() {
        assert_eq!(body("`f`.x"), "#raw(\"f\")\\.x\n\n");
    }

    #[test]
    fn code_block() {
        assert_eq!(
            body("```\nlet x = \"a\";\n```"),
            "#block(breakable: false)[#raw(block: true, \"let x = \\\"a\\\";\")]\n\n"
        );
    }

    #[test]
    fn lists() {
        assert_eq!(
            body("- one\n- two"),
            "#block(breakable: false)[\n- one\n- two\n]\n\n"
        );
        assert_eq!(
            body("3. one\n7. two"),
            "#block(breakable: false)[\n+ one\n+ two\n]\n\n"
        );
    }

    #[test]
    fn long_list_is_breakable() {
        let md = "- a\n- b\n- c\n- d\n- e\n- f";
        assert_eq!(body(md), "- a\n- b\n- c\n- d\n- e\n- f\n\n");
    }

    #[test]
    fn blockquote() {
        assert_eq!(body("> wise words"), "#quote(block: true)[wise words]\n\n");
    }

    #[test]
    fn escapes_special_chars() {
        assert_eq!(body("a # b"), "a \\# b\n\n");
        assert_eq!(body("a_b"), "a\\_b\n\n");
        assert_eq!(body("see http://x"), "see http:\\/\\/x\n\n");
        assert_eq!(body("= not a heading"), "\\= not a heading\n\n");
    }

    #[test]
    fn numbered_quote_is_not_an_enum() {
        assert_eq!(body("> 1. x"), "#quote(block: true)[1\\. x]\n\n");
    }

    #[test]
    fn indented_number_is_not_an_enum() {
        assert_eq!(body(" 2. indented"), "2\\. indented\n\n");
        assert_eq!(body("10.5 kg"), "10\\.5 kg\n\n");
        assert_eq!(body("in 2. place"), "in 2. place\n\n");
    }

    #[test]
    fn horizontal_rule() {
        assert_eq!(body("---"), "#line(length: 100%)\n\n");
    }
}
