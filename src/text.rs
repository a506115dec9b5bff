use crate::block::{DocumentBlock, runs_text};

const RULE_WIDTH: usize = 40;

/// Render blocks as plain text for a terminal.
pub fn blocks_to_text(blocks: &[DocumentBlock]) -> String {
    let mut out = String::new();
    for block in blocks {
        match block {
            DocumentBlock::Heading { level, runs } => {
                let text = runs_text(runs);
                let underline = if *level == 1 { '=' } else { '-' };
                let width = text.chars().count().max(1);
                out.push_str(&text);
                out.push('\n');
                out.extend(std::iter::repeat_n(underline, width));
                out.push('\n');
            }
            DocumentBlock::Paragraph { runs } => {
                out.push_str(&runs_text(runs));
                out.push('\n');
            }
            DocumentBlock::List { ordered, items } => {
                for (index, item) in items.iter().enumerate() {
                    if *ordered {
                        out.push_str(&format!("{}. ", index + 1));
                    } else {
                        out.push_str("• ");
                    }
                    out.push_str(&runs_text(item));
                    out.push('\n');
                }
            }
            DocumentBlock::Blockquote { runs } => {
                out.push_str("> ");
                out.push_str(&runs_text(runs));
                out.push('\n');
            }
            DocumentBlock::CodeBlock { raw_text } => {
                for line in raw_text.lines() {
                    out.push_str("    ");
                    out.push_str(line);
                    out.push('\n');
                }
            }
            DocumentBlock::Rule => {
                out.push_str(&"-".repeat(RULE_WIDTH));
                out.push('\n');
            }
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::convert;
    use pretty_assertions::assert_eq;

    fn text(markdown: &str) -> String {
        blocks_to_text(&convert(markdown))
    }

    #[test]
    fn headings_are_underlined() {
        assert_eq!(text("# Top\n## Sub"), "Top\n===\n\nSub\n---\n\n");
    }

    #[test]
    fn ordered_items_are_renumbered() {
        assert_eq!(text("5. foo\n7. bar"), "1. foo\n2. bar\n\n");
    }

    #[test]
    fn bullets_and_styles_dropped() {
        assert_eq!(text("- **a**\n- `b`"), "• a\n• b\n\n");
    }

    #[test]
    fn code_quote_rule() {
        assert_eq!(
            text("```\nx = 1\n```\n> q\n___"),
            format!("    x = 1\n\n> q\n\n{}\n\n", "-".repeat(RULE_WIDTH))
        );
    }

    #[test]
    fn empty_document() {
        assert_eq!(text(""), "");
    }
}
