use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::block::{DocumentBlock, TextRun};
use crate::inline::inline_parse;

static ORDERED_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+\.\s+").expect("valid ordered list pattern"));

/// What the scanner is in the middle of collecting.
/// At most one block is ever open.
enum ScanState {
    Idle,
    InCode(String),
    InList {
        ordered: bool,
        items: Vec<Vec<TextRun>>,
    },
}

/// Convert markdown text into a list of blocks.
///
/// Single forward pass over lines. Never fails: anything unrecognised becomes
/// a paragraph, one per line.
pub fn convert(markdown: &str) -> Vec<DocumentBlock> {
    let mut blocks = Vec::new();
    let mut state = ScanState::Idle;

    for line in markdown.lines() {
        let trimmed = line.trim();

        if let ScanState::InCode(buffer) = &mut state {
            if trimmed.starts_with("```") {
                let raw_text = std::mem::take(buffer);
                blocks.push(DocumentBlock::CodeBlock { raw_text });
                state = ScanState::Idle;
            } else {
                buffer.push_str(line);
                buffer.push('\n');
            }
            continue;
        }

        if trimmed.starts_with("```") {
            close_list(&mut state, &mut blocks);
            state = ScanState::InCode(String::new());
            continue;
        }

        if let Some(item) = ordered_item(line) {
            push_item(&mut state, &mut blocks, true, item);
            continue;
        }

        if let Some(item) = unordered_item(trimmed) {
            push_item(&mut state, &mut blocks, false, item);
            continue;
        }

        if trimmed.is_empty() {
            close_list(&mut state, &mut blocks);
            continue;
        }
        // An open list stays open; only a blank line or a fence closes it
        blocks.push(classify_line(line, trimmed));
    }

    if let ScanState::InCode(buffer) = &state {
        debug!(
            lines = buffer.lines().count(),
            "unterminated code fence, content dropped"
        );
    }
    close_list(&mut state, &mut blocks);

    debug!(blocks = blocks.len(), "converted markdown");
    blocks
}

/// Lines that are emitted immediately, never accumulated.
fn classify_line(line: &str, trimmed: &str) -> DocumentBlock {
    if let Some((level, rest)) = heading(line) {
        return DocumentBlock::Heading {
            level,
            runs: inline_parse(rest),
        };
    }
    if let Some(rest) = line.strip_prefix("> ") {
        return DocumentBlock::Blockquote {
            runs: inline_parse(rest),
        };
    }
    if matches!(trimmed, "---" | "***" | "___") {
        return DocumentBlock::Rule;
    }
    DocumentBlock::Paragraph {
        runs: inline_parse(line),
    }
}

/// `#` through `######` followed by a space or tab. Returns the level and
/// the text after that one separator.
fn heading(line: &str) -> Option<(u8, &str)> {
    let level = line.bytes().take_while(|&b| b == b'#').count();
    if !(1..=6).contains(&level) {
        return None;
    }
    let rest = line[level..]
        .strip_prefix(' ')
        .or_else(|| line[level..].strip_prefix('\t'))?;
    Some((level as u8, rest))
}

fn ordered_item(line: &str) -> Option<&str> {
    ORDERED_ITEM.find(line).map(|m| &line[m.end()..])
}

fn unordered_item(trimmed: &str) -> Option<&str> {
    trimmed
        .strip_prefix("- ")
        .or_else(|| trimmed.strip_prefix("* "))
        .map(str::trim_start)
}

fn push_item(state: &mut ScanState, blocks: &mut Vec<DocumentBlock>, ordered: bool, item: &str) {
    let runs = inline_parse(item);
    if let ScanState::InList {
        ordered: open_kind,
        items,
    } = state
    {
        if *open_kind == ordered {
            items.push(runs);
            return;
        }
    }
    close_list(state, blocks);
    *state = ScanState::InList {
        ordered,
        items: vec![runs],
    };
}

fn close_list(state: &mut ScanState, blocks: &mut Vec<DocumentBlock>) {
    if let ScanState::InList { ordered, items } = std::mem::replace(state, ScanState::Idle) {
        blocks.push(DocumentBlock::List { ordered, items });
    }
}
