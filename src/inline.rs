use once_cell::sync::Lazy;
use regex::Regex;

use crate::block::{Style, TextRun};

// Applied in order. Each pass only splits runs that are still plain, so a
// span tagged by an earlier pass keeps its markers' inner text untouched.
static PASSES: Lazy<Vec<(Regex, Style)>> = Lazy::new(|| {
    [
        (r"\*\*(.*?)\*\*", Style::BOLD),
        (r"__(.*?)__", Style::BOLD),
        (r"\*(.*?)\*", Style::ITALIC),
        (r"_(.*?)_", Style::ITALIC),
        (r"`(.*?)`", Style::CODE),
    ]
    .into_iter()
    .map(|(pattern, style)| (Regex::new(pattern).expect("valid inline pattern"), style))
    .collect()
});

/// Split one line of Markdown into styled text runs.
///
/// Detects `**bold**`/`__bold__`, then `*italic*`/`_italic_`, then `` `code` ``.
/// Doubly-marked text such as `**_x_**` keeps only the outer style.
pub fn inline_parse(line: &str) -> Vec<TextRun> {
    let mut runs = vec![TextRun::plain(line)];
    for (regex, style) in PASSES.iter() {
        runs = runs
            .into_iter()
            .flat_map(|run| {
                if run.style.is_plain() {
                    split_run(&run.text, regex, *style)
                } else {
                    vec![run]
                }
            })
            .collect();
    }
    runs.retain(|run| !run.text.is_empty());
    runs
}

fn split_run(text: &str, regex: &Regex, style: Style) -> Vec<TextRun> {
    let mut out = Vec::new();
    let mut last = 0;
    for caps in regex.captures_iter(text) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        out.push(TextRun::plain(&text[last..whole.start()]));
        out.push(TextRun::styled(inner.as_str(), style));
        last = whole.end();
    }
    out.push(TextRun::plain(&text[last..]));
    out
}
