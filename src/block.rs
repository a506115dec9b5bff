use serde::Serialize;

/// Inline style flags. Flags stack: a run may be bold and italic at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Style {
    pub bold: bool,
    pub italic: bool,
    pub code: bool,
}

impl Style {
    pub const PLAIN: Style = Style {
        bold: false,
        italic: false,
        code: false,
    };
    pub const BOLD: Style = Style {
        bold: true,
        ..Style::PLAIN
    };
    pub const ITALIC: Style = Style {
        italic: true,
        ..Style::PLAIN
    };
    pub const CODE: Style = Style {
        code: true,
        ..Style::PLAIN
    };

    pub fn is_plain(self) -> bool {
        self == Style::PLAIN
    }

    pub fn union(self, other: Style) -> Style {
        Style {
            bold: self.bold || other.bold,
            italic: self.italic || other.italic,
            code: self.code || other.code,
        }
    }
}

/// A contiguous span of text sharing one set of style flags
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextRun {
    pub text: String,
    pub style: Style,
}

impl TextRun {
    pub fn plain(text: impl Into<String>) -> Self {
        Self::styled(text, Style::PLAIN)
    }

    pub fn styled(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// Block-level elements produced by the converter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DocumentBlock {
    Heading {
        /// 1 through 6
        level: u8,
        runs: Vec<TextRun>,
    },
    Paragraph {
        runs: Vec<TextRun>,
    },
    /// Items are in encounter order; ordered lists are numbered 1..N by position.
    List {
        ordered: bool,
        items: Vec<Vec<TextRun>>,
    },
    Blockquote {
        runs: Vec<TextRun>,
    },
    CodeBlock {
        raw_text: String,
    },
    Rule,
}

impl DocumentBlock {
    /// Visible text of the block with all styling dropped.
    /// List items are joined with newlines.
    pub fn plain_text(&self) -> String {
        match self {
            DocumentBlock::Heading { runs, .. }
            | DocumentBlock::Paragraph { runs }
            | DocumentBlock::Blockquote { runs } => runs_text(runs),
            DocumentBlock::List { items, .. } => items
                .iter()
                .map(|item| runs_text(item))
                .collect::<Vec<_>>()
                .join("\n"),
            DocumentBlock::CodeBlock { raw_text } => raw_text.clone(),
            DocumentBlock::Rule => String::new(),
        }
    }
}

pub(crate) fn runs_text(runs: &[TextRun]) -> String {
    runs.iter().map(|run| run.text.as_str()).collect()
}
