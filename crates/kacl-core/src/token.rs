//! Token types shared by the tokenizer and the grammar.

use std::fmt;

use crate::span::LineSpan;

/// Line classification produced by the tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `<!-- ... -->` annotation line.
    Flag,
    /// `# ` heading.
    H1,
    /// `## ` heading.
    H2,
    /// `### ` heading.
    H3,
    /// Line starting with `-` or `*`.
    ListItem,
    /// Anything that matched nothing else.
    Paragraph,
    /// `[label]: http...` link definition.
    ReferenceLink,
    /// Line starting with `---`.
    HorizontalRule,
}

impl TokenKind {
    /// Stable lowercase name, used in error messages and token dumps.
    pub const fn as_str(self) -> &'static str {
        match self {
            TokenKind::Flag => "flag",
            TokenKind::H1 => "h1",
            TokenKind::H2 => "h2",
            TokenKind::H3 => "h3",
            TokenKind::ListItem => "list-item",
            TokenKind::Paragraph => "paragraph",
            TokenKind::ReferenceLink => "reference-link",
            TokenKind::HorizontalRule => "horizontal-rule",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified unit of input with its source lines.
///
/// `content` holds one entry per source line absorbed into the token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// What the token is.
    pub kind: TokenKind,
    /// Source lines covered.
    pub span: LineSpan,
    /// Content lines, already stripped of markup.
    pub content: Vec<String>,
}

impl Token {
    pub(crate) fn new(kind: TokenKind, line: usize, first: String) -> Self {
        Self {
            kind,
            span: LineSpan::single(line),
            content: vec![first],
        }
    }

    /// Line number of the first content line.
    #[inline]
    pub fn line(&self) -> usize {
        self.span.start
    }

    /// Content lines joined with `\n`.
    pub fn text(&self) -> String {
        self.content.join("\n")
    }

    /// Iterate over the content lines.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.content.iter().map(String::as_str)
    }

    pub(crate) fn push_line(&mut self, line: usize, text: String) {
        self.content.push(text);
        self.span.extend_to(line);
    }
}
