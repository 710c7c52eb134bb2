//! Line classifier and tokenizer.
//!
//! The tokenizer reduces changelog text to a flat stream of [`Token`]s.
//! Each source line is classified on its own, then merged into the previous
//! token when it continues a paragraph or a list item.
//!
//! Newline scanning uses `memchr` (SIMD on supported platforms). Tokenizing
//! never fails: lines that match no markup become paragraphs.

use memchr::memchr;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::token::{Token, TokenKind};

static REFERENCE_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[.*\]:\s*http.*$").expect("reference link pattern"));

static FLAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"^<!--(.*)-->$").expect("flag pattern"));

/// A single source line with its 1-indexed number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// The line text, without the trailing newline or carriage return.
    pub text: &'a str,
    /// 1-indexed line number.
    pub number: usize,
}

/// Iterator over the lines of the input.
pub struct Lines<'a> {
    input: &'a str,
    offset: usize,
    number: usize,
}

impl<'a> Lines<'a> {
    /// Create a line iterator over the given input.
    #[inline]
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            offset: 0,
            number: 0,
        }
    }
}

impl<'a> Iterator for Lines<'a> {
    type Item = Line<'a>;

    fn next(&mut self) -> Option<Line<'a>> {
        let bytes = self.input.as_bytes();
        if self.offset >= bytes.len() {
            return None;
        }

        let start = self.offset;
        let end = match memchr(b'\n', &bytes[start..]) {
            Some(pos) => start + pos,
            None => bytes.len(),
        };

        // CRLF: drop the carriage return
        let text_end = if end > start && bytes[end - 1] == b'\r' {
            end - 1
        } else {
            end
        };

        self.offset = if end < bytes.len() { end + 1 } else { end };
        self.number += 1;

        // `\n` and `\r` are ASCII, so both bounds sit on char boundaries.
        Some(Line {
            text: &self.input[start..text_end],
            number: self.number,
        })
    }
}

/// Classify a single line, returning its kind and stripped content.
///
/// Rules are tried in order and the first match wins.
pub fn classify(line: &str) -> (TokenKind, String) {
    let line = line.trim_end();

    if line.starts_with("---") {
        return (TokenKind::HorizontalRule, line.to_string());
    }

    for (marker, kind) in [
        ("#", TokenKind::H1),
        ("##", TokenKind::H2),
        ("###", TokenKind::H3),
    ] {
        if let Some(rest) = heading_text(line, marker) {
            return (kind, rest.trim().to_string());
        }
    }

    if let Some(rest) = line.strip_prefix('-').or_else(|| line.strip_prefix('*')) {
        return (TokenKind::ListItem, rest.trim().to_string());
    }

    if REFERENCE_LINK.is_match(line) {
        return (TokenKind::ReferenceLink, line.to_string());
    }

    if let Some(caps) = FLAG.captures(line) {
        return (TokenKind::Flag, caps[1].trim().to_string());
    }

    (TokenKind::Paragraph, line.to_string())
}

/// Text after a heading marker, if the line is that heading.
///
/// A bare marker counts as a heading with no text.
#[inline]
fn heading_text<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    if line == marker {
        return Some("");
    }
    line.strip_prefix(marker)?.strip_prefix(' ')
}

/// Remove up to two leading spaces from a list continuation line.
#[inline]
fn strip_continuation_indent(line: &str) -> &str {
    let line = line.strip_prefix(' ').unwrap_or(line);
    line.strip_prefix(' ').unwrap_or(line)
}

/// Tokenize changelog text.
///
/// Leading whitespace of the whole input is skipped; line numbers still
/// count the skipped lines. Consecutive paragraph lines merge into one
/// paragraph token, and a
/// paragraph line directly after a list item becomes a continuation line of
/// that item. Leading and trailing blank content lines are trimmed from every
/// token; tokens left without content are dropped.
///
/// # Example
///
/// ```rust
/// use kacl_core::lexer::tokenize;
/// use kacl_core::TokenKind;
///
/// let tokens = tokenize("# Changelog\n\n- one\n  wrapped\n");
/// assert_eq!(tokens.len(), 2);
/// assert_eq!(tokens[1].kind, TokenKind::ListItem);
/// assert_eq!(tokens[1].text(), "one\nwrapped");
/// ```
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::with_capacity(64);
    let mut current: Option<Token> = None;
    let mut line_count = 0;

    let mut at_start = true;

    for line in Lines::new(text) {
        line_count = line.number;

        // Whitespace before the first content is not part of the document.
        let text = if at_start {
            let trimmed = line.text.trim_start();
            if trimmed.is_empty() {
                continue;
            }
            at_start = false;
            trimmed
        } else {
            line.text
        };
        let (kind, content) = classify(text);

        if let Some(token) = current.as_mut() {
            if kind == TokenKind::Paragraph {
                match token.kind {
                    TokenKind::Paragraph => {
                        token.push_line(line.number, content);
                        continue;
                    }
                    TokenKind::ListItem => {
                        let continuation = strip_continuation_indent(&content).to_string();
                        token.push_line(line.number, continuation);
                        continue;
                    }
                    _ => {}
                }
            }
        }

        tokens.extend(current.take().and_then(finish));
        current = Some(Token::new(kind, line.number, content));
    }
    tokens.extend(current.and_then(finish));

    tracing::debug!(lines = line_count, tokens = tokens.len(), "tokenized");
    tokens
}

/// Trim blank content lines from both ends of a token.
///
/// Returns `None` when nothing is left.
fn finish(mut token: Token) -> Option<Token> {
    let leading = token
        .content
        .iter()
        .take_while(|s| s.trim().is_empty())
        .count();
    if leading == token.content.len() {
        tracing::trace!(line = token.line(), kind = %token.kind, "dropped empty token");
        return None;
    }
    let trailing = token
        .content
        .iter()
        .rev()
        .take_while(|s| s.trim().is_empty())
        .count();

    token.content.truncate(token.content.len() - trailing);
    token.content.drain(..leading);
    token.span.start += leading;
    token.span.end -= trailing;

    tracing::trace!(span = %token.span, kind = %token.kind, "token");
    Some(token)
}
