//! Changelog grammar.
//!
//! Walks the token stream front to back under a fixed grammar:
//!
//! ```text
//! document  := flag? H1 paragraph? release* link* (rule paragraph)?
//! release   := H2 paragraph? section*
//! section   := H3 list-item*
//! ```
//!
//! There is no backtracking and no recovery. The first mismatch ends the
//! parse with a [`ParseError`] and nothing else is returned.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::builder::{DefaultReleaseBuilder, ReleaseBuilder, ReleaseRecord};
use crate::error::{Location, ParseError, ParseErrorKind};
use crate::header::classify_release_header;
use crate::lexer::tokenize;
use crate::model::Document;
use crate::token::{Token, TokenKind};

static COMPARE_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\[.*\]:\s*(http.*)/compare/.*$").expect("compare link pattern")
});

/// Read position over an immutable token slice.
///
/// Consuming a token only advances the index, so the same tokenization can
/// be walked again or shared between readers.
#[derive(Debug, Clone)]
pub struct TokenCursor<'t> {
    tokens: &'t [Token],
    pos: usize,
}

impl<'t> TokenCursor<'t> {
    #[inline]
    pub fn new(tokens: &'t [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    /// The token at the front, if any.
    #[inline]
    pub fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.pos)
    }

    /// Consume the front token if it is of `kind`.
    #[inline]
    pub fn take(&mut self, kind: TokenKind) -> Option<&'t Token> {
        let token = self.peek().filter(|t| t.kind == kind)?;
        self.pos += 1;
        Some(token)
    }

    /// Consume the front token, failing unless it is of `kind`.
    ///
    /// `what` names the expected element in the error message.
    pub fn expect(&mut self, kind: TokenKind, what: &str) -> Result<&'t Token, ParseError> {
        if let Some(token) = self.take(kind) {
            return Ok(token);
        }
        let message = match self.peek() {
            Some(found) => format!("expected {} ({}), found {}", what, kind, found.kind),
            None => format!("expected {} ({})", what, kind),
        };
        Err(self.error(ParseErrorKind::MissingRequiredToken, message))
    }

    /// Tokens not yet consumed.
    #[inline]
    pub fn remaining(&self) -> &'t [Token] {
        &self.tokens[self.pos..]
    }

    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Index of the front token.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Location of the front token, or end of input.
    pub fn location(&self) -> Location {
        match self.peek() {
            Some(token) => Location::Line(token.line()),
            None => Location::EndOfInput {
                last_line: self.tokens.last().map(|t| t.span.end),
            },
        }
    }

    /// Build an error located at the front token.
    pub fn error(&self, kind: ParseErrorKind, message: impl Into<String>) -> ParseError {
        ParseError::new(kind, message, self.location())
    }
}

/// Changelog parser.
///
/// Releases are built through the parser's [`ReleaseBuilder`]; the default
/// produces [`Release`](crate::model::Release) records.
///
/// # Example
///
/// ```rust
/// use kacl_core::Parser;
///
/// let doc = Parser::new()
///     .parse("# Changelog\n\n## 1.0.0 - 2024-01-15\n### Added\n- First release\n")
///     .unwrap();
/// assert_eq!(doc.releases()[0].changes("added"), ["First release"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Parser<B = DefaultReleaseBuilder> {
    builder: B,
}

impl Parser<DefaultReleaseBuilder> {
    /// Create a parser producing the default release type.
    #[inline]
    pub fn new() -> Self {
        Self {
            builder: DefaultReleaseBuilder,
        }
    }
}

impl<B: ReleaseBuilder> Parser<B> {
    /// Create a parser that builds releases through `builder`.
    pub fn with_builder(builder: B) -> Self {
        Self { builder }
    }

    /// Tokenize and parse changelog text.
    pub fn parse(&mut self, input: &str) -> Result<Document<B::Release>, ParseError> {
        let tokens = tokenize(input);
        self.parse_tokens(&tokens)
    }

    /// Parse an already tokenized changelog.
    pub fn parse_tokens(&mut self, tokens: &[Token]) -> Result<Document<B::Release>, ParseError> {
        let _span = tracing::debug_span!("parse", tokens = tokens.len()).entered();
        let mut cursor = TokenCursor::new(tokens);

        let result = self.parse_document(&mut cursor);
        if let Err(err) = &result {
            tracing::debug!(kind = ?err.kind, location = %err.location, "parse failed");
        }
        result
    }

    fn parse_document(
        &mut self,
        cursor: &mut TokenCursor<'_>,
    ) -> Result<Document<B::Release>, ParseError> {
        let flag = cursor.take(TokenKind::Flag).map(Token::text);
        let title = cursor.expect(TokenKind::H1, "document title")?.text();

        let mut doc = Document::new(title);
        if let Some(flag) = flag {
            doc.set_flag(flag);
        }
        if let Some(description) = cursor.take(TokenKind::Paragraph) {
            doc.set_description(description.text());
        }

        self.parse_releases(cursor, &mut doc)?;
        parse_links(cursor, &mut doc);
        parse_footer(cursor, &mut doc)?;

        if !cursor.is_exhausted() {
            let leftover = cursor
                .remaining()
                .iter()
                .map(|t| format!("{} (line {})", t.kind, t.line()))
                .collect::<Vec<_>>()
                .join(", ");
            return Err(cursor.error(
                ParseErrorKind::UnexpectedTrailingContent,
                format!("unexpected content after changelog: {}", leftover),
            ));
        }

        Ok(doc)
    }

    fn parse_releases(
        &mut self,
        cursor: &mut TokenCursor<'_>,
        doc: &mut Document<B::Release>,
    ) -> Result<(), ParseError> {
        while let Some(heading) = cursor.take(TokenKind::H2) {
            let text = heading.text();
            let header = classify_release_header(&text).ok_or_else(|| {
                ParseError::new(
                    ParseErrorKind::InvalidReleaseHeader,
                    format!("invalid release header {:?}", text),
                    Location::Line(heading.line()),
                )
            })?;
            tracing::debug!(line = heading.line(), header = ?header, "release");

            let description = cursor.take(TokenKind::Paragraph).map(Token::text);
            let (version, date) = header.into_parts();
            let mut release = self.builder.build_release(version, date, description);

            while let Some(section) = cursor.take(TokenKind::H3) {
                let change_type = section.text().to_lowercase();
                tracing::trace!(line = section.line(), change_type = %change_type, "change section");
                while let Some(item) = cursor.take(TokenKind::ListItem) {
                    release.add_change(&change_type, item.text());
                }
            }

            doc.push_release(release);
        }
        Ok(())
    }
}

/// Consume reference links, keeping the first compare URL.
fn parse_links<R>(cursor: &mut TokenCursor<'_>, doc: &mut Document<R>) {
    while let Some(link) = cursor.take(TokenKind::ReferenceLink) {
        if doc.url().is_some() {
            continue;
        }
        let text = link.text();
        match COMPARE_LINK.captures(&text) {
            Some(caps) => {
                tracing::debug!(line = link.line(), url = &caps[1], "compare url");
                doc.set_url(&caps[1]);
            }
            None => tracing::trace!(line = link.line(), "ignored reference link"),
        }
    }
}

/// A horizontal rule must be followed by the footer paragraph.
fn parse_footer<R>(cursor: &mut TokenCursor<'_>, doc: &mut Document<R>) -> Result<(), ParseError> {
    if cursor.take(TokenKind::HorizontalRule).is_some() {
        let footer = cursor.expect(TokenKind::Paragraph, "footer after horizontal rule")?;
        doc.set_footer(footer.text());
    }
    Ok(())
}
