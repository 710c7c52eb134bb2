use std::fmt;

use thiserror::Error;

/// Error kinds for categorizing parse errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A required token was absent, or the input ended where structure
    /// was expected.
    MissingRequiredToken,
    /// A level-two heading fit none of the release heading shapes.
    InvalidReleaseHeader,
    /// Tokens remained after the grammar was satisfied.
    UnexpectedTrailingContent,
}

/// Where in the source a parse error was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// The line of the token being processed.
    Line(usize),
    /// Every token was consumed. Carries the line of the last token, if
    /// the input had any.
    EndOfInput { last_line: Option<usize> },
}

impl Location {
    /// Best line number to point a reader at.
    pub fn line(&self) -> Option<usize> {
        match *self {
            Location::Line(line) => Some(line),
            Location::EndOfInput { last_line } => last_line,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Line(line) => write!(f, "line {}", line),
            Location::EndOfInput {
                last_line: Some(line),
            } => write!(f, "end of input (after line {})", line),
            Location::EndOfInput { last_line: None } => f.write_str("end of input"),
        }
    }
}

/// A parse failure. Parsing stops at the first one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at {location}")]
pub struct ParseError {
    /// Human-readable error message
    pub message: String,
    /// Error categorization
    pub kind: ParseErrorKind,
    /// Source location where the error occurred
    pub location: Location,
}

impl ParseError {
    /// Create a new parse error.
    pub fn new(kind: ParseErrorKind, message: impl Into<String>, location: Location) -> Self {
        Self {
            message: message.into(),
            kind,
            location,
        }
    }

    /// Line number of the failure, when one is known.
    pub fn line(&self) -> Option<usize> {
        self.location.line()
    }
}
