//! # kacl core
//!
//! Parser for changelogs written in the "Keep a Changelog" markdown style.
//!
//! Parsing runs in two stages: [`lexer::tokenize`] classifies lines into a
//! typed token stream, then [`Parser`] walks that stream under a fixed
//! grammar and builds a [`Document`].
//!
//! ## Quick Start
//!
//! ```rust
//! let input = "# Changelog\n\n## [1.0.0] - 2024-01-15\n### Added\n- Thing one\n- Thing two\n";
//! let doc = kacl_core::parse(input).unwrap();
//!
//! let release = &doc.releases()[0];
//! assert_eq!(release.version(), Some("1.0.0"));
//! assert_eq!(release.changes("added"), ["Thing one", "Thing two"]);
//! ```
//!
//! ## Custom release types
//!
//! ```rust
//! use kacl_core::{Parser, ReleaseRecord};
//!
//! struct Counted {
//!     version: Option<String>,
//!     entries: usize,
//! }
//!
//! impl ReleaseRecord for Counted {
//!     fn add_change(&mut self, _change_type: &str, _entry: String) {
//!         self.entries += 1;
//!     }
//! }
//!
//! let mut parser = Parser::with_builder(
//!     |version: Option<String>, _date: Option<String>, _description: Option<String>| Counted {
//!         version,
//!         entries: 0,
//!     },
//! );
//! let doc = parser.parse("# Log\n## Unreleased\n### Fixed\n- a\n- b\n").unwrap();
//! assert_eq!(doc.releases()[0].entries, 2);
//! assert!(doc.releases()[0].version.is_none());
//! ```
//!
//! Errors carry the line of the token being processed; see [`ParseError`].

pub mod builder;
pub mod error;
pub mod header;
pub mod lexer;
pub mod model;
pub mod parser;
pub mod span;
pub mod token;

pub use builder::{DefaultReleaseBuilder, ReleaseBuilder, ReleaseRecord};
pub use error::{Location, ParseError, ParseErrorKind};
pub use header::{classify_release_header, ReleaseHeader};
pub use model::{ChangeGroup, Document, Release};
pub use parser::{Parser, TokenCursor};
pub use token::{Token, TokenKind};

/// Parse changelog text into the default document model.
pub fn parse(input: &str) -> Result<Document, ParseError> {
    Parser::new().parse(input)
}
