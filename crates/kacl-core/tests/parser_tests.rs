//! Integration tests for the changelog parser

use kacl_core::lexer::tokenize;
use kacl_core::{parse, Location, ParseErrorKind, Parser, ReleaseRecord};

const FULL_CHANGELOG: &str = r#"<!-- generated -->
# Changelog
All notable changes to this project will be documented in this file.

The format is based on Keep a Changelog.

## [Unreleased]
Work in progress.

### Added
- Dark mode

## [1.1.0] - 2024-02-03
### Added
- Export to CSV
- Import from CSV,
  including quoted fields

### Fixed
- Crash on empty input

### Added
- Late addition

## [1.0.0] - 2024-01-15
### Added
- Initial release

[Unreleased]: https://github.com/acme/widget/compare/v1.1.0...HEAD
[1.1.0]: https://github.com/acme/widget/compare/v1.0.0...v1.1.0
[1.0.0]: https://github.com/acme/widget/releases/tag/v1.0.0

---
Maintained by the widget team.
"#;

// ============================================================================
// Document Structure
// ============================================================================

#[test]
fn test_parse_minimal_release() {
    let doc = parse("# Title\n\n## 1.0.0 - 2024-01-15\n\n### Added\n- Thing one\n- Thing two\n")
        .unwrap();

    assert_eq!(doc.title(), "Title");
    assert_eq!(doc.releases().len(), 1);

    let release = &doc.releases()[0];
    assert_eq!(release.version(), Some("1.0.0"));
    assert_eq!(release.date(), Some("2024-01-15"));
    assert_eq!(release.changes("added"), ["Thing one", "Thing two"]);
}

#[test]
fn test_parse_full_changelog() {
    let doc = parse(FULL_CHANGELOG).unwrap();

    assert_eq!(doc.flag(), Some("generated"));
    assert_eq!(doc.title(), "Changelog");
    assert_eq!(
        doc.description(),
        Some(
            "All notable changes to this project will be documented in this file.\n\nThe format is based on Keep a Changelog."
        )
    );
    assert_eq!(doc.url(), Some("https://github.com/acme/widget"));
    assert_eq!(doc.footer(), Some("Maintained by the widget team."));

    let versions: Vec<_> = doc.releases().iter().map(|r| r.version()).collect();
    assert_eq!(versions, vec![None, Some("1.1.0"), Some("1.0.0")]);

    let unreleased = &doc.releases()[0];
    assert!(unreleased.is_unreleased());
    assert_eq!(unreleased.description(), Some("Work in progress."));
    assert_eq!(unreleased.changes("added"), ["Dark mode"]);

    let minor = &doc.releases()[1];
    assert_eq!(minor.description(), None);
    assert_eq!(
        minor.changes("added"),
        [
            "Export to CSV",
            "Import from CSV,\nincluding quoted fields",
            "Late addition"
        ]
    );
    assert_eq!(minor.changes("fixed"), ["Crash on empty input"]);
    assert_eq!(minor.change_types().collect::<Vec<_>>(), ["added", "fixed"]);

    assert_eq!(doc.change_count(), 6);
    assert_eq!(doc.latest().and_then(|r| r.version()), Some("1.1.0"));
}

#[test]
fn test_title_only() {
    let doc = parse("# Just a title").unwrap();
    assert_eq!(doc.title(), "Just a title");
    assert!(doc.releases().is_empty());
    assert_eq!(doc.flag(), None);
    assert_eq!(doc.description(), None);
    assert_eq!(doc.url(), None);
    assert_eq!(doc.footer(), None);
}

#[test]
fn test_leading_input_whitespace_is_ignored() {
    let doc = parse("  # Title\n\n## 1.0.0 - 2024-01-15\n### Added\n- a\n").unwrap();
    assert_eq!(doc.title(), "Title");
    assert_eq!(doc.releases()[0].changes("added"), ["a"]);

    let doc = parse("\n\n\t# Title\n## Unreleased\n").unwrap();
    assert_eq!(doc.title(), "Title");
    assert!(doc.releases()[0].is_unreleased());
}

#[test]
fn test_errors_after_leading_whitespace_keep_source_lines() {
    let err = parse("\n\n# Title\n## bogus\n").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::InvalidReleaseHeader);
    assert_eq!(err.location, Location::Line(4));
}

#[test]
fn test_change_type_is_lowercased() {
    let doc = parse("# T\n## 1.0 - 2024-1-2\n### SECURITY Fixes\n- patched\n").unwrap();
    assert_eq!(doc.releases()[0].changes("security fixes"), ["patched"]);
    assert_eq!(doc.releases()[0].date(), Some("2024-1-2"));
}

#[test]
fn test_empty_change_section_records_nothing() {
    let doc = parse("# T\n## Unreleased\n### Added\n### Removed\n- old api\n").unwrap();
    let release = &doc.releases()[0];
    assert!(release.changes("added").is_empty());
    assert_eq!(release.changes("removed"), ["old api"]);
    assert_eq!(release.change_types().collect::<Vec<_>>(), ["removed"]);
}

#[test]
fn test_duplicate_versions_are_kept() {
    let doc = parse("# T\n## 1.0 - 2024-01-01\n## 1.0 - 2024-01-02\n").unwrap();
    assert_eq!(doc.releases().len(), 2);
    assert_eq!(doc.release("1.0").and_then(|r| r.date()), Some("2024-01-01"));
}

// ============================================================================
// Release Headers
// ============================================================================

#[test]
fn test_bare_unreleased() {
    let doc = parse("# Title\n\n## Unreleased\n").unwrap();
    let release = &doc.releases()[0];
    assert_eq!(release.version(), None);
    assert_eq!(release.date(), None);
}

#[test]
fn test_labeled_unreleased() {
    let doc = parse("# Title\n\n## v2 - unreleased\n").unwrap();
    let release = &doc.releases()[0];
    assert_eq!(release.version(), Some("v2"));
    assert_eq!(release.date(), None);
}

#[test]
fn test_invalid_release_header() {
    let err = parse("# Title\n\n## not a valid header\n").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::InvalidReleaseHeader);
    assert_eq!(err.location, Location::Line(3));
    assert!(err.to_string().contains("not a valid header"));
}

// ============================================================================
// Reference Links
// ============================================================================

#[test]
fn test_first_compare_link_wins() {
    let input = "# T\n\n## Unreleased\n\n\
[Unreleased]: https://example.com/a/releases/tag/v1\n\
[1.0.0]: https://example.com/b/compare/v0.9...v1.0\n\
[0.9.0]: https://example.com/c/compare/v0.8...v0.9\n\
[0.8.0]: https://example.com/d/releases/tag/v0.8\n";
    let doc = parse(input).unwrap();
    assert_eq!(doc.url(), Some("https://example.com/b"));
}

#[test]
fn test_reference_links_without_compare_leave_url_unset() {
    let doc = parse("# T\n[home]: https://example.com\n").unwrap();
    assert_eq!(doc.url(), None);
}

// ============================================================================
// Footer
// ============================================================================

#[test]
fn test_footer_after_rule() {
    let doc = parse("# T\n---\nFooter text\nspanning lines\n").unwrap();
    assert_eq!(doc.footer(), Some("Footer text\nspanning lines"));
}

#[test]
fn test_rule_without_footer_fails() {
    let err = parse("# T\n\n---\n").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::MissingRequiredToken);
    assert_eq!(err.location, Location::EndOfInput { last_line: Some(3) });
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_missing_title() {
    let err = parse("Some text\n\n## 1.0.0 - 2024-01-15\n").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::MissingRequiredToken);
    assert_eq!(err.location, Location::Line(1));
    assert!(err.to_string().ends_with("at line 1"));
}

#[test]
fn test_missing_title_on_empty_input() {
    let err = parse("").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::MissingRequiredToken);
    assert_eq!(err.location, Location::EndOfInput { last_line: None });
    assert!(err.to_string().ends_with("at end of input"));
}

#[test]
fn test_flag_without_title() {
    let err = parse("<!-- draft -->\n").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::MissingRequiredToken);
    assert_eq!(err.location, Location::EndOfInput { last_line: Some(1) });
}

#[test]
fn test_trailing_content_after_footer() {
    let err = parse("# T\n---\nFooter\n## 1.0 - 2024-01-01\n").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::UnexpectedTrailingContent);
    assert_eq!(err.location, Location::Line(4));
    assert!(err.message.contains("h2 (line 4)"));
}

#[test]
fn test_list_item_outside_section_is_trailing() {
    let err = parse("# T\n## Unreleased\n- orphan\n").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::UnexpectedTrailingContent);
    assert_eq!(err.line(), Some(3));
}

#[test]
fn test_second_title_is_trailing() {
    let err = parse("# One\n# Two\n").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::UnexpectedTrailingContent);
}

// ============================================================================
// Release Builders
// ============================================================================

#[derive(Debug, Default)]
struct Flat {
    label: String,
    entries: Vec<String>,
}

impl ReleaseRecord for Flat {
    fn add_change(&mut self, change_type: &str, entry: String) {
        self.entries.push(format!("{}: {}", change_type, entry));
    }
}

#[test]
fn test_closure_builder() {
    let mut built = 0;
    let mut parser = Parser::with_builder(
        |version: Option<String>, date: Option<String>, description: Option<String>| {
            built += 1;
            Flat {
                label: format!(
                    "{}@{}{}",
                    version.unwrap_or_default(),
                    date.unwrap_or_else(|| "next".to_string()),
                    description.map(|d| format!(" ({})", d)).unwrap_or_default()
                ),
                entries: Vec::new(),
            }
        },
    );

    let doc = parser
        .parse("# T\n## Unreleased\nSoon.\n### Fixed\n- a\n## 1.0 - 2024-01-01\n### Added\n- b\n")
        .unwrap();
    drop(parser);

    assert_eq!(built, 2);
    let releases = doc.releases();
    assert_eq!(releases[0].label, "@next (Soon.)");
    assert_eq!(releases[0].entries, vec!["fixed: a"]);
    assert_eq!(releases[1].label, "1.0@2024-01-01");
    assert_eq!(releases[1].entries, vec!["added: b"]);
}

#[test]
fn test_parse_tokens_reuses_tokenization() {
    let tokens = tokenize(FULL_CHANGELOG);
    let first = Parser::new().parse_tokens(&tokens).unwrap();
    let second = Parser::new().parse_tokens(&tokens).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.releases().len(), 3);
}
