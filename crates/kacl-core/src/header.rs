//! Release header classification.
//!
//! A level-two heading introduces a release. Three shapes are accepted:
//!
//! - `## [1.0.0] - 2024-01-15` (brackets optional): a dated release
//! - `## [2.0.0] - Unreleased`: a labelled, not yet released version
//! - any header mentioning `unreleased`: the bare unreleased section
//!
//! Shapes are tried in that order. Anything else is rejected.

use once_cell::sync::Lazy;
use regex::Regex;

static DATED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\[?([^\]]+)\]?\s*-\s*(\d{4}-\d{1,2}-\d{1,2})$").expect("dated header pattern")
});

static LABELED_UNRELEASED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\[?([^\]]+)\]?\s*-\s*unreleased$").expect("unreleased header pattern")
});

/// The shape of a release heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseHeader {
    /// A released version with its date.
    Dated { version: String, date: String },
    /// A version label marked as unreleased.
    LabeledUnreleased { version: String },
    /// The unreleased section without a version.
    Unreleased,
}

impl ReleaseHeader {
    /// Version label, if the header carries one.
    pub fn version(&self) -> Option<&str> {
        match self {
            ReleaseHeader::Dated { version, .. } | ReleaseHeader::LabeledUnreleased { version } => {
                Some(version)
            }
            ReleaseHeader::Unreleased => None,
        }
    }

    /// Release date, if the header carries one.
    pub fn date(&self) -> Option<&str> {
        match self {
            ReleaseHeader::Dated { date, .. } => Some(date),
            _ => None,
        }
    }

    /// True for both unreleased shapes.
    pub fn is_unreleased(&self) -> bool {
        !matches!(self, ReleaseHeader::Dated { .. })
    }

    /// Split into `(version, date)`.
    pub fn into_parts(self) -> (Option<String>, Option<String>) {
        match self {
            ReleaseHeader::Dated { version, date } => (Some(version), Some(date)),
            ReleaseHeader::LabeledUnreleased { version } => (Some(version), None),
            ReleaseHeader::Unreleased => (None, None),
        }
    }
}

/// Classify the text of a release heading.
///
/// Matching ignores case; captured labels keep the case they were written
/// in. Returns `None` when the text fits no release shape.
///
/// Dates are checked for shape only (`YYYY-M-D` with one or two digit month
/// and day), not for calendar validity.
pub fn classify_release_header(text: &str) -> Option<ReleaseHeader> {
    let text = text.trim();

    if let Some(caps) = DATED.captures(text) {
        return Some(ReleaseHeader::Dated {
            version: caps[1].trim().to_string(),
            date: caps[2].to_string(),
        });
    }

    if !text.to_lowercase().contains("unreleased") {
        return None;
    }

    match LABELED_UNRELEASED.captures(text) {
        Some(caps) => Some(ReleaseHeader::LabeledUnreleased {
            version: caps[1].trim().to_string(),
        }),
        None => Some(ReleaseHeader::Unreleased),
    }
}
