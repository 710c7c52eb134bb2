//! Release construction capability.
//!
//! The grammar never constructs releases itself. It asks a
//! [`ReleaseBuilder`] for a new record whenever it reads a release heading,
//! then feeds change entries into that record through [`ReleaseRecord`].
//! Callers wanting their own release type implement both traits (or pass a
//! closure) and hand the builder to [`Parser::with_builder`].
//!
//! [`Parser::with_builder`]: crate::parser::Parser::with_builder

use crate::model::Release;

/// A release representation the grammar can add change entries to.
pub trait ReleaseRecord {
    /// Append `entry` under `change_type`, keeping insertion order.
    fn add_change(&mut self, change_type: &str, entry: String);
}

/// Constructs release records for the grammar.
pub trait ReleaseBuilder {
    type Release: ReleaseRecord;

    /// Build a release from its heading and description.
    ///
    /// `version` and `date` are both `None` for the bare unreleased section.
    fn build_release(
        &mut self,
        version: Option<String>,
        date: Option<String>,
        description: Option<String>,
    ) -> Self::Release;
}

/// Builds the crate's own [`Release`] type.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultReleaseBuilder;

impl ReleaseBuilder for DefaultReleaseBuilder {
    type Release = Release;

    fn build_release(
        &mut self,
        version: Option<String>,
        date: Option<String>,
        description: Option<String>,
    ) -> Release {
        Release::new(version, date, description)
    }
}

impl<F, R> ReleaseBuilder for F
where
    F: FnMut(Option<String>, Option<String>, Option<String>) -> R,
    R: ReleaseRecord,
{
    type Release = R;

    fn build_release(
        &mut self,
        version: Option<String>,
        date: Option<String>,
        description: Option<String>,
    ) -> R {
        self(version, date, description)
    }
}
