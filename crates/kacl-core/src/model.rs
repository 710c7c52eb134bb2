//! Changelog document model.
//!
//! A [`Document`] is the parsed form of a changelog: a title, optional
//! flag, description, compare URL and footer, plus the releases in the order
//! they appear. Each [`Release`] groups its change entries by change type.

use crate::builder::ReleaseRecord;

/// A parsed changelog.
///
/// Generic over the release representation so custom
/// [`ReleaseBuilder`](crate::builder::ReleaseBuilder)s can supply their own
/// type. The default is [`Release`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document<R = Release> {
    flag: Option<String>,
    title: String,
    description: Option<String>,
    releases: Vec<R>,
    url: Option<String>,
    footer: Option<String>,
}

impl<R> Document<R> {
    /// Create an empty document with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            flag: None,
            title: title.into(),
            description: None,
            releases: Vec::new(),
            url: None,
            footer: None,
        }
    }

    /// Text of the leading `<!-- ... -->` annotation.
    pub fn flag(&self) -> Option<&str> {
        self.flag.as_deref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Paragraph between the title and the first release.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Releases in document order.
    pub fn releases(&self) -> &[R] {
        &self.releases
    }

    /// Repository URL taken from the first compare link.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Paragraph after the closing horizontal rule.
    pub fn footer(&self) -> Option<&str> {
        self.footer.as_deref()
    }

    pub fn set_flag(&mut self, flag: impl Into<String>) {
        self.flag = Some(flag.into());
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = Some(description.into());
    }

    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = Some(url.into());
    }

    pub fn set_footer(&mut self, footer: impl Into<String>) {
        self.footer = Some(footer.into());
    }

    /// Append a release. Duplicate versions are kept.
    pub fn push_release(&mut self, release: R) {
        self.releases.push(release);
    }
}

impl Document<Release> {
    /// First release whose version equals `version`, ignoring case.
    pub fn release(&self, version: &str) -> Option<&Release> {
        self.releases.iter().find(|r| {
            r.version()
                .is_some_and(|v| v.eq_ignore_ascii_case(version))
        })
    }

    /// First release without a date.
    pub fn unreleased(&self) -> Option<&Release> {
        self.releases.iter().find(|r| r.is_unreleased())
    }

    /// First dated release, which is the latest one in a conventionally
    /// ordered changelog.
    pub fn latest(&self) -> Option<&Release> {
        self.releases.iter().find(|r| !r.is_unreleased())
    }

    /// Total number of change entries across all releases.
    pub fn change_count(&self) -> usize {
        self.releases.iter().map(Release::change_count).sum()
    }
}

/// One section of change entries sharing a change type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeGroup {
    /// Lower-cased change type, e.g. `added` or `fixed`.
    pub change_type: String,
    /// Entries in the order they were written.
    pub entries: Vec<String>,
}

/// A single release of the changelog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Release {
    version: Option<String>,
    date: Option<String>,
    description: Option<String>,
    changes: Vec<ChangeGroup>,
}

impl Release {
    pub fn new(version: Option<String>, date: Option<String>, description: Option<String>) -> Self {
        Self {
            version,
            date,
            description,
            changes: Vec::new(),
        }
    }

    /// The unreleased section with no version label.
    pub fn unreleased() -> Self {
        Self::default()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Release date as written (`YYYY-MM-DD`).
    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = Some(description.into());
    }

    /// A release without a date has not shipped yet.
    pub fn is_unreleased(&self) -> bool {
        self.date.is_none()
    }

    /// Record a change entry under `change_type`.
    ///
    /// Entries for a type that already exists are appended to that type,
    /// even when the type heading appears again later in the release.
    pub fn add_change(&mut self, change_type: &str, entry: impl Into<String>) {
        let entry = entry.into();
        match self
            .changes
            .iter_mut()
            .find(|group| group.change_type == change_type)
        {
            Some(group) => group.entries.push(entry),
            None => self.changes.push(ChangeGroup {
                change_type: change_type.to_string(),
                entries: vec![entry],
            }),
        }
    }

    /// Entries recorded under `change_type`, empty if there are none.
    pub fn changes(&self, change_type: &str) -> &[String] {
        self.changes
            .iter()
            .find(|group| group.change_type == change_type)
            .map(|group| group.entries.as_slice())
            .unwrap_or(&[])
    }

    /// Change types in first-seen order.
    pub fn change_types(&self) -> impl Iterator<Item = &str> {
        self.changes.iter().map(|group| group.change_type.as_str())
    }

    /// All change groups in first-seen order.
    pub fn change_groups(&self) -> &[ChangeGroup] {
        &self.changes
    }

    /// Iterate over `(change_type, entry)` pairs.
    pub fn iter_changes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.changes.iter().flat_map(|group| {
            group
                .entries
                .iter()
                .map(move |entry| (group.change_type.as_str(), entry.as_str()))
        })
    }

    /// Number of change entries across all types.
    pub fn change_count(&self) -> usize {
        self.changes.iter().map(|group| group.entries.len()).sum()
    }
}

impl ReleaseRecord for Release {
    fn add_change(&mut self, change_type: &str, entry: String) {
        Release::add_change(self, change_type, entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_change_type_accumulates() {
        let mut release = Release::new(Some("1.0.0".into()), None, None);
        release.add_change("added", "one");
        release.add_change("fixed", "bug");
        release.add_change("added", "two");

        assert_eq!(release.changes("added"), ["one", "two"]);
        assert_eq!(release.change_types().collect::<Vec<_>>(), ["added", "fixed"]);
        assert_eq!(release.change_count(), 3);
        assert!(release.changes("removed").is_empty());
        assert_eq!(
            release.iter_changes().collect::<Vec<_>>(),
            [("added", "one"), ("added", "two"), ("fixed", "bug")]
        );
    }

    #[test]
    fn document_queries() {
        let mut doc = Document::new("Changelog");
        doc.push_release(Release::unreleased());
        doc.push_release(Release::new(
            Some("1.1.0".into()),
            Some("2024-02-01".into()),
            None,
        ));
        doc.push_release(Release::new(
            Some("1.0.0".into()),
            Some("2024-01-01".into()),
            None,
        ));

        assert_eq!(doc.release("1.0.0").and_then(Release::date), Some("2024-01-01"));
        assert!(doc.unreleased().is_some_and(|r| r.version().is_none()));
        assert_eq!(doc.latest().and_then(Release::version), Some("1.1.0"));
        assert!(doc.release("2.0.0").is_none());
    }
}
