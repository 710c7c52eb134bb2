//! Source location tracking for tokens.
//!
//! Every token records the range of source lines it was built from.
//! Multi-line tokens (wrapped paragraphs, list items with continuation
//! lines) cover more than one line.

/// An inclusive range of 1-indexed source lines.
///
/// # Example
///
/// ```rust
/// use kacl_core::span::LineSpan;
///
/// let span = LineSpan::new(3, 5);
/// assert_eq!(span.line_count(), 3);
/// assert!(span.contains(4));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineSpan {
    /// First line (inclusive).
    pub start: usize,
    /// Last line (inclusive).
    pub end: usize,
}

impl LineSpan {
    /// Create a span from a first and last line.
    #[inline]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Create a span covering a single line.
    #[inline]
    pub const fn single(line: usize) -> Self {
        Self {
            start: line,
            end: line,
        }
    }

    /// Number of lines covered.
    #[inline]
    pub const fn line_count(&self) -> usize {
        self.end.saturating_sub(self.start) + 1
    }

    /// Check if this span contains a line.
    #[inline]
    pub const fn contains(&self, line: usize) -> bool {
        line >= self.start && line <= self.end
    }

    /// Grow the span so it ends at `line`.
    #[inline]
    pub fn extend_to(&mut self, line: usize) {
        self.end = self.end.max(line);
    }
}

impl std::fmt::Display for LineSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}
