use serde::{Deserialize, Serialize};

/// An inclusive byte range `[start, end]` into the original source string.
///
/// Every structural entity in a parsed changelog carries one of these, which
/// is what makes offset-based splicing possible: callers cut and re-join the
/// original text with the recorded ranges instead of reserializing the model.
///
/// An empty range (only the trailing `links` range can be empty) is
/// represented with `end + 1 == start`; [`Offset::is_empty`] makes that
/// explicit so callers never slice it by accident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Offset {
    /// Inclusive start byte offset.
    pub start: usize,
    /// Inclusive end byte offset.
    pub end: usize,
}

impl Offset {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns the length in bytes.
    #[must_use]
    pub fn len(self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.end - self.start + 1
        }
    }

    /// Returns true if the range covers no bytes (end < start).
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.end < self.start
    }

    /// Returns true if `other` lies entirely within this range.
    #[must_use]
    pub fn contains(self, other: Offset) -> bool {
        !other.is_empty() && self.start <= other.start && other.end <= self.end
    }

    /// Slice the source string this range was recorded against.
    ///
    /// The range is clamped to the source bounds rather than panicking, same
    /// policy as slicing a stale range against an edited buffer.
    #[must_use]
    pub fn slice(self, source: &str) -> &str {
        if self.is_empty() {
            return "";
        }
        let end = (self.end + 1).min(source.len());
        let start = self.start.min(end);
        &source[start..end]
    }
}
