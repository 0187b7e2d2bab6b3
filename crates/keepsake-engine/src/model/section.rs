use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::Offset;

/// The fixed vocabulary of changelog section names.
///
/// Variants are declared in canonical order, so the derived `Ord` and
/// `canonical_index` agree: sections inside a release must appear as a
/// strictly increasing subsequence of this order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum SectionName {
    Added,
    Improved,
    Changed,
    Deprecated,
    Removed,
    Fixed,
    Security,
}

impl SectionName {
    /// All section names in canonical order.
    pub const CANONICAL: [SectionName; 7] = [
        SectionName::Added,
        SectionName::Improved,
        SectionName::Changed,
        SectionName::Deprecated,
        SectionName::Removed,
        SectionName::Fixed,
        SectionName::Security,
    ];

    /// Position of this name in the canonical order.
    pub fn canonical_index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SectionName::Added => "Added",
            SectionName::Improved => "Improved",
            SectionName::Changed => "Changed",
            SectionName::Deprecated => "Deprecated",
            SectionName::Removed => "Removed",
            SectionName::Fixed => "Fixed",
            SectionName::Security => "Security",
        }
    }
}

impl fmt::Display for SectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for a heading that names no canonical section.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown section name {0:?}")]
pub struct UnknownSectionName(pub String);

impl FromStr for SectionName {
    type Err = UnknownSectionName;

    /// Exact match only; casing and surrounding text are significant.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SectionName::CANONICAL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| UnknownSectionName(s.to_string()))
    }
}

/// One bullet-list entry within a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Byte range of the item's full lines.
    pub offset: Offset,
    /// Ticket reference extracted from a trailing `#PROJECT-1234` suffix.
    pub ticket: Option<String>,
}

/// A named bullet list within a release, e.g. `### Fixed` and its items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Byte range spanning the header and the list.
    pub offset: Offset,
    /// Byte range of the `### <Name>` heading's lines.
    pub header: Offset,
    /// Byte range of the bullet list's lines.
    pub list: Offset,
    /// Items in document order.
    pub items: Vec<Item>,
}
