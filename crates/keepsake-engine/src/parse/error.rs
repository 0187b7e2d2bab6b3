//! Validation failures as plain values.
//!
//! Errors are accumulated into a `Vec<ParseError>` wherever sibling
//! constructs are independently checkable, so one parse surfaces as many
//! problems as possible. Nothing here panics; callers decide what is fatal.

use std::fmt;

use crate::model::SectionName;
use crate::tokenize::SourcePos;

/// What went wrong, with the message text each kind renders to.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorKind {
    #[error("No top level heading")]
    NoTopLevelHeading,
    #[error("Expected top level heading \"# Changelog\"")]
    ExpectedTopLevelHeading,
    #[error("Duplicate top level heading")]
    DuplicateTopLevelHeading,
    #[error("Unexpected content before any heading")]
    ContentBeforeHeading,
    #[error("Expected section of text")]
    ExpectedSectionOfText,

    #[error("Expected release heading of level 2, got level {found}")]
    ReleaseHeadingLevel { found: u8 },
    #[error("Expected \"Unreleased\" or \"<major>.<minor>.<patch> - <yyyy-mm-dd>\", got {found:?}")]
    ReleaseHeaderFormat { found: String },
    #[error("\"Unreleased\" must be the first release")]
    UnreleasedNotFirst,
    #[error("Mismatched brackets around {found:?}")]
    MismatchedBrackets { found: String },
    #[error("Invalid release version {found:?}, expected \"<major>.<minor>.<patch>\"")]
    InvalidVersion { found: String },
    #[error("Invalid release date {found:?}, expected \"yyyy-mm-dd\"")]
    InvalidDate { found: String },
    #[error("Unexpected content under release heading")]
    ContentInRelease,

    #[error("Expected section heading of level 3, got level {found}")]
    SectionHeadingLevel { found: u8 },
    #[error(
        "Unknown section {found:?}, expected one of Added, Improved, Changed, Deprecated, Removed, Fixed, Security"
    )]
    UnknownSection { found: String },
    #[error(
        "Section \"{name}\" out of order, expected order Added, Improved, Changed, Deprecated, Removed, Fixed, Security"
    )]
    SectionOutOfOrder { name: SectionName },
    #[error("Duplicate section \"{name}\"")]
    DuplicateSection { name: SectionName },
    #[error("Expected a single bullet list under section heading")]
    ExpectedBulletList,
    #[error("Unexpected subheading under section heading")]
    SubheadingInSection,
}

/// A single validation failure, locatable when the originating node is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ErrorKind,
    pub position: Option<SourcePos>,
}

impl ParseError {
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, position: None }
    }

    pub fn at(kind: ErrorKind, position: SourcePos) -> Self {
        Self { kind, position: Some(position) }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(pos) = self.position {
            write!(f, " (line: {} column: {})", pos.line, pos.column)?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn renders_without_position() {
        let err = ParseError::new(ErrorKind::NoTopLevelHeading);
        assert_eq!(err.to_string(), "No top level heading");
    }

    #[test]
    fn renders_position_suffix() {
        let err = ParseError::at(ErrorKind::ExpectedSectionOfText, SourcePos::new(1, 1));
        assert_eq!(err.to_string(), "Expected section of text (line: 1 column: 1)");
    }

    #[test]
    fn ordering_error_names_the_canonical_order() {
        let err = ParseError::new(ErrorKind::SectionOutOfOrder { name: SectionName::Added });
        assert_eq!(
            err.to_string(),
            "Section \"Added\" out of order, expected order Added, Improved, Changed, Deprecated, Removed, Fixed, Security"
        );
    }
}
