//! Changelog parsing engine for keepsake.
//!
//! Parses "Keep a Changelog"-style documents into a validated model in which
//! every construct records its exact byte range in the original source, so
//! release tooling can splice edits into the text it was given instead of
//! reserializing the document.

pub mod model;
pub mod parse;
pub mod tokenize;

// Re-export key types for easier usage
pub use model::{
    Changelog, Item, Offset, Release, ReleaseMeta, Section, SectionFragment, SectionName,
};
pub use parse::{
    ErrorKind, ParseError, parse_changelog, parse_changelog_fragment,
    parse_changelog_fragment_with, parse_changelog_with,
};
pub use tokenize::{
    BlockKind, BlockNode, CmarkTokenizer, ListItemNode, SourcePos, SourceSpan, Tokenizer,
};
