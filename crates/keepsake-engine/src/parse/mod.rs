//! The changelog parsing pipeline.
//!
//! Data flows strictly upward: [`position::LineIndex`] translates tokenizer
//! positions to byte offsets, [`outline::Outline`] groups blocks under their
//! headings, the section and release parsers validate each construct, and
//! the assembler in this module produces the final [`Changelog`]. Parsing is
//! pure: one pass over an immutable string, errors as values, never a panic.

pub mod error;
pub mod outline;
pub mod position;

mod release;
mod section;

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::model::{Changelog, Offset, SectionFragment};
use crate::tokenize::{CmarkTokenizer, Tokenizer};

pub use error::{ErrorKind, ParseError};

use outline::Outline;
use position::LineIndex;
use section::SectionCursor;

/// The top heading must name the document a changelog, give or take
/// spelling: `Changelog`, `Change log`, `Change-log`, any casing.
static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?i)change[ -]?log$").expect("title pattern"));

/// Parse a complete changelog document with the default markdown tokenizer.
pub fn parse_changelog(source: &str) -> Result<Changelog, Vec<ParseError>> {
    parse_changelog_with(&CmarkTokenizer, source)
}

/// Parse a complete changelog document with a caller-supplied tokenizer.
pub fn parse_changelog_with(
    tokenizer: &dyn Tokenizer,
    source: &str,
) -> Result<Changelog, Vec<ParseError>> {
    let index = LineIndex::new(source);
    let outline = Outline::build(tokenizer.tokenize(source));
    let root = outline.root();
    let mut errors = Vec::new();

    // Changelogs must begin with a heading.
    if let Some(block) = root.content.first() {
        errors.push(ParseError::at(
            ErrorKind::ContentBeforeHeading,
            block.span.start,
        ));
    }

    let mut top = None;
    for &child in &root.children {
        let Some((depth, _, span)) = outline.node(child).heading_parts() else {
            unreachable!("outline children always carry a heading");
        };
        if depth != 1 {
            errors.push(ParseError::at(ErrorKind::ExpectedTopLevelHeading, span.start));
        } else if top.is_none() {
            top = Some((child, span));
        } else {
            errors.push(ParseError::at(ErrorKind::DuplicateTopLevelHeading, span.start));
        }
    }

    let Some((top_id, top_span)) = top else {
        if root.children.is_empty() {
            errors.push(ParseError::new(ErrorKind::NoTopLevelHeading));
        }
        return Err(errors);
    };

    let top_node = outline.node(top_id);
    let title = top_node
        .heading_parts()
        .map(|(_, text, _)| text)
        .unwrap_or_default();
    if !TITLE_RE.is_match(title.trim()) {
        errors.push(ParseError::at(ErrorKind::ExpectedTopLevelHeading, top_span.start));
    }

    // A changelog without a blurb between the title and the first release
    // is rejected; the preamble is never empty.
    if top_node.content.is_empty() {
        errors.push(ParseError::at(ErrorKind::ExpectedSectionOfText, top_span.start));
    }

    let mut releases = Vec::new();
    for (i, &child) in top_node.children.iter().enumerate() {
        match release::parse_release(&outline, child, i == 0, &index) {
            Ok(release) => releases.push(release),
            Err(release_errors) => errors.extend(release_errors),
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    let len = source.len();
    let preamble = match releases.first() {
        Some(first) => Offset::new(0, first.offset.start.saturating_sub(1)),
        None => {
            let end = match top_node.content.last() {
                Some(block) => index.block_range(block.span).end,
                None => index.block_range(top_span).end,
            };
            Offset::new(0, end)
        }
    };
    let links = match releases.last() {
        Some(last) if last.offset.end + 1 < len => Offset::new(last.offset.end + 1, len - 1),
        _ => Offset::new(len, len.saturating_sub(1)),
    };

    Ok(Changelog {
        source: source.to_string(),
        releases,
        preamble,
        links,
    })
}

/// Parse a changelog fragment (a bare section list, e.g. from a pull-request
/// description) with the default markdown tokenizer.
pub fn parse_changelog_fragment(source: &str) -> Result<SectionFragment, Vec<ParseError>> {
    parse_changelog_fragment_with(&CmarkTokenizer, source)
}

/// Parse a changelog fragment with a caller-supplied tokenizer.
pub fn parse_changelog_fragment_with(
    tokenizer: &dyn Tokenizer,
    source: &str,
) -> Result<SectionFragment, Vec<ParseError>> {
    let index = LineIndex::new(source);
    let outline = Outline::build(tokenizer.tokenize(source));
    let root = outline.root();
    let mut errors = Vec::new();

    if let Some(block) = root.content.first() {
        errors.push(ParseError::at(
            ErrorKind::ContentBeforeHeading,
            block.span.start,
        ));
    }

    let mut cursor = SectionCursor::new();
    let mut sections = Vec::new();
    let mut section_map = BTreeMap::new();
    for &child in &root.children {
        match section::parse_section(&outline, child, &mut cursor, &index) {
            Ok((name, section)) => {
                sections.push(name);
                section_map.insert(name, section);
            }
            Err(section_errors) => errors.extend(section_errors),
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }
    Ok(SectionFragment { sections, section_map })
}
