//! Validates one `### <Name>` section: canonical name and position, a single
//! bullet list as the body, and per-item ticket extraction.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::{Item, Offset, Section, SectionName};
use crate::parse::error::{ErrorKind, ParseError};
use crate::parse::outline::{NodeId, Outline};
use crate::parse::position::LineIndex;
use crate::tokenize::{BlockKind, BlockNode};

/// Trailing ticket reference: `... #PROJECT-1234`, two to ten uppercase
/// letters, preceded by whitespace, anchored to the end of the item text.
static TICKET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+#([A-Z]{2,10}-\d+)\s*$").expect("ticket pattern"));

/// Tracks which canonical section names are still eligible inside one
/// release, so ordering and duplicate errors are attributed correctly across
/// the whole release.
#[derive(Debug, Default)]
pub(crate) struct SectionCursor {
    next: usize,
    seen: [bool; SectionName::CANONICAL.len()],
}

impl SectionCursor {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Admit a section name, advancing the search cursor. A name behind the
    /// cursor is out of order; a name already admitted is a duplicate.
    fn admit(&mut self, name: SectionName) -> Result<(), ErrorKind> {
        let index = name.canonical_index();
        if self.seen[index] {
            return Err(ErrorKind::DuplicateSection { name });
        }
        self.seen[index] = true;
        if index < self.next {
            return Err(ErrorKind::SectionOutOfOrder { name });
        }
        self.next = index + 1;
        Ok(())
    }
}

/// Parse one section heading and its owned content. All violations are
/// collected rather than short-circuited, so a single pass reports every
/// problem the section has.
pub(crate) fn parse_section(
    outline: &Outline,
    id: NodeId,
    cursor: &mut SectionCursor,
    index: &LineIndex,
) -> Result<(SectionName, Section), Vec<ParseError>> {
    let node = outline.node(id);
    let Some((depth, text, span)) = node.heading_parts() else {
        unreachable!("outline children always carry a heading");
    };
    let mut errors = Vec::new();

    if depth != 3 {
        errors.push(ParseError::at(
            ErrorKind::SectionHeadingLevel { found: depth },
            span.start,
        ));
    }

    let name = match text.parse::<SectionName>() {
        Ok(name) => {
            if let Err(kind) = cursor.admit(name) {
                errors.push(ParseError::at(kind, span.start));
            }
            Some(name)
        }
        Err(_) => {
            errors.push(ParseError::at(
                ErrorKind::UnknownSection { found: text.to_string() },
                span.start,
            ));
            None
        }
    };

    if let Some(&child) = node.children.first() {
        let pos = outline
            .node(child)
            .heading_parts()
            .map_or(span.start, |(_, _, sub)| sub.start);
        errors.push(ParseError::at(ErrorKind::SubheadingInSection, pos));
    }

    let list = match node.content.as_slice() {
        [BlockNode { kind: BlockKind::List { ordered: false, items }, span: list_span }] => {
            Some((*list_span, items))
        }
        [] => {
            errors.push(ParseError::at(ErrorKind::ExpectedBulletList, span.start));
            None
        }
        [other] => {
            errors.push(ParseError::at(ErrorKind::ExpectedBulletList, other.span.start));
            None
        }
        [_, second, ..] => {
            errors.push(ParseError::at(ErrorKind::ExpectedBulletList, second.span.start));
            None
        }
    };

    match (name, list) {
        (Some(name), Some((list_span, items))) if errors.is_empty() => {
            let header = index.block_range(span);
            let list = index.block_range(list_span);
            let items = items
                .iter()
                .map(|item| Item {
                    offset: index.block_range(item.span),
                    ticket: extract_ticket(&item.text),
                })
                .collect();
            Ok((
                name,
                Section { offset: Offset::new(header.start, list.end), header, list, items },
            ))
        }
        _ => Err(errors),
    }
}

/// A missing ticket suffix is not an error; the item just has no ticket.
fn extract_ticket(text: &str) -> Option<String> {
    TICKET_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("Fix the parser #TINY-1234", Some("TINY-1234"))]
    #[case("Fix the parser #AB-1", Some("AB-1"))]
    #[case("Fix the parser #ABCDEFGHIJ-99", Some("ABCDEFGHIJ-99"))]
    #[case("Fix the parser #TINY-1234   ", Some("TINY-1234"))]
    #[case("Fix the parser", None)]
    #[case("Fix #TINY-1234 the parser", None)]
    #[case("Fix the parser #A-1", None)]
    #[case("Fix the parser #ABCDEFGHIJK-1", None)]
    #[case("Fix the parser #tiny-1234", None)]
    #[case("Fix the parser #TINY-", None)]
    #[case("#TINY-1234", None)]
    fn ticket_extraction(#[case] text: &str, #[case] expected: Option<&str>) {
        assert_eq!(extract_ticket(text).as_deref(), expected);
    }

    #[test]
    fn cursor_admits_canonical_subsequences() {
        let mut cursor = SectionCursor::new();
        assert!(cursor.admit(SectionName::Added).is_ok());
        assert!(cursor.admit(SectionName::Changed).is_ok());
        assert!(cursor.admit(SectionName::Security).is_ok());
    }

    #[test]
    fn cursor_rejects_names_behind_it() {
        let mut cursor = SectionCursor::new();
        cursor.admit(SectionName::Fixed).unwrap();
        assert_eq!(
            cursor.admit(SectionName::Added),
            Err(ErrorKind::SectionOutOfOrder { name: SectionName::Added })
        );
    }

    #[test]
    fn cursor_reports_duplicates_over_ordering() {
        let mut cursor = SectionCursor::new();
        cursor.admit(SectionName::Fixed).unwrap();
        assert_eq!(
            cursor.admit(SectionName::Fixed),
            Err(ErrorKind::DuplicateSection { name: SectionName::Fixed })
        );
    }

    #[test]
    fn cursor_keeps_attributing_after_an_ordering_error() {
        let mut cursor = SectionCursor::new();
        cursor.admit(SectionName::Fixed).unwrap();
        let _ = cursor.admit(SectionName::Added);
        // The cursor stays at Fixed; Changed is still behind it.
        assert_eq!(
            cursor.admit(SectionName::Changed),
            Err(ErrorKind::SectionOutOfOrder { name: SectionName::Changed })
        );
    }
}
