//! Validates one `## ...` release heading and aggregates its sections.
//!
//! A release header is either `Unreleased` (only legal as the first release)
//! or `<major>.<minor>.<patch> - <yyyy-mm-dd>`; in both forms the version
//! token may be wrapped in a single matched pair of brackets, the usual
//! Keep a Changelog linking style.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use semver::Version;

use crate::model::{Offset, Release, ReleaseMeta};
use crate::parse::error::{ErrorKind, ParseError};
use crate::parse::outline::{NodeId, Outline};
use crate::parse::position::LineIndex;
use crate::parse::section::{SectionCursor, parse_section};

/// Shape check before calendar validation, so `2024-1-2` is rejected even
/// though chrono would accept it.
static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date pattern"));

pub(crate) fn parse_release(
    outline: &Outline,
    id: NodeId,
    first: bool,
    index: &LineIndex,
) -> Result<Release, Vec<ParseError>> {
    let node = outline.node(id);
    let Some((depth, text, span)) = node.heading_parts() else {
        unreachable!("outline children always carry a heading");
    };
    let mut errors = Vec::new();

    if depth != 2 {
        errors.push(ParseError::at(
            ErrorKind::ReleaseHeadingLevel { found: depth },
            span.start,
        ));
    }

    let mut meta = None;
    match classify_header(text) {
        Ok(Some(parsed)) => meta = Some(parsed),
        Ok(None) => {
            if !first {
                errors.push(ParseError::at(ErrorKind::UnreleasedNotFirst, span.start));
            }
        }
        Err(kinds) => {
            errors.extend(kinds.into_iter().map(|kind| ParseError::at(kind, span.start)));
        }
    }

    if let Some(content) = node.content.first() {
        errors.push(ParseError::at(ErrorKind::ContentInRelease, content.span.start));
    }

    let header = index.block_range(span);
    let mut end = header.end;
    let mut cursor = SectionCursor::new();
    let mut sections = Vec::new();
    let mut section_map = BTreeMap::new();
    for &child in &node.children {
        match parse_section(outline, child, &mut cursor, index) {
            Ok((name, section)) => {
                end = end.max(section.offset.end);
                sections.push(name);
                section_map.insert(name, section);
            }
            Err(section_errors) => errors.extend(section_errors),
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }
    Ok(Release {
        offset: Offset::new(header.start, end),
        header,
        meta,
        sections,
        section_map,
    })
}

/// Classify a release header: `Ok(None)` for Unreleased, `Ok(Some(meta))`
/// for a released entry. Version and date problems are reported together.
fn classify_header(text: &str) -> Result<Option<ReleaseMeta>, Vec<ErrorKind>> {
    let text = text.trim();

    if text.trim_matches(['[', ']']) == "Unreleased" {
        return match strip_brackets(text) {
            Ok("Unreleased") => Ok(None),
            _ => Err(vec![ErrorKind::MismatchedBrackets { found: text.to_string() }]),
        };
    }

    let Some((version_raw, date_raw)) = text.split_once(" - ") else {
        return Err(vec![ErrorKind::ReleaseHeaderFormat { found: text.to_string() }]);
    };

    let mut kinds = Vec::new();
    let version = match strip_brackets(version_raw.trim()) {
        Ok(bare) => match parse_version(bare) {
            Ok(version) => Some(version),
            Err(kind) => {
                kinds.push(kind);
                None
            }
        },
        Err(kind) => {
            kinds.push(kind);
            None
        }
    };
    let date = match parse_date(date_raw.trim()) {
        Ok(date) => Some(date),
        Err(kind) => {
            kinds.push(kind);
            None
        }
    };

    match (version, date) {
        (Some(version), Some(date)) => Ok(Some(ReleaseMeta { version, date })),
        _ => Err(kinds),
    }
}

/// Strip an optional single matched pair of square brackets. A lone bracket
/// on either side, or more than one pair, is a format error.
fn strip_brackets(token: &str) -> Result<&str, ErrorKind> {
    let left = token.len() - token.trim_start_matches('[').len();
    let right = token.len() - token.trim_end_matches(']').len();
    if left != right || left > 1 {
        return Err(ErrorKind::MismatchedBrackets { found: token.to_string() });
    }
    if left == 1 {
        Ok(&token[1..token.len() - 1])
    } else {
        Ok(token)
    }
}

/// A bare `major.minor.patch` triple; pre-release and build-metadata
/// suffixes are not accepted in changelog headers.
fn parse_version(token: &str) -> Result<Version, ErrorKind> {
    match Version::parse(token) {
        Ok(version) if version.pre.is_empty() && version.build.is_empty() => Ok(version),
        _ => Err(ErrorKind::InvalidVersion { found: token.to_string() }),
    }
}

fn parse_date(token: &str) -> Result<NaiveDate, ErrorKind> {
    if !DATE_RE.is_match(token) {
        return Err(ErrorKind::InvalidDate { found: token.to_string() });
    }
    NaiveDate::parse_from_str(token, "%Y-%m-%d")
        .map_err(|_| ErrorKind::InvalidDate { found: token.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("Unreleased")]
    #[case("[Unreleased]")]
    fn classifies_unreleased(#[case] text: &str) {
        assert_eq!(classify_header(text), Ok(None));
    }

    #[rstest]
    #[case("1.2.3 - 2024-01-02")]
    #[case("[1.2.3] - 2024-01-02")]
    fn classifies_released(#[case] text: &str) {
        let meta = classify_header(text).unwrap().unwrap();
        assert_eq!(meta.version, Version::new(1, 2, 3));
        assert_eq!(meta.date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    }

    #[rstest]
    #[case("[Unreleased")]
    #[case("Unreleased]")]
    #[case("[[Unreleased]]")]
    fn rejects_unbalanced_unreleased_brackets(#[case] text: &str) {
        assert_eq!(
            classify_header(text),
            Err(vec![ErrorKind::MismatchedBrackets { found: text.to_string() }])
        );
    }

    #[rstest]
    #[case("[1.2.3 - 2024-01-02", "[1.2.3")]
    #[case("1.2.3] - 2024-01-02", "1.2.3]")]
    fn rejects_unbalanced_version_brackets(#[case] text: &str, #[case] token: &str) {
        assert_eq!(
            classify_header(text),
            Err(vec![ErrorKind::MismatchedBrackets { found: token.to_string() }])
        );
    }

    #[rstest]
    #[case("1.2 - 2024-01-02", "1.2")]
    #[case("1.2.3.4 - 2024-01-02", "1.2.3.4")]
    #[case("1.2.3-rc.1 - 2024-01-02", "1.2.3-rc.1")]
    #[case("1.2.3+build - 2024-01-02", "1.2.3+build")]
    #[case("v1.2.3 - 2024-01-02", "v1.2.3")]
    fn rejects_non_triple_versions(#[case] text: &str, #[case] token: &str) {
        assert_eq!(
            classify_header(text),
            Err(vec![ErrorKind::InvalidVersion { found: token.to_string() }])
        );
    }

    #[rstest]
    #[case("1.2.3 - 2024-1-2", "2024-1-2")]
    #[case("1.2.3 - 02-01-2024", "02-01-2024")]
    #[case("1.2.3 - 2024-02-30", "2024-02-30")]
    #[case("1.2.3 - someday", "someday")]
    fn rejects_bad_dates(#[case] text: &str, #[case] token: &str) {
        assert_eq!(
            classify_header(text),
            Err(vec![ErrorKind::InvalidDate { found: token.to_string() }])
        );
    }

    #[test]
    fn reports_version_and_date_problems_together() {
        let kinds = classify_header("oops - someday").unwrap_err();
        assert_eq!(
            kinds,
            vec![
                ErrorKind::InvalidVersion { found: "oops".to_string() },
                ErrorKind::InvalidDate { found: "someday".to_string() },
            ]
        );
    }

    #[rstest]
    #[case("1.2.3")]
    #[case("What's new")]
    #[case("")]
    fn anything_else_is_a_format_error(#[case] text: &str) {
        assert_eq!(
            classify_header(text),
            Err(vec![ErrorKind::ReleaseHeaderFormat { found: text.to_string() }])
        );
    }
}
