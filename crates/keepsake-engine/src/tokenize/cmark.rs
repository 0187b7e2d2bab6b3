//! Default [`Tokenizer`] binding over pulldown-cmark.
//!
//! pulldown-cmark reports byte ranges; the contract wants 1-based (line,
//! column) positions, so ranges are tightened (trailing whitespace and the
//! line terminator belong to no construct) and translated through the same
//! [`LineIndex`] the parser uses. Text is taken raw from the source rather
//! than from inline events, so bracket characters survive even when a
//! reference link definition exists for them.

use std::ops::Range;

use pulldown_cmark::{Event, Options, Parser, Tag};

use crate::parse::position::LineIndex;
use crate::tokenize::{BlockKind, BlockNode, ListItemNode, SourceSpan, Tokenizer};

#[derive(Debug, Clone, Copy, Default)]
pub struct CmarkTokenizer;

impl Tokenizer for CmarkTokenizer {
    fn tokenize(&self, source: &str) -> Vec<BlockNode> {
        let index = LineIndex::new(source);
        let mut blocks = Vec::new();
        let mut iter = Parser::new_ext(source, Options::empty()).into_offset_iter();

        while let Some((event, range)) = iter.next() {
            let kind = match event {
                Event::Start(Tag::Heading { level, .. }) => {
                    skip_to_end(&mut iter);
                    BlockKind::Heading {
                        depth: level as u8,
                        text: heading_text(raw(source, &range)),
                    }
                }
                Event::Start(Tag::List(start_number)) => {
                    let items = collect_items(&mut iter)
                        .into_iter()
                        .map(|item_range| ListItemNode {
                            text: item_text(raw(source, &item_range)),
                            span: span_of(source, &index, item_range),
                        })
                        .collect();
                    BlockKind::List {
                        ordered: start_number.is_some(),
                        items,
                    }
                }
                Event::Start(Tag::Paragraph) => {
                    skip_to_end(&mut iter);
                    BlockKind::Paragraph {
                        text: raw(source, &range).trim().to_string(),
                    }
                }
                Event::Start(_) => {
                    skip_to_end(&mut iter);
                    BlockKind::Other
                }
                Event::Rule => BlockKind::Other,
                // Stray leaf events never occur at the top level.
                _ => continue,
            };
            blocks.push(BlockNode {
                kind,
                span: span_of(source, &index, range),
            });
        }
        blocks
    }
}

/// Consume events until the start tag that opened the current block closes.
fn skip_to_end<'a>(iter: &mut impl Iterator<Item = (Event<'a>, Range<usize>)>) {
    let mut depth = 1usize;
    for (event, _) in iter {
        match event {
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                depth -= 1;
                if depth == 0 {
                    return;
                }
            }
            _ => {}
        }
    }
}

/// Consume a list's events, returning the byte ranges of its direct items.
/// Nested lists stay inside their parent item's range.
fn collect_items<'a>(
    iter: &mut impl Iterator<Item = (Event<'a>, Range<usize>)>,
) -> Vec<Range<usize>> {
    let mut items = Vec::new();
    let mut depth = 1usize;
    for (event, range) in iter {
        match event {
            Event::Start(Tag::Item) => {
                depth += 1;
                if depth == 2 {
                    items.push(range);
                }
            }
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            _ => {}
        }
    }
    items
}

fn raw<'a>(source: &'a str, range: &Range<usize>) -> &'a str {
    &source[range.start..range.end.min(source.len())]
}

/// Tighten a pulldown range (which may include the line terminator and
/// trailing blank lines) to the construct's own characters, then translate
/// to positions.
fn span_of(source: &str, index: &LineIndex, range: Range<usize>) -> SourceSpan {
    let slice = raw(source, &range);
    let leading = slice.len() - slice.trim_start().len();
    let start = range.start + leading;
    let end = (range.start + slice.trim_end().len()).max(start);
    SourceSpan::new(index.pos_of(start), index.pos_of(end))
}

/// Literal text of a heading: the ATX marker and any closing hash sequence
/// stripped, setext underlines dropped.
fn heading_text(raw: &str) -> String {
    let line = raw.lines().next().unwrap_or("").trim();
    let Some(rest) = line.strip_prefix('#') else {
        // Setext heading: the text is the line above the underline.
        return line.to_string();
    };
    let body = rest.trim_start_matches('#').trim();
    let stripped = body.trim_end_matches('#');
    if stripped.len() != body.len() && (stripped.is_empty() || stripped.ends_with(char::is_whitespace))
    {
        stripped.trim_end().to_string()
    } else {
        body.to_string()
    }
}

/// Literal text of a list item: the bullet or ordinal marker stripped.
fn item_text(raw: &str) -> String {
    let trimmed = raw.trim_start();
    let rest = if let Some(rest) = trimmed.strip_prefix(['-', '*', '+']) {
        rest
    } else {
        let digits = trimmed.len() - trimmed.trim_start_matches(|c: char| c.is_ascii_digit()).len();
        match trimmed[digits..].strip_prefix(['.', ')']) {
            Some(rest) if digits > 0 => rest,
            _ => trimmed,
        }
    };
    rest.trim_start().trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use crate::tokenize::SourcePos;

    fn tokenize(source: &str) -> Vec<BlockNode> {
        CmarkTokenizer.tokenize(source)
    }

    #[test]
    fn heading_paragraph_and_list() {
        let blocks = tokenize("# Changelog\n\nA blurb.\n\n- one\n- two\n");
        assert_eq!(blocks.len(), 3);
        assert_eq!(
            blocks[0].kind,
            BlockKind::Heading { depth: 1, text: "Changelog".to_string() }
        );
        assert_eq!(
            blocks[1].kind,
            BlockKind::Paragraph { text: "A blurb.".to_string() }
        );
        match &blocks[2].kind {
            BlockKind::List { ordered, items } => {
                assert!(!ordered);
                let texts: Vec<&str> = items.iter().map(|i| i.text.as_str()).collect();
                assert_eq!(texts, vec!["one", "two"]);
            }
            other => panic!("expected list, got {other:?}"),
        }
    }

    #[test]
    fn positions_are_one_based_and_tight() {
        let blocks = tokenize("# Changelog\n\n- item\n");
        assert_eq!(blocks[0].span.start, SourcePos::new(1, 1));
        // End points one past the final "g" of "Changelog", not past the newline.
        assert_eq!(blocks[0].span.end, SourcePos::new(1, 12));
        assert_eq!(blocks[1].span.start, SourcePos::new(3, 1));
        assert_eq!(blocks[1].span.end, SourcePos::new(3, 7));
    }

    #[test]
    fn list_span_excludes_trailing_blank_lines() {
        let blocks = tokenize("- one\n- two\n\n\nafter\n");
        let list = &blocks[0];
        assert_eq!(list.span.end.line, 2);
    }

    #[test]
    fn ordered_lists_are_flagged() {
        let blocks = tokenize("1. one\n2. two\n");
        match &blocks[0].kind {
            BlockKind::List { ordered, items } => {
                assert!(ordered);
                assert_eq!(items[0].text, "one");
            }
            other => panic!("expected list, got {other:?}"),
        }
    }

    #[test]
    fn nested_items_stay_inside_their_parent() {
        let blocks = tokenize("- parent\n  - child\n- second\n");
        match &blocks[0].kind {
            BlockKind::List { items, .. } => {
                assert_eq!(items.len(), 2);
                assert!(items[0].text.starts_with("parent"));
                assert!(items[0].text.contains("child"));
                assert_eq!(items[1].text, "second");
            }
            other => panic!("expected list, got {other:?}"),
        }
    }

    #[test]
    fn bracketed_heading_text_survives_link_definitions() {
        // With a reference definition present, an inline-event walk would
        // swallow the brackets; raw extraction keeps them.
        let source = "## [1.2.3] - 2024-01-02\n\n[1.2.3]: https://example.com\n";
        let blocks = tokenize(source);
        assert_eq!(
            blocks[0].kind,
            BlockKind::Heading { depth: 2, text: "[1.2.3] - 2024-01-02".to_string() }
        );
        // The link definition itself produces no block.
        assert_eq!(blocks.len(), 1);
    }

    #[rstest]
    #[case("## Added", "Added")]
    #[case("##   Added   ", "Added")]
    #[case("## Added ##", "Added")]
    #[case("# C#", "C#")]
    #[case("##", "")]
    fn heading_text_strips_atx_markers(#[case] line: &str, #[case] expected: &str) {
        assert_eq!(heading_text(line), expected);
    }

    #[rstest]
    #[case("- fix the thing", "fix the thing")]
    #[case("* fix the thing", "fix the thing")]
    #[case("12. fix the thing", "fix the thing")]
    #[case("3) fix the thing", "fix the thing")]
    #[case("- ", "")]
    fn item_text_strips_markers(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(item_text(raw), expected);
    }

    #[test]
    fn code_blocks_and_rules_are_other() {
        let blocks = tokenize("```\ncode\n```\n\n---\n");
        assert_eq!(blocks.len(), 2);
        assert!(blocks.iter().all(|b| b.kind == BlockKind::Other));
    }

    #[test]
    fn crlf_sources_tokenize_with_correct_lines() {
        let blocks = tokenize("# Changelog\r\n\r\n- item\r\n");
        assert_eq!(blocks[0].span.start, SourcePos::new(1, 1));
        match &blocks[1].kind {
            BlockKind::List { items, .. } => {
                assert_eq!(items[0].span.start, SourcePos::new(3, 1));
                assert_eq!(items[0].text, "item");
            }
            other => panic!("expected list, got {other:?}"),
        }
    }
}
