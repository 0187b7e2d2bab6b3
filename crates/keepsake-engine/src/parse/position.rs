//! Translation between the tokenizer's 1-based (line, column) positions and
//! absolute byte offsets into the source text.

use crate::model::Offset;
use crate::tokenize::{SourcePos, SourceSpan};

/// A table of line-start offsets for one source string.
///
/// Built with a single left-to-right scan that treats CR, LF and CRLF each as
/// one line boundary; a line start is recorded only once the full ending
/// sequence has been consumed, so CRLF counts once, not twice. Splitting on
/// `\n` alone would miscount under bare-CR or mixed endings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    line_starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let bytes = source.as_bytes();
        let mut line_starts = vec![0];
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\r' => {
                    i += 1;
                    if bytes.get(i) == Some(&b'\n') {
                        i += 1;
                    }
                    line_starts.push(i);
                }
                b'\n' => {
                    i += 1;
                    line_starts.push(i);
                }
                _ => i += 1,
            }
        }
        Self {
            line_starts,
            len: bytes.len(),
        }
    }

    /// Absolute byte offset of a 1-based (line, column) position, clamped to
    /// the source bounds rather than panicking on out-of-range input.
    pub fn offset(&self, pos: SourcePos) -> usize {
        let line_start = self
            .line_starts
            .get(pos.line.saturating_sub(1))
            .copied()
            .unwrap_or(self.len);
        (line_start + pos.column.saturating_sub(1)).min(self.len)
    }

    /// The 1-based position of an absolute byte offset.
    pub fn pos_of(&self, offset: usize) -> SourcePos {
        let offset = offset.min(self.len);
        let line = self.line_starts.partition_point(|&start| start <= offset);
        SourcePos::new(line, offset - self.line_starts[line - 1] + 1)
    }

    /// The tight span between a node's start and end positions: exactly the
    /// node's own characters.
    pub fn col_range(&self, span: SourceSpan) -> Offset {
        let start = self.offset(span.start);
        Offset::new(start, self.offset(span.end).max(start + 1) - 1)
    }

    /// The span covering entire lines from the node's first line through its
    /// last line, terminator included, so trailing whitespace on those lines
    /// stays with the construct that owns them.
    pub fn block_range(&self, span: SourceSpan) -> Offset {
        Offset::new(
            self.line_start(span.start.line),
            self.line_end(span.end.line),
        )
    }

    fn line_start(&self, line: usize) -> usize {
        self.line_starts
            .get(line.saturating_sub(1))
            .copied()
            .unwrap_or(self.len)
    }

    /// Inclusive offset of the last byte of a 1-based line, including its
    /// terminator.
    fn line_end(&self, line: usize) -> usize {
        match self.line_starts.get(line) {
            Some(&next_start) => next_start - 1,
            None => self.len.saturating_sub(1),
        }
    }
}
