//! Source positions, spans and the offset <-> line/column index
//!
//! Every range in a trace is stored as a [`SourceRange`]: a half-open
//! [`Span`] of 1-based [`SourceLocation`]s. Columns count bytes within the
//! line, so `column - 1` is the byte offset from the start of the line.
//!
//! Producers describe ranges in three wire shapes (see [`WireRange`]); they
//! are all converted to the canonical form once, when a trace is resolved.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 1-based line/column position in the source text
///
/// Ordering is lexicographic on `(line, column)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A half-open interval `[start, end)` over any ordered point type
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span<P> {
    pub start: P,
    pub end: P,
}

/// Canonical source range
pub type SourceRange = Span<SourceLocation>;

/// Byte-offset range into the source text
pub type OffsetRange = Span<usize>;

impl<P: Ord + Copy> Span<P> {
    pub fn new(start: P, end: P) -> Self {
        Span { start, end }
    }

    /// A zero-width span marks an insertion point
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// True when `inner` lies entirely inside `self` (reflexive)
    pub fn contains(&self, inner: &Span<P>) -> bool {
        inner.start >= self.start && inner.end <= self.end
    }

    /// True when `point` lies inside the span, both ends included
    pub fn contains_point(&self, point: P) -> bool {
        point >= self.start && point <= self.end
    }

    /// True when the spans share at least one interior point
    pub fn overlaps(&self, other: &Span<P>) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl SourceRange {
    /// Build a range from a producer location whose end column is inclusive
    pub fn from_inclusive(
        start_line: usize,
        start_column: usize,
        end_line: usize,
        end_column: usize,
    ) -> Self {
        Span::new(
            SourceLocation::new(start_line, start_column),
            SourceLocation::new(end_line, end_column + 1),
        )
    }

    pub fn is_single_line(&self) -> bool {
        self.start.line == self.end.line
    }
}

impl fmt::Display for SourceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Range shapes accepted from producers
///
/// The four-element array and the named line/column form carry an inclusive
/// end column; the offset form is half-open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireRange {
    Location([usize; 4]),
    Lines {
        #[serde(rename = "startLine")]
        start_line: usize,
        #[serde(rename = "startColumn")]
        start_column: usize,
        #[serde(rename = "endLine")]
        end_line: usize,
        #[serde(rename = "endColumn")]
        end_column: usize,
    },
    Offsets {
        #[serde(rename = "startIndex")]
        start_index: usize,
        #[serde(rename = "endIndex")]
        end_index: usize,
    },
}

impl WireRange {
    /// Convert to the canonical range, or `None` if it does not fit `index`
    pub fn resolve(&self, index: &LineIndex) -> Option<SourceRange> {
        let range = match *self {
            WireRange::Location([sl, sc, el, ec]) => SourceRange::from_inclusive(sl, sc, el, ec),
            WireRange::Lines {
                start_line,
                start_column,
                end_line,
                end_column,
            } => SourceRange::from_inclusive(start_line, start_column, end_line, end_column),
            WireRange::Offsets {
                start_index,
                end_index,
            } => {
                if start_index > end_index || end_index > index.len() {
                    return None;
                }
                Span::new(index.location(start_index), index.location(end_index))
            }
        };

        if range.start > range.end {
            return None;
        }
        index.offset_range(&range).map(|_| range)
    }
}

/// Line start table for converting between byte offsets and locations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    line_starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    /// Scan `text` once, recording where each line begins
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            text.bytes()
                .enumerate()
                .filter(|&(_, b)| b == b'\n')
                .map(|(i, _)| i + 1),
        );
        LineIndex {
            line_starts,
            len: text.len(),
        }
    }

    /// Length of the indexed text in bytes
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of lines; an empty text has one empty line
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Location of a byte offset. Offsets past the end clamp to the end.
    pub fn location(&self, offset: usize) -> SourceLocation {
        let offset = offset.min(self.len);
        let line = self.line_starts.partition_point(|&start| start <= offset);
        SourceLocation::new(line, offset - self.line_starts[line - 1] + 1)
    }

    /// Byte offset of a location, if it names a position inside the text.
    ///
    /// A column may point one past the last character of its line (the
    /// newline, or the end of the text on the last line).
    pub fn offset(&self, location: SourceLocation) -> Option<usize> {
        if location.line == 0 || location.column == 0 {
            return None;
        }
        let line_start = *self.line_starts.get(location.line - 1)?;
        let line_limit = self
            .line_starts
            .get(location.line)
            .map_or(self.len, |next| next - 1);
        let offset = line_start + location.column - 1;
        (offset <= line_limit).then_some(offset)
    }

    /// Byte offsets of a canonical range
    pub fn offset_range(&self, range: &SourceRange) -> Option<OffsetRange> {
        let start = self.offset(range.start)?;
        let end = self.offset(range.end)?;
        (start <= end).then(|| Span::new(start, end))
    }
}

/// Convert a byte offset to a location by scanning `text` for newlines
pub fn location_of(text: &str, offset: usize) -> SourceLocation {
    LineIndex::new(text).location(offset)
}
