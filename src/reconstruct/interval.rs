//! Segment algebra for splicing replacement text into source
//!
//! A [`Segment`] pairs a half-open span with the text that should replace
//! it. Spans may be expressed in any ordered coordinate (byte offsets or
//! line/column locations); splicing itself works on byte offsets.

use crate::errors::ReconstructError;
use crate::trace::location::Span;

/// A span of source and its replacement text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment<P> {
    pub span: Span<P>,
    pub value: String,
}

impl<P> Segment<P> {
    pub fn new(span: Span<P>, value: impl Into<String>) -> Self {
        Segment {
            span,
            value: value.into(),
        }
    }
}

fn conflicts<P: Ord + Copy>(a: &Span<P>, b: &Span<P>) -> bool {
    a.contains(b) || b.contains(a) || a.overlaps(b)
}

/// Reduce segments to a mutually non-overlapping set, sorted by start
///
/// Segments are taken in registration order. Each new segment evicts every
/// previously accepted segment it conflicts with (contains, is contained
/// by, or partially overlaps), so when an enclosing expression finishes
/// after its sub-expressions, its value replaces theirs. Identical spans
/// keep the later segment.
pub fn non_overlapping<P: Ord + Copy>(segments: impl IntoIterator<Item = Segment<P>>) -> Vec<Segment<P>> {
    let mut accepted: Vec<Segment<P>> = Vec::new();

    for segment in segments {
        accepted.retain(|kept| !conflicts(&kept.span, &segment.span));
        accepted.push(segment);
    }

    accepted.sort_by(|a, b| a.span.start.cmp(&b.span.start));
    accepted
}

/// Replace each segment's span in `text` with its value
///
/// Segments must be sorted and non-overlapping, with offsets on character
/// boundaries. Text outside the segments passes through unchanged.
pub fn splice(text: &str, segments: &[Segment<usize>]) -> Result<String, ReconstructError> {
    let mut buffer = String::with_capacity(text.len());
    let mut cursor = 0;

    for segment in segments {
        let Span { start, end } = segment.span;
        let gap = (start >= cursor && start <= end)
            .then(|| text.get(cursor..start))
            .flatten()
            .filter(|_| text.is_char_boundary(end) && end <= text.len())
            .ok_or(ReconstructError::SegmentOutOfBounds { start, end })?;

        buffer.push_str(gap);
        buffer.push_str(&segment.value);
        cursor = end;
    }

    buffer.push_str(&text[cursor..]);
    Ok(buffer)
}

/// Map a span of the original text onto the text produced by `changes`
///
/// `changes` are sorted, non-overlapping replacements in original
/// coordinates. Replacements that end at or before a boundary shift it by
/// their length difference; a boundary strictly inside a replaced span
/// snaps to that replacement (start to its beginning, end to its end).
/// An insertion exactly at the start counts as inside the span.
pub fn transform_span(span: Span<usize>, changes: &[Segment<usize>]) -> Span<usize> {
    let map = |point: usize, snap_to_end: bool| {
        let mut shift: isize = 0;
        for change in changes {
            let Span { start, end } = change.span;
            let inserted_at_start = !snap_to_end && start == point && end == point;
            if end <= point && !inserted_at_start {
                shift += change.value.len() as isize - (end - start) as isize;
            } else if start < point {
                let base = start as isize + shift;
                let snapped = if snap_to_end { base + change.value.len() as isize } else { base };
                return snapped.max(0) as usize;
            } else {
                break;
            }
        }
        (point as isize + shift).max(0) as usize
    };

    let start = map(span.start, false);
    let end = map(span.end, true).max(start);
    Span::new(start, end)
}
