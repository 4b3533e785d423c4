//! Source reconstruction at a point in the step history
//!
//! Given the immutable source and a step prefix, the active statement's
//! evaluation results are substituted back into the text:
//!
//! 1. take the current statement window (respecting call frames),
//! 2. keep its evaluation steps that have a range and a value,
//! 3. reduce them to non-overlapping segments, later evaluations winning,
//! 4. splice the formatted values into the source.
//!
//! All functions are pure; they can be called for any prefix at any time.

use super::format::format_value;
use super::interval::{non_overlapping, splice, transform_span, Segment};
use crate::errors::ReconstructError;
use crate::replay::navigator::{current_statement, current_statement_window};
use crate::replay::predicates::is_expression_step;
use crate::trace::location::{LineIndex, SourceRange, Span};
use crate::trace::step::Step;

/// Replacements for the active statement, as sorted byte-offset segments
pub fn substitutions(code: &str, steps: &[Step]) -> Result<Vec<Segment<usize>>, ReconstructError> {
    let window = current_statement_window(steps);
    let candidates = window
        .into_iter()
        .filter(|step| is_expression_step(step))
        .filter_map(|step| {
            let range = step.range?;
            let value = step.value.as_ref()?;
            Some(Segment::new(range, format_value(&value.data_type, &value.data_value)))
        });

    let index = LineIndex::new(code);
    non_overlapping(candidates)
        .into_iter()
        .map(|segment| {
            let span = index
                .offset_range(&segment.span)
                .ok_or(ReconstructError::RangeOutOfBounds(segment.span))?;
            Ok(Segment::new(span, segment.value))
        })
        .collect()
}

/// The source with the active statement's evaluated values substituted
///
/// Returns `code` unchanged when nothing has been evaluated yet.
pub fn evaluated_code(code: &str, steps: &[Step]) -> Result<String, ReconstructError> {
    let segments = substitutions(code, steps)?;
    if segments.is_empty() {
        return Ok(code.to_string());
    }
    splice(code, &segments)
}

/// A mask marking the active statement within the evaluated code
///
/// The mask has one line per line of evaluated code. Every line is empty
/// except the statement's, which is padded to the statement's column and
/// then holds one `block` per character of the statement as it reads
/// after substitution. Returns `Ok(None)` before any statement has run.
///
/// Statements spanning several lines are not supported and produce
/// [`ReconstructError::MultiLineHighlight`].
pub fn highlighted_code(code: &str, steps: &[Step], block: char) -> Result<Option<String>, ReconstructError> {
    let Some(range) = current_statement(steps).and_then(|step| step.range) else {
        return Ok(None);
    };
    ensure_single_line(&range)?;

    let index = LineIndex::new(code);
    let statement = index
        .offset_range(&range)
        .ok_or(ReconstructError::RangeOutOfBounds(range))?;

    let segments = substitutions(code, steps)?;
    let evaluated = splice(code, &segments)?;
    let Span { start, end } = transform_span(statement, &segments);

    let evaluated_index = LineIndex::new(&evaluated);
    let start_location = evaluated_index.location(start);
    let end_location = evaluated_index.location(end);
    if start_location.line != end_location.line {
        return Err(ReconstructError::MultiLineHighlight {
            start_line: start_location.line,
            end_line: end_location.line,
        });
    }

    let width = evaluated
        .get(start..end)
        .map_or(end - start, |text| text.chars().count());
    let indent = evaluated
        .get(start - (start_location.column - 1)..start)
        .map_or(start_location.column - 1, |text| text.chars().count());

    let lines: Vec<String> = (1..=evaluated_index.line_count())
        .map(|line| {
            if line == start_location.line {
                let mut mask = " ".repeat(indent);
                mask.extend(std::iter::repeat(block).take(width));
                mask
            } else {
                String::new()
            }
        })
        .collect();

    Ok(Some(lines.join("\n")))
}

fn ensure_single_line(range: &SourceRange) -> Result<(), ReconstructError> {
    if range.is_single_line() {
        Ok(())
    } else {
        Err(ReconstructError::MultiLineHighlight {
            start_line: range.start.line,
            end_line: range.end.line,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::step::Action;
    use pretty_assertions::assert_eq;

    fn eval(location: [usize; 4], value: i64) -> Step {
        let [sl, sc, el, ec] = location;
        Step::new(Action::Eval)
            .with_range(SourceRange::from_inclusive(sl, sc, el, ec))
            .with_value("int", value)
    }

    fn stat(location: [usize; 4]) -> Step {
        let [sl, sc, el, ec] = location;
        Step::new(Action::Statement).with_range(SourceRange::from_inclusive(sl, sc, el, ec))
    }

    #[test]
    fn test_no_steps_leaves_code_unchanged() {
        let code = "5 * 7 + 6;";
        assert_eq!(evaluated_code(code, &[]).unwrap(), code);
    }

    #[test]
    fn test_replaces_expression_at_beginning() {
        let steps = vec![eval([1, 1, 1, 5], 35)];
        assert_eq!(evaluated_code("5 * 7 + 6;", &steps).unwrap(), "35 + 6;");
    }

    #[test]
    fn test_replaces_expression_in_middle() {
        let steps = vec![eval([1, 3, 1, 7], 35)];
        assert_eq!(evaluated_code("f(5 * 7);", &steps).unwrap(), "f(35);");
    }

    #[test]
    fn test_replaces_expression_at_end() {
        let steps = vec![eval([1, 5, 1, 9], 35)];
        assert_eq!(evaluated_code("6 + 5 * 7;", &steps).unwrap(), "6 + 35;");
    }

    #[test]
    fn test_replaces_non_overlapping_expressions() {
        let steps = vec![eval([1, 1, 1, 5], 35), eval([1, 9, 1, 13], 18)];
        assert_eq!(evaluated_code("5 * 7 + 6 * 3;", &steps).unwrap(), "35 + 18;");
    }

    #[test]
    fn test_outer_expression_supersedes_inner() {
        let steps = vec![eval([1, 1, 1, 5], 35), eval([1, 1, 1, 9], 41)];
        assert_eq!(evaluated_code("5 * 7 + 6;", &steps).unwrap(), "41;");
    }

    #[test]
    fn test_only_active_statement_is_substituted() {
        let code = "x = 1 + 2;\ny = 3 * 4;";
        let steps = vec![
            stat([1, 1, 1, 10]),
            eval([1, 5, 1, 9], 3),
            stat([2, 1, 2, 10]),
            eval([2, 5, 2, 9], 12),
        ];
        assert_eq!(evaluated_code(code, &steps).unwrap(), "x = 1 + 2;\ny = 12;");
    }

    #[test]
    fn test_multi_line_expression_is_spliced() {
        let code = "int x = f(1,\n  2) + 3;\nreturn x;";
        let steps = vec![stat([1, 1, 2, 9]), eval([1, 9, 2, 4], 7)];
        assert_eq!(evaluated_code(code, &steps).unwrap(), "int x = 7 + 3;\nreturn x;");
    }

    #[test]
    fn test_zero_width_range_inserts() {
        let code = "f();";
        let point = crate::trace::location::SourceLocation::new(1, 3);
        let steps = vec![Step::new(Action::Eval)
            .with_range(Span::new(point, point))
            .with_value("int", 0)];
        assert_eq!(evaluated_code(code, &steps).unwrap(), "f(0);");
    }

    #[test]
    fn test_nested_call_steps_do_not_leak() {
        let code = "a = g(2);\nreturn 4;";
        let steps = vec![
            stat([1, 1, 1, 9]),
            Step::new(Action::Invocation),
            stat([2, 1, 2, 9]),
            eval([2, 8, 2, 8], 4),
            Step::new(Action::Return),
            eval([1, 5, 1, 8], 4),
        ];
        assert_eq!(evaluated_code(code, &steps).unwrap(), "a = 4;\nreturn 4;");
    }

    #[test]
    fn test_range_outside_code_is_an_error() {
        let steps = vec![eval([3, 1, 3, 2], 1)];
        assert!(matches!(
            evaluated_code("x;", &steps),
            Err(ReconstructError::RangeOutOfBounds(_))
        ));
    }

    #[test]
    fn test_highlight_masks_evaluated_statement() {
        let code = "int a;\nx = 5 * 7 + 6;\nreturn x;";
        let steps = vec![stat([2, 1, 2, 14]), eval([2, 5, 2, 9], 35)];

        let mask = highlighted_code(code, &steps, '#').unwrap().unwrap();
        assert_eq!(mask, "\n###########\n");
        assert_eq!(evaluated_code(code, &steps).unwrap(), "int a;\nx = 35 + 6;\nreturn x;");
    }

    #[test]
    fn test_highlight_keeps_statement_indent() {
        let code = "{\n  y = 1 + 1;\n}";
        let steps = vec![stat([2, 3, 2, 12]), eval([2, 7, 2, 11], 2)];
        let mask = highlighted_code(code, &steps, '#').unwrap().unwrap();
        assert_eq!(mask, "\n  ######\n");
    }

    #[test]
    fn test_highlight_without_statement_is_absent() {
        let steps = vec![eval([1, 1, 1, 5], 35)];
        assert_eq!(highlighted_code("5 * 7 + 6;", &steps, '#').unwrap(), None);
    }

    #[test]
    fn test_highlight_rejects_multi_line_statement() {
        let code = "int x = f(1,\n  2);";
        let steps = vec![stat([1, 1, 2, 5])];
        assert_eq!(
            highlighted_code(code, &steps, '#'),
            Err(ReconstructError::MultiLineHighlight {
                start_line: 1,
                end_line: 2
            })
        );
    }
}
