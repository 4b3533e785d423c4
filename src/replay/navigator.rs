//! Finding steps relative to a cursor
//!
//! Navigation only reports a target index; moving the cursor is the
//! session's job. Reaching either end of the history yields `None`.

use super::predicates::{is_invocation_step, is_parameter_step, is_return_step, is_statement_step};
use crate::trace::location::SourceRange;
use crate::trace::step::Step;

/// Lowest index whose step satisfies `predicate`
pub fn first_step(predicate: impl Fn(&Step) -> bool, steps: &[Step]) -> Option<usize> {
    steps.iter().position(predicate)
}

/// Lowest index after `cursor` whose step satisfies `predicate`
pub fn next_step(predicate: impl Fn(&Step) -> bool, steps: &[Step], cursor: usize) -> Option<usize> {
    let start = cursor.checked_add(1)?;
    steps
        .get(start..)?
        .iter()
        .position(predicate)
        .map(|offset| start + offset)
}

/// Highest index before `cursor` whose step satisfies `predicate`
pub fn previous_step(predicate: impl Fn(&Step) -> bool, steps: &[Step], cursor: usize) -> Option<usize> {
    steps[..cursor.min(steps.len())].iter().rposition(predicate)
}

/// Steps of the statement that is currently executing
///
/// Steps are grouped into call frames: an invocation opens a frame and the
/// matching return closes it, so steps of a finished nested call drop out.
/// The window is the part of the innermost open frame starting at its last
/// statement step, or the whole frame when it has no statement step yet.
/// Invocation and return steps themselves belong to no frame.
pub fn current_statement_window(steps: &[Step]) -> Vec<&Step> {
    let mut frames: Vec<Vec<&Step>> = vec![Vec::new()];

    for step in steps {
        if is_invocation_step(step) {
            frames.push(Vec::new());
        } else if is_return_step(step) {
            if frames.len() > 1 {
                frames.pop();
            } else {
                tracing::warn!("return step without an open call frame");
            }
        } else if let Some(frame) = frames.last_mut() {
            frame.push(step);
        }
    }

    let mut frame = frames.pop().unwrap_or_default();
    let start = frame
        .iter()
        .rposition(|step| is_statement_step(step))
        .unwrap_or(0);
    frame.split_off(start)
}

/// The active statement step, if one has been reached in the current frame
pub fn current_statement(steps: &[Step]) -> Option<&Step> {
    current_statement_window(steps)
        .first()
        .copied()
        .filter(|step| is_statement_step(step))
}

/// Range the running code is confined to
///
/// This is the active statement's range. A call that has not reached its
/// first statement yet is confined to the scope of its parameters.
pub fn active_range(steps: &[Step]) -> Option<SourceRange> {
    let window = current_statement_window(steps);
    match window.first() {
        Some(step) if is_statement_step(step) => step.range,
        _ => window
            .iter()
            .rev()
            .filter(|step| is_parameter_step(step))
            .find_map(|step| step.scope),
    }
}
