//! Call tree reconstruction
//!
//! The tree is rebuilt from scratch for every query with an explicit stack
//! of open frames. Ids are dense, assigned in the order frames open, and
//! only meaningful within one build.

use super::predicates::{is_invocation_step, is_parameter_step, is_return_step};
use crate::errors::CallTreeError;
use crate::trace::step::Step;

/// One function call and everything recorded between its invocation and return
#[derive(Debug, Clone, PartialEq)]
pub struct CallNode {
    pub id: usize,
    pub invocation: Step,
    pub parameters: Vec<Step>,
    pub returns: Vec<Step>,
    pub subcalls: Vec<CallNode>,
}

impl CallNode {
    fn open(id: usize, invocation: &Step) -> Self {
        CallNode {
            id,
            invocation: invocation.clone(),
            parameters: Vec::new(),
            returns: Vec::new(),
            subcalls: Vec::new(),
        }
    }

    /// True once the matching return step has been seen
    pub fn is_finished(&self) -> bool {
        !self.returns.is_empty()
    }

    /// Name of the called function, when the producer recorded it
    pub fn name(&self) -> &str {
        self.invocation.identifier.as_deref().unwrap_or("?")
    }

    /// Number of calls in this subtree, this one included
    pub fn size(&self) -> usize {
        1 + self.subcalls.iter().map(CallNode::size).sum::<usize>()
    }

    /// This call followed by the chain of calls still running inside it
    pub fn active_path(&self) -> Vec<&CallNode> {
        let mut path = vec![self];
        let mut node = self;
        while let Some(call) = node.subcalls.last().filter(|call| !call.is_finished()) {
            path.push(call);
            node = call;
        }
        path
    }
}

/// Build the call tree for a step prefix
///
/// Frames still open at the end of the prefix are kept, so the tree shows
/// the calls in progress. Returns `Ok(None)` when no call was made. A
/// return without an open frame, or several top-level calls, means the
/// feed is unbalanced and is reported instead of merged.
pub fn build_call_tree(steps: &[Step]) -> Result<Option<CallNode>, CallTreeError> {
    let mut roots: Vec<CallNode> = Vec::new();
    let mut stack: Vec<CallNode> = Vec::new();
    let mut next_id = 0;

    for (index, step) in steps.iter().enumerate() {
        if is_invocation_step(step) {
            stack.push(CallNode::open(next_id, step));
            next_id += 1;
        } else if is_parameter_step(step) {
            match stack.last_mut() {
                Some(frame) => frame.parameters.push(step.clone()),
                None => tracing::warn!(index, "parameter step outside of any call"),
            }
        } else if is_return_step(step) {
            let mut frame = stack.pop().ok_or(CallTreeError::UnmatchedReturn { index })?;
            frame.returns.push(step.clone());
            attach(frame, &mut stack, &mut roots);
        }
    }

    while let Some(frame) = stack.pop() {
        attach(frame, &mut stack, &mut roots);
    }

    match roots.len() {
        0 => Ok(None),
        1 => Ok(roots.pop()),
        count => Err(CallTreeError::MultipleRoots { count }),
    }
}

fn attach(frame: CallNode, stack: &mut [CallNode], roots: &mut Vec<CallNode>) {
    match stack.last_mut() {
        Some(parent) => parent.subcalls.push(frame),
        None => roots.push(frame),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::step::Action;

    fn step(action: Action) -> Step {
        Step::new(action)
    }

    #[test]
    fn test_single_invocation() {
        let steps = vec![step(Action::Invocation), step(Action::Return)];
        let tree = build_call_tree(&steps).unwrap().unwrap();

        assert_eq!(
            tree,
            CallNode {
                id: 0,
                invocation: step(Action::Invocation),
                parameters: vec![],
                returns: vec![step(Action::Return)],
                subcalls: vec![],
            }
        );
    }

    #[test]
    fn test_invocation_with_parameters() {
        let steps = vec![
            step(Action::Invocation),
            step(Action::Parameter),
            step(Action::Parameter),
            step(Action::Return),
        ];
        let tree = build_call_tree(&steps).unwrap().unwrap();
        assert_eq!(tree.parameters.len(), 2);
        assert_eq!(tree.returns.len(), 1);
    }

    #[test]
    fn test_nested_invocations() {
        let steps = vec![
            step(Action::Invocation),
            step(Action::Parameter),
            step(Action::Invocation),
            step(Action::Return),
            step(Action::Return),
        ];
        let tree = build_call_tree(&steps).unwrap().unwrap();

        assert_eq!(tree.id, 0);
        assert_eq!(tree.parameters.len(), 1);
        assert_eq!(tree.subcalls.len(), 1);
        let inner = &tree.subcalls[0];
        assert_eq!(inner.id, 1);
        assert!(inner.parameters.is_empty());
        assert!(inner.is_finished());
        assert_eq!(tree.size(), 2);
    }

    #[test]
    fn test_sibling_calls_keep_open_order() {
        let steps = vec![
            step(Action::Invocation).with_identifier("main"),
            step(Action::Invocation).with_identifier("f"),
            step(Action::Return),
            step(Action::Invocation).with_identifier("g"),
            step(Action::Return),
            step(Action::Return),
        ];
        let tree = build_call_tree(&steps).unwrap().unwrap();
        let names: Vec<_> = tree.subcalls.iter().map(|c| (c.id, c.name())).collect();
        assert_eq!(names, vec![(1, "f"), (2, "g")]);
    }

    #[test]
    fn test_open_frames_are_kept() {
        let steps = vec![
            step(Action::Invocation),
            step(Action::Invocation),
            step(Action::Statement),
        ];
        let tree = build_call_tree(&steps).unwrap().unwrap();
        assert!(!tree.is_finished());
        assert_eq!(tree.subcalls.len(), 1);
        assert!(!tree.subcalls[0].is_finished());
    }

    #[test]
    fn test_active_path_follows_running_calls() {
        let steps = vec![
            step(Action::Invocation).with_identifier("main"),
            step(Action::Invocation).with_identifier("f"),
            step(Action::Return),
            step(Action::Invocation).with_identifier("g"),
            step(Action::Invocation).with_identifier("h"),
        ];
        let tree = build_call_tree(&steps).unwrap().unwrap();
        let names: Vec<_> = tree.active_path().iter().map(|call| call.name()).collect();
        assert_eq!(names, vec!["main", "g", "h"]);

        let finished = build_call_tree(&steps[..3]).unwrap().unwrap();
        assert_eq!(finished.active_path().len(), 1);
    }

    #[test]
    fn test_empty_prefix_has_no_tree() {
        assert_eq!(build_call_tree(&[]), Ok(None));
        assert_eq!(build_call_tree(&[step(Action::Statement)]), Ok(None));
    }

    #[test]
    fn test_unbalanced_feeds_are_reported() {
        let unmatched = vec![step(Action::Return)];
        assert_eq!(
            build_call_tree(&unmatched),
            Err(CallTreeError::UnmatchedReturn { index: 0 })
        );

        let siblings = vec![
            step(Action::Invocation),
            step(Action::Return),
            step(Action::Invocation),
            step(Action::Return),
        ];
        assert_eq!(
            build_call_tree(&siblings),
            Err(CallTreeError::MultipleRoots { count: 2 })
        );
    }
}
