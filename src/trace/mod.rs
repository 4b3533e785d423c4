//! Trace data model
//!
//! A [`Trace`] bundles the three artifacts a producer hands over after a
//! run: the source text, its syntax nodes and the ordered step list.
//!
//! - [`location`]: canonical ranges and the offset/line-column index
//! - [`node`]: syntax nodes and the derived node tree
//! - [`step`]: the step tagged union
//! - [`ctype`]: classification of C type spellings
//!
//! # Resolution
//!
//! [`Trace::new`] finishes the decoding that a producer leaves open: steps
//! that only name a node get that node's range, declarations without an
//! explicit scope get the range of their enclosing node, and statement steps
//! receive a stable `l<line>:<ordinal>` label.

pub mod ctype;
pub mod location;
pub mod node;
pub mod step;

use crate::errors::ProducerError;
use location::{LineIndex, SourceRange, WireRange};
use node::{NodeId, NodeTree, SyntaxNode};
use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use step::{Action, DataValue, Step, TypedValue};

/// The immutable result of one producer run
#[derive(Debug, Clone, Default)]
pub struct Trace {
    pub code: String,
    pub nodes: NodeTree,
    pub steps: Vec<Step>,
    /// Producer type table; opaque to the replay engine
    pub types: BTreeMap<String, serde_json::Value>,
}

impl Trace {
    /// Resolve node ranges, declaration scopes and statement labels
    pub fn new(code: String, nodes: Vec<SyntaxNode>, mut steps: Vec<Step>) -> Result<Self, ProducerError> {
        let nodes = NodeTree::new(nodes);

        for step in &mut steps {
            if let Some(node_id) = step.node_id {
                let node = nodes.get(node_id).ok_or(ProducerError::UnknownNode(node_id))?;
                if step.range.is_none() {
                    step.range = Some(node.range);
                }
                if step.scope.is_none() && matches!(step.action, Action::Declaration | Action::Parameter) {
                    step.scope = nodes.parent(node_id).map(|parent| parent.range);
                }
            }
        }

        assign_statement_refs(&mut steps);

        Ok(Trace {
            code,
            nodes,
            steps,
            types: BTreeMap::new(),
        })
    }

    /// Parse a JSON trace as written by the instrumenting producer
    pub fn from_json(json: &str) -> Result<Self, ProducerError> {
        let raw: RawTrace = serde_json::from_str(json)?;
        raw.resolve()
    }
}

/// Label statement steps `l<line>:<ordinal>`
///
/// The ordinal ranks the distinct statement ranges that start on a line by
/// their start column, so every execution of the same statement gets the
/// same label. Labels already set by the producer are kept.
pub fn assign_statement_refs(steps: &mut [Step]) {
    let mut by_line: BTreeMap<usize, BTreeSet<SourceRange>> = BTreeMap::new();
    for step in steps.iter().filter(|s| s.action == Action::Statement) {
        if let Some(range) = step.range {
            by_line.entry(range.start.line).or_default().insert(range);
        }
    }

    let labels: FxHashMap<SourceRange, String> = by_line
        .into_iter()
        .flat_map(|(line, ranges)| {
            ranges
                .into_iter()
                .enumerate()
                .map(move |(ordinal, range)| (range, format!("l{}:{}", line, ordinal + 1)))
        })
        .collect();

    for step in steps.iter_mut().filter(|s| s.action == Action::Statement) {
        if step.reference.is_none() {
            step.reference = step.range.and_then(|range| labels.get(&range).cloned());
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawTrace {
    code: String,
    #[serde(default)]
    nodes: Vec<RawNode>,
    #[serde(default)]
    steps: Vec<RawStep>,
    #[serde(default)]
    types: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RawNode {
    id: NodeId,
    #[serde(rename = "parentId", default)]
    parent_id: Option<NodeId>,
    range: WireRange,
}

#[derive(Debug, Deserialize)]
struct RawStep {
    action: String,
    #[serde(rename = "nodeId", default)]
    node_id: Option<NodeId>,
    #[serde(alias = "range", default)]
    location: Option<WireRange>,
    #[serde(default)]
    identifier: Option<String>,
    #[serde(rename = "dataType", default)]
    data_type: Option<String>,
    #[serde(rename = "dataValue", default)]
    data_value: Option<DataValue>,
    #[serde(default)]
    scope: Option<WireRange>,
    #[serde(rename = "ref", default)]
    reference: Option<String>,
    #[serde(alias = "text", default)]
    value: Option<String>,
}

impl RawTrace {
    fn resolve(self) -> Result<Trace, ProducerError> {
        let index = LineIndex::new(&self.code);
        let convert = |wire: &WireRange| {
            wire.resolve(&index)
                .ok_or_else(|| ProducerError::MalformedLocation(format!("{:?}", wire)))
        };

        let nodes = self
            .nodes
            .iter()
            .map(|raw| Ok(SyntaxNode::new(raw.id, raw.parent_id, convert(&raw.range)?)))
            .collect::<Result<Vec<_>, ProducerError>>()?;

        let mut steps = Vec::with_capacity(self.steps.len());
        for raw in self.steps {
            let action =
                Action::from_wire(&raw.action).ok_or_else(|| ProducerError::UnknownAction(raw.action.clone()))?;

            let value = match (raw.data_type, raw.data_value) {
                (Some(data_type), Some(data_value)) => Some(TypedValue { data_type, data_value }),
                (None, _) if action.carries_value() => {
                    return Err(ProducerError::MissingKey { key: "dataType" });
                }
                (Some(data_type), None) if action.carries_value() => {
                    return Err(ProducerError::MissingPayload {
                        action: action.to_string(),
                        data_type,
                    });
                }
                _ => None,
            };

            steps.push(Step {
                action,
                node_id: raw.node_id,
                range: raw.location.as_ref().map(&convert).transpose()?,
                identifier: raw.identifier,
                value,
                scope: raw.scope.as_ref().map(&convert).transpose()?,
                reference: raw.reference,
                text: raw.value,
            });
        }

        let mut trace = Trace::new(self.code, nodes, steps)?;
        trace.types = self.types;
        Ok(trace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use location::SourceLocation;

    #[test]
    fn test_from_json_resolves_node_ranges_and_scopes() {
        let json = r#"{
            "code": "int main() {\n  int x = 5;\n}",
            "nodes": [
                { "id": 1, "parentId": null, "range": [1, 12, 3, 1] },
                { "id": 2, "parentId": 1, "range": [2, 3, 2, 12] }
            ],
            "steps": [
                { "action": "stat", "nodeId": 2 },
                { "action": "decl", "nodeId": 2, "identifier": "x", "dataType": "int", "dataValue": 5 }
            ]
        }"#;
        let trace = Trace::from_json(json).unwrap();

        let decl = &trace.steps[1];
        assert_eq!(decl.range, Some(SourceRange::from_inclusive(2, 3, 2, 12)));
        assert_eq!(decl.scope, Some(SourceRange::from_inclusive(1, 12, 3, 1)));
        assert_eq!(decl.data_value(), Some(&DataValue::Int(5)));
        assert_eq!(trace.steps[0].reference.as_deref(), Some("l2:1"));
    }

    #[test]
    fn test_from_json_accepts_offset_ranges() {
        let json = r#"{
            "code": "a = 1;\nb = 2;",
            "steps": [
                { "action": "stat", "location": { "startIndex": 7, "endIndex": 13 } }
            ]
        }"#;
        let trace = Trace::from_json(json).unwrap();
        let range = trace.steps[0].range.unwrap();
        assert_eq!(range.start, SourceLocation::new(2, 1));
        assert_eq!(range.end, SourceLocation::new(2, 7));
    }

    #[test]
    fn test_from_json_rejects_unknown_action() {
        let json = r#"{ "code": "", "steps": [ { "action": "jump" } ] }"#;
        assert!(matches!(
            Trace::from_json(json),
            Err(ProducerError::UnknownAction(name)) if name == "jump"
        ));
    }

    #[test]
    fn test_from_json_requires_data_type_for_values() {
        let json = r#"{ "code": "x;", "steps": [ { "action": "eval", "dataValue": 1 } ] }"#;
        assert!(matches!(
            Trace::from_json(json),
            Err(ProducerError::MissingKey { key: "dataType" })
        ));
    }

    #[test]
    fn test_unknown_node_is_rejected() {
        let steps = vec![Step::new(Action::Statement).with_node(9)];
        assert!(matches!(
            Trace::new(String::new(), Vec::new(), steps),
            Err(ProducerError::UnknownNode(9))
        ));
    }

    #[test]
    fn test_statement_refs_rank_by_column() {
        let first = SourceRange::from_inclusive(3, 5, 3, 10);
        let second = SourceRange::from_inclusive(3, 12, 3, 20);
        let mut steps = vec![
            Step::new(Action::Statement).with_range(second),
            Step::new(Action::Statement).with_range(first),
            Step::new(Action::Statement).with_range(second),
            Step::new(Action::Statement)
                .with_range(first)
                .with_reference("custom"),
        ];
        assign_statement_refs(&mut steps);

        let refs: Vec<_> = steps.iter().map(|s| s.reference.as_deref()).collect();
        assert_eq!(refs, vec![Some("l3:2"), Some("l3:1"), Some("l3:2"), Some("custom")]);
    }
}
