//! Parsing of notification metadata strings
//!
//! The instrumented program describes every notification with a
//! semicolon-delimited `key=value` string, e.g. `a=eval;t=int;l=[2,5,2,9]`.
//!
//! | key | meaning | required |
//! |-----|---------|----------|
//! | `a` | action | always |
//! | `i` | identifier | no |
//! | `t` | data type | for value-bearing actions |
//! | `l` | location `[startLine, startColumn, endLine, endColumn]` | no |
//! | `n` | syntax node id | no |

use crate::errors::ProducerError;
use crate::trace::location::SourceRange;
use crate::trace::node::NodeId;
use crate::trace::step::{Action, Step};

/// A parsed notification template; the value is supplied at notify time
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub action: Action,
    pub identifier: Option<String>,
    pub data_type: Option<String>,
    pub location: Option<SourceRange>,
    pub node_id: Option<NodeId>,
}

impl Notification {
    /// True when notify must supply a payload for this template
    pub fn needs_payload(&self) -> bool {
        self.action.carries_value()
    }

    /// The step this template describes, without a value
    pub fn to_step(&self) -> Step {
        Step {
            action: self.action,
            node_id: self.node_id,
            range: self.location,
            identifier: self.identifier.clone(),
            value: None,
            scope: None,
            reference: None,
            text: None,
        }
    }
}

/// Parse a metadata string into a [`Notification`]
pub fn parse_metadata(metadata: &str) -> Result<Notification, ProducerError> {
    let mut action = None;
    let mut identifier = None;
    let mut data_type = None;
    let mut location = None;
    let mut node_id = None;

    for pair in metadata.split(';').map(str::trim).filter(|pair| !pair.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        match key.trim() {
            "a" => {
                let parsed = Action::from_wire(value.trim())
                    .ok_or_else(|| ProducerError::UnknownAction(value.trim().to_string()))?;
                action = Some(parsed);
            }
            "i" => identifier = Some(value.trim().to_string()),
            "t" => data_type = Some(value.trim().to_string()),
            "l" => location = Some(parse_location(value)?),
            "n" => {
                let parsed = value
                    .trim()
                    .parse::<NodeId>()
                    .map_err(|_| ProducerError::MalformedLocation(format!("node id '{}'", value)))?;
                node_id = Some(parsed);
            }
            other => tracing::trace!(key = other, "ignoring unknown metadata key"),
        }
    }

    let action = action.ok_or(ProducerError::MissingKey { key: "a" })?;
    if action.carries_value() && data_type.is_none() {
        return Err(ProducerError::MissingKey { key: "t" });
    }

    Ok(Notification {
        action,
        identifier,
        data_type,
        location,
        node_id,
    })
}

fn parse_location(value: &str) -> Result<SourceRange, ProducerError> {
    let malformed = || ProducerError::MalformedLocation(value.to_string());
    let [sl, sc, el, ec]: [usize; 4] = serde_json::from_str(value.trim()).map_err(|_| malformed())?;
    let range = SourceRange::from_inclusive(sl, sc, el, ec);
    if sl == 0 || sc == 0 || range.start > range.end {
        return Err(malformed());
    }
    Ok(range)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_eval_notification() {
        let parsed = parse_metadata("a=eval;t=int;l=[2,5,2,9]").unwrap();
        assert_eq!(parsed.action, Action::Eval);
        assert_eq!(parsed.data_type.as_deref(), Some("int"));
        assert_eq!(parsed.location, Some(SourceRange::from_inclusive(2, 5, 2, 9)));
        assert!(parsed.needs_payload());
    }

    #[test]
    fn test_parses_identifier_and_node() {
        let parsed = parse_metadata("a=decl;i=x;t=double;n=12").unwrap();
        assert_eq!(parsed.action, Action::Declaration);
        assert_eq!(parsed.identifier.as_deref(), Some("x"));
        assert_eq!(parsed.node_id, Some(12));
    }

    #[test]
    fn test_statement_needs_no_type() {
        let parsed = parse_metadata("a=stat;l=[1,1,1,10]").unwrap();
        assert!(!parsed.needs_payload());
        assert_eq!(parsed.data_type, None);
    }

    #[test]
    fn test_missing_action_is_rejected() {
        assert!(matches!(
            parse_metadata("t=int;l=[1,1,1,2]"),
            Err(ProducerError::MissingKey { key: "a" })
        ));
    }

    #[test]
    fn test_value_action_without_type_is_rejected() {
        assert!(matches!(
            parse_metadata("a=assign;i=x"),
            Err(ProducerError::MissingKey { key: "t" })
        ));
    }

    #[test]
    fn test_bad_action_and_location() {
        assert!(matches!(parse_metadata("a=jump"), Err(ProducerError::UnknownAction(_))));
        assert!(matches!(
            parse_metadata("a=stat;l=[1,2]"),
            Err(ProducerError::MalformedLocation(_))
        ));
        assert!(matches!(
            parse_metadata("a=stat;l=[2,1,1,1]"),
            Err(ProducerError::MalformedLocation(_))
        ));
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let parsed = parse_metadata("a=stat;x=whatever;").unwrap();
        assert_eq!(parsed.action, Action::Statement);
    }
}
