//! Steps: the atomic events of a simulation trace
//!
//! A [`Step`] is tagged with an [`Action`]; the remaining fields are filled
//! according to that action:
//!
//! | Action | range | identifier | value | scope | text |
//! |---|---|---|---|---|---|
//! | `stat` | yes | | | | |
//! | `eval` / `expression` | yes | | yes | | |
//! | `decl` / `par` | yes | yes | yes | yes | |
//! | `assign` | yes | yes | yes | | |
//! | `invocation` | yes | yes | | | |
//! | `return` | optional | | optional | | |
//! | `stdout` / `stderr` | | | | | yes |
//!
//! Steps are decoded once at the producer boundary; nothing downstream
//! re-parses strings.

use super::location::SourceRange;
use super::node::NodeId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    #[serde(rename = "stat")]
    Statement,
    #[serde(rename = "eval")]
    Eval,
    #[serde(rename = "decl")]
    Declaration,
    #[serde(rename = "assign")]
    Assignment,
    #[serde(rename = "par", alias = "parameter")]
    Parameter,
    #[serde(rename = "invocation")]
    Invocation,
    #[serde(rename = "return")]
    Return,
    #[serde(rename = "stdout")]
    Stdout,
    #[serde(rename = "stderr")]
    Stderr,
    /// Evaluation step emitted by early producers
    #[serde(rename = "expression")]
    Expression,
}

impl Action {
    /// Parse the wire spelling used in notification metadata
    pub fn from_wire(name: &str) -> Option<Self> {
        let action = match name {
            "stat" => Action::Statement,
            "eval" => Action::Eval,
            "decl" => Action::Declaration,
            "assign" => Action::Assignment,
            "par" | "parameter" => Action::Parameter,
            "invocation" => Action::Invocation,
            "return" => Action::Return,
            "stdout" => Action::Stdout,
            "stderr" => Action::Stderr,
            "expression" => Action::Expression,
            _ => return None,
        };
        Some(action)
    }

    pub fn as_wire(self) -> &'static str {
        match self {
            Action::Statement => "stat",
            Action::Eval => "eval",
            Action::Declaration => "decl",
            Action::Assignment => "assign",
            Action::Parameter => "par",
            Action::Invocation => "invocation",
            Action::Return => "return",
            Action::Stdout => "stdout",
            Action::Stderr => "stderr",
            Action::Expression => "expression",
        }
    }

    /// Actions that carry a decoded data payload
    pub fn carries_value(self) -> bool {
        matches!(
            self,
            Action::Eval
                | Action::Expression
                | Action::Declaration
                | Action::Assignment
                | Action::Parameter
        )
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

/// A decoded runtime value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataValue {
    Int(i64),
    Float(f64),
    Text(String),
    /// Pointer with a snapshot of the bytes around its pointee
    Pointer { address: u32, bytes: Vec<u8> },
}

impl DataValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            DataValue::Int(n) => Some(*n as f64),
            DataValue::Float(x) => Some(*x),
            DataValue::Pointer { address, .. } => Some(f64::from(*address)),
            DataValue::Text(_) => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            DataValue::Int(n) => Some(*n),
            DataValue::Float(x) => Some(x.trunc() as i64),
            DataValue::Pointer { address, .. } => Some(i64::from(*address)),
            DataValue::Text(_) => None,
        }
    }
}

impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataValue::Int(n) => write!(f, "{}", n),
            DataValue::Float(x) => write!(f, "{}", x),
            DataValue::Text(s) => f.write_str(s),
            DataValue::Pointer { address, .. } => write!(f, "0x{:08x}", address),
        }
    }
}

impl From<i64> for DataValue {
    fn from(n: i64) -> Self {
        DataValue::Int(n)
    }
}

impl From<i32> for DataValue {
    fn from(n: i32) -> Self {
        DataValue::Int(i64::from(n))
    }
}

impl From<f64> for DataValue {
    fn from(x: f64) -> Self {
        DataValue::Float(x)
    }
}

impl From<&str> for DataValue {
    fn from(s: &str) -> Self {
        DataValue::Text(s.to_string())
    }
}

/// A value together with the producer's type name for it
#[derive(Debug, Clone, PartialEq)]
pub struct TypedValue {
    pub data_type: String,
    pub data_value: DataValue,
}

/// One instrumentation event
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub action: Action,
    pub node_id: Option<NodeId>,
    /// Source range, resolved from the node when the producer sent only an id
    pub range: Option<SourceRange>,
    pub identifier: Option<String>,
    pub value: Option<TypedValue>,
    /// Lexical scope of a declaration or parameter
    pub scope: Option<SourceRange>,
    /// Statement label `l<line>:<ordinal>`
    pub reference: Option<String>,
    /// Text written by `stdout` / `stderr` steps
    pub text: Option<String>,
}

impl Step {
    pub fn new(action: Action) -> Self {
        Step {
            action,
            node_id: None,
            range: None,
            identifier: None,
            value: None,
            scope: None,
            reference: None,
            text: None,
        }
    }

    pub fn with_node(mut self, node_id: NodeId) -> Self {
        self.node_id = Some(node_id);
        self
    }

    pub fn with_range(mut self, range: SourceRange) -> Self {
        self.range = Some(range);
        self
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    pub fn with_value(mut self, data_type: impl Into<String>, data_value: impl Into<DataValue>) -> Self {
        self.value = Some(TypedValue {
            data_type: data_type.into(),
            data_value: data_value.into(),
        });
        self
    }

    pub fn with_scope(mut self, scope: SourceRange) -> Self {
        self.scope = Some(scope);
        self
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn data_type(&self) -> Option<&str> {
        self.value.as_ref().map(|v| v.data_type.as_str())
    }

    pub fn data_value(&self) -> Option<&DataValue> {
        self.value.as_ref().map(|v| &v.data_value)
    }
}
