//! Error types
//!
//! Errors fall into two groups:
//!
//! - [`ProducerError`] is raised at the producer boundary while events are
//!   decoded. Decode failures and the runaway-execution guard are both
//!   fatal: a corrupted or runaway feed cannot be continued.
//! - [`ReconstructError`] and [`CallTreeError`] come from queries over a
//!   step prefix whose shape the query cannot represent.
//!
//! Running out of steps while navigating is not an error; navigation
//! returns `None` instead.

use crate::trace::location::SourceRange;
use thiserror::Error;

/// Failures at the producer boundary
#[derive(Debug, Error)]
pub enum ProducerError {
    #[error("notification metadata is missing required key '{key}'")]
    MissingKey { key: &'static str },

    #[error("unknown step action '{0}'")]
    UnknownAction(String),

    #[error("unsupported data type '{0}'")]
    UnsupportedDataType(String),

    #[error("malformed location '{0}'")]
    MalformedLocation(String),

    #[error("step references unknown node {0}")]
    UnknownNode(usize),

    #[error("no data payload for {action} step of type '{data_type}'")]
    MissingPayload { action: String, data_type: String },

    #[error("payload for '{data_type}' needs {needed} bytes, got {got}")]
    PayloadTooShort {
        data_type: String,
        needed: usize,
        got: usize,
    },

    #[error("no notification registered for reference {0}")]
    UnknownReference(u32),

    #[error("too many steps (possible infinite loop): limit is {limit}")]
    StepLimitExceeded { limit: usize },

    #[error("producer halted after exceeding the step limit")]
    Halted,

    #[error("trace has already been produced")]
    AlreadyConsumed,

    #[error("failed to read trace: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse trace: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProducerError {
    /// True for the runaway-execution guard, as opposed to decode failures
    pub fn is_runaway(&self) -> bool {
        matches!(self, ProducerError::StepLimitExceeded { .. })
    }
}

/// Failures while rebuilding source text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconstructError {
    /// Highlighting a statement that spans several lines is not supported
    #[error("cannot highlight statement spanning lines {start_line}-{end_line}")]
    MultiLineHighlight { start_line: usize, end_line: usize },

    #[error("range {0} lies outside the source text")]
    RangeOutOfBounds(SourceRange),

    #[error("segment {start}..{end} is out of order or outside the text")]
    SegmentOutOfBounds { start: usize, end: usize },
}

/// Failures while rebuilding the call tree
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallTreeError {
    #[error("return step {index} has no matching invocation")]
    UnmatchedReturn { index: usize },

    #[error("step prefix contains {count} top-level calls")]
    MultipleRoots { count: usize },
}

/// Failures loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Any failure surfaced through a simulation session
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Producer(#[from] ProducerError),

    #[error(transparent)]
    Reconstruct(#[from] ReconstructError),

    #[error(transparent)]
    CallTree(#[from] CallTreeError),

    #[error("failed to write replay: {0}")]
    Io(#[from] std::io::Error),
}
