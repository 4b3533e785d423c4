//! The boundary to whatever runs the instrumented program
//!
//! A [`Producer`] runs once and hands back a complete [`Trace`]. The
//! replay engine never sees raw events: decoding happens here, and any
//! failure is surfaced before a malformed step can exist.
//!
//! - [`TraceFile`] reads a JSON trace written by an external producer
//! - [`Recorded`] serves a trace built in memory, e.g. by a [`Notifier`]
//! - [`notifier`] records live notifications into steps

pub mod decode;
pub mod metadata;
pub mod notifier;

pub use notifier::Notifier;

use crate::constants::DEFAULT_STEP_LIMIT;
use crate::errors::ProducerError;
use crate::trace::Trace;
use std::fs;
use std::path::PathBuf;

/// Something that can run a program and return its trace
pub trait Producer {
    fn produce(&mut self) -> Result<Trace, ProducerError>;
}

/// A trace stored as JSON on disk
#[derive(Debug, Clone)]
pub struct TraceFile {
    path: PathBuf,
    step_limit: usize,
}

impl TraceFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        TraceFile {
            path: path.into(),
            step_limit: DEFAULT_STEP_LIMIT,
        }
    }

    pub fn with_step_limit(mut self, step_limit: usize) -> Self {
        self.step_limit = step_limit;
        self
    }
}

impl Producer for TraceFile {
    fn produce(&mut self) -> Result<Trace, ProducerError> {
        let json = fs::read_to_string(&self.path)?;
        let trace = Trace::from_json(&json)?;
        if trace.steps.len() > self.step_limit {
            tracing::error!(
                path = %self.path.display(),
                steps = trace.steps.len(),
                limit = self.step_limit,
                "trace exceeds step limit"
            );
            return Err(ProducerError::StepLimitExceeded {
                limit: self.step_limit,
            });
        }
        tracing::debug!(path = %self.path.display(), steps = trace.steps.len(), "loaded trace");
        Ok(trace)
    }
}

/// A trace that was recorded ahead of time; it can be produced once
#[derive(Debug, Clone)]
pub struct Recorded {
    trace: Option<Trace>,
}

impl Recorded {
    pub fn new(trace: Trace) -> Self {
        Recorded { trace: Some(trace) }
    }
}

impl Producer for Recorded {
    fn produce(&mut self) -> Result<Trace, ProducerError> {
        self.trace.take().ok_or(ProducerError::AlreadyConsumed)
    }
}
