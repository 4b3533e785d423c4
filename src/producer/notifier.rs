//! The notification sink that turns producer events into steps
//!
//! Instrumented code registers notification templates under numeric
//! references up front, then calls [`Notifier::notify`] with a reference
//! and the raw payloads for that point in the program. Every template
//! registered under the reference becomes one step; value-bearing templates
//! each consume one payload, in order.
//!
//! The notifier also guards against runaway programs: once `step_limit`
//! steps have been recorded the next step fails with
//! [`ProducerError::StepLimitExceeded`], and every later call fails with
//! [`ProducerError::Halted`].

use super::decode::decode_value;
use super::metadata::{parse_metadata, Notification};
use crate::errors::ProducerError;
use crate::trace::node::SyntaxNode;
use crate::trace::step::{Action, Step, TypedValue};
use crate::trace::Trace;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone)]
pub struct Notifier {
    templates: FxHashMap<u32, Vec<Notification>>,
    steps: Vec<Step>,
    step_limit: usize,
    halted: bool,
}

impl Notifier {
    pub fn new(step_limit: usize) -> Self {
        Notifier {
            templates: FxHashMap::default(),
            steps: Vec::new(),
            step_limit,
            halted: false,
        }
    }

    /// Add a template under `reference`; a reference may hold several
    pub fn register(&mut self, reference: u32, notification: Notification) {
        self.templates.entry(reference).or_default().push(notification);
    }

    /// Parse `metadata` and register it under `reference`
    pub fn register_metadata(&mut self, reference: u32, metadata: &str) -> Result<(), ProducerError> {
        let notification = parse_metadata(metadata)?;
        self.register(reference, notification);
        Ok(())
    }

    /// Expand the templates registered under `reference` into steps
    ///
    /// All payloads are decoded before any step is recorded, so a decode
    /// failure leaves the step list untouched.
    pub fn notify(&mut self, reference: u32, payloads: &[&[u8]]) -> Result<(), ProducerError> {
        self.ensure_running()?;
        tracing::trace!(reference, payloads = payloads.len(), "notify");

        let templates = self
            .templates
            .get(&reference)
            .ok_or(ProducerError::UnknownReference(reference))?;
        let steps = expand(templates, payloads)?;

        for step in steps {
            self.push(step)?;
        }
        Ok(())
    }

    /// Record a single step described by an inline metadata string
    pub fn notify_metadata(&mut self, metadata: &str, payloads: &[&[u8]]) -> Result<(), ProducerError> {
        self.ensure_running()?;
        let notification = parse_metadata(metadata)?;
        for step in expand(std::slice::from_ref(&notification), payloads)? {
            self.push(step)?;
        }
        Ok(())
    }

    /// Record a line written to standard output
    pub fn print_stdout(&mut self, text: &str) -> Result<(), ProducerError> {
        self.print(Action::Stdout, text)
    }

    /// Record a line written to standard error
    pub fn print_stderr(&mut self, text: &str) -> Result<(), ProducerError> {
        self.print(Action::Stderr, text)
    }

    fn print(&mut self, action: Action, text: &str) -> Result<(), ProducerError> {
        self.ensure_running()?;
        self.push(Step::new(action).with_text(format!("{}\n", text)))
    }

    fn ensure_running(&self) -> Result<(), ProducerError> {
        if self.halted {
            Err(ProducerError::Halted)
        } else {
            Ok(())
        }
    }

    fn push(&mut self, step: Step) -> Result<(), ProducerError> {
        if self.steps.len() >= self.step_limit {
            self.halted = true;
            tracing::error!(limit = self.step_limit, "step limit exceeded, halting producer");
            return Err(ProducerError::StepLimitExceeded {
                limit: self.step_limit,
            });
        }
        self.steps.push(step);
        Ok(())
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Hand the recorded steps over as a resolved [`Trace`]
    pub fn finish(self, code: String, nodes: Vec<SyntaxNode>) -> Result<Trace, ProducerError> {
        Trace::new(code, nodes, self.steps)
    }
}

fn expand(templates: &[Notification], payloads: &[&[u8]]) -> Result<Vec<Step>, ProducerError> {
    let mut payloads = payloads.iter();
    templates
        .iter()
        .map(|template| {
            let mut step = template.to_step();
            if let Some(data_type) = template.data_type.as_deref() {
                match payloads.next() {
                    Some(payload) => {
                        step.value = Some(TypedValue {
                            data_type: data_type.to_string(),
                            data_value: decode_value(data_type, payload)?,
                        });
                    }
                    None if template.needs_payload() => {
                        return Err(ProducerError::MissingPayload {
                            action: template.action.to_string(),
                            data_type: data_type.to_string(),
                        });
                    }
                    None => {}
                }
            }
            Ok(step)
        })
        .collect()
}
