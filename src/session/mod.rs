//! Simulation session
//!
//! A [`Simulation`] owns everything one replay needs: the producer, the
//! code and steps it returned, and a cursor into the steps. The cursor is
//! the only state that changes after [`Simulation::run`]; every query
//! re-derives its answer from the steps up to and including the cursor.
//!
//! The cursor stops on steps matching the step mode, plus one final stop
//! on the last step of the history so that output and writes recorded
//! after the last match can be shown.

use crate::config::SimulatorConfig;
use crate::errors::{CallTreeError, ProducerError, ReconstructError};
use crate::producer::Producer;
use crate::reconstruct::source::{evaluated_code, highlighted_code};
use crate::replay::call_tree::{build_call_tree, CallNode};
use crate::replay::navigator::{active_range, current_statement, first_step, next_step, previous_step};
use crate::replay::predicates::{is_output_step, StepMode};
use crate::replay::variables::{current_variables, scoped_variables, Variable};
use crate::trace::node::NodeTree;
use crate::trace::step::Step;

pub struct Simulation<P: Producer> {
    producer: P,
    config: SimulatorConfig,
    code: String,
    nodes: NodeTree,
    steps: Vec<Step>,
    cursor: usize,
    started: bool,
}

impl<P: Producer> Simulation<P> {
    pub fn new(producer: P, config: SimulatorConfig) -> Self {
        Simulation {
            producer,
            config,
            code: String::new(),
            nodes: NodeTree::default(),
            steps: Vec::new(),
            cursor: 0,
            started: false,
        }
    }

    pub fn with_defaults(producer: P) -> Self {
        Self::new(producer, SimulatorConfig::default())
    }

    /// Run the producer and load its trace
    ///
    /// Only the first call does anything; a run that failed is not retried.
    /// The cursor starts on the first step matching the configured step
    /// mode, or on step 0 when none does.
    pub fn run(&mut self) -> Result<(), ProducerError> {
        if self.started {
            return Ok(());
        }
        self.started = true;

        let trace = self.producer.produce()?;
        if trace.steps.len() > self.config.step_limit {
            tracing::error!(
                steps = trace.steps.len(),
                limit = self.config.step_limit,
                "trace exceeds step limit"
            );
            return Err(ProducerError::StepLimitExceeded {
                limit: self.config.step_limit,
            });
        }

        self.code = trace.code;
        self.nodes = trace.nodes;
        self.steps = trace.steps;
        self.cursor = self.first_for(self.config.step_mode).unwrap_or(0);

        tracing::debug!(
            steps = self.steps.len(),
            nodes = self.nodes.len(),
            cursor = self.cursor,
            "simulation loaded"
        );
        Ok(())
    }

    /// Move to the next step in the configured mode; false at the end
    pub fn step_forward(&mut self) -> bool {
        self.step_forward_by(self.config.step_mode)
    }

    /// Move to the previous step in the configured mode; false at the start
    pub fn step_backward(&mut self) -> bool {
        self.step_backward_by(self.config.step_mode)
    }

    /// Move to the next step matching `mode`, or to the last step of the
    /// history once nothing after the cursor matches
    pub fn step_forward_by(&mut self, mode: StepMode) -> bool {
        let target = next_step(|step| mode.matches(step), &self.steps, self.cursor)
            .or_else(|| self.last_index().filter(|&last| last > self.cursor));
        match target {
            Some(target) => {
                self.cursor = target;
                true
            }
            None => false,
        }
    }

    pub fn step_backward_by(&mut self, mode: StepMode) -> bool {
        match previous_step(|step| mode.matches(step), &self.steps, self.cursor) {
            Some(target) => {
                self.cursor = target;
                true
            }
            None => false,
        }
    }

    /// Move to the first step in the configured mode
    pub fn rewind_to_start(&mut self) {
        self.cursor = self.first_for(self.config.step_mode).unwrap_or(0);
    }

    /// Move to the last step of the history
    pub fn jump_to_end(&mut self) {
        self.cursor = self.last_index().unwrap_or(0);
    }

    fn last_index(&self) -> Option<usize> {
        self.steps.len().checked_sub(1)
    }

    fn first_for(&self, mode: StepMode) -> Option<usize> {
        first_step(|step| mode.matches(step), &self.steps)
    }

    /// Steps up to and including the cursor
    fn visible_steps(&self) -> &[Step] {
        let end = (self.cursor + 1).min(self.steps.len());
        &self.steps[..end]
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn evaluated_code(&self) -> Result<String, ReconstructError> {
        evaluated_code(&self.code, self.visible_steps())
    }

    pub fn highlighted_code(&self) -> Result<Option<String>, ReconstructError> {
        highlighted_code(&self.code, self.visible_steps(), self.config.highlight_block)
    }

    /// Program output so far, behind the configured banner
    pub fn output(&self) -> String {
        let mut output = self.config.output_banner.clone();
        for step in self.visible_steps().iter().filter(|step| is_output_step(step)) {
            if let Some(text) = step.text.as_deref() {
                output.push_str(text);
            }
        }
        output
    }

    pub fn variables(&self) -> Vec<Variable> {
        let steps = self.visible_steps();
        if self.config.scoped_variables {
            scoped_variables(steps, active_range(steps).as_ref())
        } else {
            current_variables(steps)
        }
    }

    pub fn current_call_tree(&self) -> Result<Option<CallNode>, CallTreeError> {
        build_call_tree(self.visible_steps())
    }

    pub fn current_statement(&self) -> Option<&Step> {
        current_statement(self.visible_steps())
    }

    /// Label of the active statement, e.g. `l4:1`
    pub fn current_statement_ref(&self) -> Option<&str> {
        self.current_statement().and_then(|step| step.reference.as_deref())
    }

    pub fn current_step(&self) -> Option<&Step> {
        self.steps.get(self.cursor)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn total_steps(&self) -> usize {
        self.steps.len()
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn nodes(&self) -> &NodeTree {
        &self.nodes
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_at_end(&self) -> bool {
        self.last_index().map_or(true, |last| self.cursor >= last)
    }

    /// True when no earlier step matches `mode`
    pub fn is_at_start_by(&self, mode: StepMode) -> bool {
        previous_step(|step| mode.matches(step), &self.steps, self.cursor).is_none()
    }
}
