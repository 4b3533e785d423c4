//! Step classification predicates and stepping granularity

use crate::trace::step::{Action, Step};
use clap::ValueEnum;
use serde::Deserialize;

pub fn is_statement_step(step: &Step) -> bool {
    step.action == Action::Statement
}

/// Expression evaluations, including the legacy `expression` action
pub fn is_expression_step(step: &Step) -> bool {
    matches!(step.action, Action::Eval | Action::Expression)
}

pub fn is_invocation_step(step: &Step) -> bool {
    step.action == Action::Invocation
}

pub fn is_return_step(step: &Step) -> bool {
    step.action == Action::Return
}

pub fn is_declaration_step(step: &Step) -> bool {
    step.action == Action::Declaration
}

pub fn is_assignment_step(step: &Step) -> bool {
    step.action == Action::Assignment
}

pub fn is_parameter_step(step: &Step) -> bool {
    step.action == Action::Parameter
}

pub fn is_output_step(step: &Step) -> bool {
    matches!(step.action, Action::Stdout | Action::Stderr)
}

/// Default stepping granularity: stop on statements and expressions
pub fn is_break_step(step: &Step) -> bool {
    is_expression_step(step) || is_statement_step(step)
}

/// Which steps forward/backward navigation stops on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StepMode {
    #[default]
    Break,
    Statement,
    Expression,
}

impl StepMode {
    pub fn matches(self, step: &Step) -> bool {
        match self {
            StepMode::Break => is_break_step(step),
            StepMode::Statement => is_statement_step(step),
            StepMode::Expression => is_expression_step(step),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_break_step_covers_statements_and_expressions() {
        assert!(is_break_step(&Step::new(Action::Statement)));
        assert!(is_break_step(&Step::new(Action::Eval)));
        assert!(is_break_step(&Step::new(Action::Expression)));
        assert!(!is_break_step(&Step::new(Action::Declaration)));
        assert!(!is_break_step(&Step::new(Action::Stdout)));
    }

    #[test]
    fn test_step_modes() {
        let eval = Step::new(Action::Eval);
        let stat = Step::new(Action::Statement);

        assert!(StepMode::Expression.matches(&eval));
        assert!(!StepMode::Expression.matches(&stat));
        assert!(StepMode::Statement.matches(&stat));
        assert!(StepMode::Break.matches(&eval) && StepMode::Break.matches(&stat));
    }

    #[test]
    fn test_value_predicates() {
        assert!(is_declaration_step(&Step::new(Action::Declaration)));
        assert!(is_assignment_step(&Step::new(Action::Assignment)));
        assert!(is_parameter_step(&Step::new(Action::Parameter)));
        assert!(is_invocation_step(&Step::new(Action::Invocation)));
        assert!(is_return_step(&Step::new(Action::Return)));
        assert!(is_output_step(&Step::new(Action::Stderr)));
    }
}
