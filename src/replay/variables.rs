//! Projection of declaration and assignment steps onto live variables

use super::predicates::{is_assignment_step, is_declaration_step, is_parameter_step};
use crate::trace::location::SourceRange;
use crate::trace::step::{DataValue, Step};
use rustc_hash::FxHashMap;

/// A variable as it stands at the end of a step prefix
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub identifier: String,
    pub data_type: String,
    pub data_value: Option<DataValue>,
    /// Lexical range in which the declaration is visible
    pub scope: Option<SourceRange>,
}

/// Every declared variable with its most recent value
///
/// Declarations and parameters both introduce variables. A redeclaration
/// of an identifier replaces the earlier one entirely; its value is then
/// the last assignment made after that declaration, or the declared value.
/// Output order is the order in which identifiers were first declared.
pub fn current_variables(steps: &[Step]) -> Vec<Variable> {
    let mut order: Vec<&str> = Vec::new();
    let mut last_declaration: FxHashMap<&str, usize> = FxHashMap::default();

    for (index, step) in steps.iter().enumerate() {
        if !(is_declaration_step(step) || is_parameter_step(step)) {
            continue;
        }
        let Some(identifier) = step.identifier.as_deref() else {
            continue;
        };
        if last_declaration.insert(identifier, index).is_none() {
            order.push(identifier);
        }
    }

    order
        .into_iter()
        .map(|identifier| {
            let declared_at = last_declaration[identifier];
            let declaration = &steps[declared_at];
            let latest = steps[declared_at + 1..]
                .iter()
                .rev()
                .find(|step| is_assignment_step(step) && step.identifier.as_deref() == Some(identifier))
                .and_then(Step::data_value)
                .or_else(|| declaration.data_value());

            Variable {
                identifier: identifier.to_string(),
                data_type: declaration.data_type().unwrap_or_default().to_string(),
                data_value: latest.cloned(),
                scope: declaration.scope,
            }
        })
        .collect()
}

/// Variables whose scope contains `active`, the range of the running statement
///
/// Variables without a recorded scope are always visible. With no active
/// statement every variable is returned.
pub fn scoped_variables(steps: &[Step], active: Option<&SourceRange>) -> Vec<Variable> {
    let variables = current_variables(steps);
    match active {
        Some(active) => variables
            .into_iter()
            .filter(|variable| variable.scope.map_or(true, |scope| scope.contains(active)))
            .collect(),
        None => variables,
    }
}
