//! Queries over a step prefix
//!
//! Every function here is a pure projection of `steps[..=cursor]`; nothing
//! is cached between calls.

pub mod call_tree;
pub mod navigator;
pub mod predicates;
pub mod variables;
