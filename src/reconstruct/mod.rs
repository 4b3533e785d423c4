//! Rebuilding source text from evaluated steps
//!
//! - [`interval`]: segment selection, splicing and span transformation
//! - [`format`]: rendering a typed value as C source text
//! - [`source`]: evaluated code and the highlight mask for a step prefix

pub mod format;
pub mod interval;
pub mod source;
