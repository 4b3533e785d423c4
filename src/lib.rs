//! # Introduction
//!
//! stepscope replays the execution trace of an instrumented C program one
//! step at a time. A producer runs the program once and hands over the
//! source, its syntax nodes and an ordered list of steps; everything else
//! is a pure query over the steps up to a cursor, so the history can be
//! navigated forward and backward through a terminal UI built with
//! [ratatui](https://docs.rs/ratatui).
//!
//! ## Pipeline
//!
//! ```text
//! Producer → Trace (code, nodes, steps) → Simulation + cursor → queries → TUI
//! ```
//!
//! 1. [`producer`]: the boundary. Decodes notifications and payloads into
//!    steps and guards against runaway programs.
//! 2. [`trace`]: the data model: canonical source ranges, syntax nodes and
//!    the [`trace::step::Step`] tagged union.
//! 3. [`replay`]: step predicates, cursor navigation, the call tree and
//!    live variables.
//! 4. [`reconstruct`]: evaluated code, the source with the active
//!    statement's values substituted, and its highlight mask.
//! 5. [`session`]: the [`session::Simulation`] that owns a trace and cursor.
//! 6. [`ui`]: ratatui-based TUI; not part of the stable library API.

pub mod config;
pub mod constants;
pub mod errors;
pub mod producer;
pub mod reconstruct;
pub mod replay;
pub mod session;
pub mod trace;
pub mod ui;
