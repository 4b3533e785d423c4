//! TUI pane rendering modules
//!
//! - [`source`]: original program with the active statement shaded
//! - [`evaluated`]: program with evaluated values substituted
//! - [`variables`]: live variables at the cursor
//! - [`calls`]: call tree at the cursor
//! - [`terminal`]: program output
//! - [`status`]: status bar with keybindings and position
//!
//! Each pane exports a `render_*` function that draws from borrowed query
//! results; panes never talk to the session directly.

mod syntax;

pub mod calls;
pub mod evaluated;
pub mod source;
pub mod status;
pub mod terminal;
pub mod variables;

pub use calls::render_calls_pane;
pub use evaluated::render_evaluated_pane;
pub use source::{render_source_pane, SourceScrollState};
pub use status::{render_status_bar, StatusRenderData};
pub use terminal::render_terminal_pane;
pub use variables::render_variables_pane;

/// Clamp a list scroll offset so the last page stays full
fn clamp_scroll(offset: &mut usize, total_items: usize, visible_height: usize) {
    if total_items > visible_height {
        *offset = (*offset).min(total_items - visible_height);
    } else {
        *offset = 0;
    }
}
