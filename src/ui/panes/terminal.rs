//! Program output pane rendering

use super::clamp_scroll;
use super::source::pane_block;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{List, ListItem, Padding},
    Frame,
};

/// Render the program output, banner included
pub fn render_terminal_pane(
    frame: &mut Frame,
    area: Rect,
    output: &str,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(" Output ", is_focused).padding(Padding::new(1, 0, 0, 0));
    let lines: Vec<&str> = output.lines().collect();

    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    clamp_scroll(scroll_offset, lines.len(), visible_height);

    let items: Vec<ListItem> = lines
        .iter()
        .enumerate()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|(idx, line)| {
            // The first line is the shell banner
            let color = if idx == 0 { DEFAULT_THEME.comment } else { DEFAULT_THEME.fg };
            ListItem::new(line.to_string()).style(Style::default().fg(color))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
