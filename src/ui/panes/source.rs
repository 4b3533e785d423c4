//! Source code pane rendering
//!
//! Displays the original program with syntax highlighting. The active
//! statement's range is shaded and its first line gets an arrow marker.
//! The pane keeps the current line at a fixed visual row while stepping.

use super::syntax::{char_index, numbered_line, patch_range, style_line};
use crate::trace::location::SourceRange;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Scroll state for the code panes
#[derive(Debug, Default)]
pub struct SourceScrollState {
    pub offset: usize,
    pub target_line_row: Option<usize>,
}

impl SourceScrollState {
    /// Scroll so that `current_line` sits on the target row
    pub fn follow(&mut self, current_line: Option<usize>, total_lines: usize, visible_height: usize) {
        let target_row = self
            .target_line_row
            .unwrap_or(visible_height / 2)
            .min(visible_height.saturating_sub(1));
        self.target_line_row = Some(target_row);

        let Some(line) = current_line.filter(|&line| line > 0 && line <= total_lines) else {
            return;
        };
        self.offset = if total_lines > visible_height {
            (line - 1).saturating_sub(target_row).min(total_lines - visible_height)
        } else {
            0
        };
    }

    /// Move the current line down one row
    pub fn scroll_up(&mut self) {
        if let Some(row) = self.target_line_row {
            self.target_line_row = Some(row.saturating_add(1));
        }
    }

    /// Move the current line up one row
    pub fn scroll_down(&mut self) {
        if let Some(row) = self.target_line_row {
            self.target_line_row = Some(row.saturating_sub(1));
        }
    }
}

pub fn pane_block(title: &str, is_focused: bool) -> Block<'_> {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style)
}

/// Render the source code pane
pub fn render_source_pane(
    frame: &mut Frame,
    area: Rect,
    source_code: &str,
    statement: Option<SourceRange>,
    is_focused: bool,
    scroll_state: &mut SourceScrollState,
) {
    let block = pane_block(" Source Code ", is_focused);
    let lines: Vec<&str> = source_code.lines().collect();
    let visible_height = area.height.saturating_sub(2).max(1) as usize;

    let current_line = statement.map(|range| range.start.line);
    scroll_state.follow(current_line, lines.len(), visible_height);

    let shade = Style::default().bg(DEFAULT_THEME.statement_bg);
    let visible_lines: Vec<Line> = lines
        .iter()
        .enumerate()
        .skip(scroll_state.offset)
        .take(visible_height)
        .map(|(idx, line)| {
            let line_num = idx + 1;
            let mut chars = style_line(line);
            if let Some(range) = statement {
                if (range.start.line..=range.end.line).contains(&line_num) {
                    let from = if line_num == range.start.line {
                        range.start.column.saturating_sub(1)
                    } else {
                        0
                    };
                    let to = if line_num == range.end.line {
                        range.end.column.saturating_sub(1)
                    } else {
                        line.len()
                    };
                    patch_range(&mut chars, char_index(line, from)..char_index(line, to), shade);
                }
            }
            numbered_line(line_num, Some(line_num) == current_line, chars)
        })
        .collect();

    let paragraph = Paragraph::new(visible_lines).block(block);
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_follow_keeps_current_line_on_target_row() {
        let mut state = SourceScrollState::default();
        state.follow(Some(30), 100, 10);
        assert_eq!(state.target_line_row, Some(5));
        assert_eq!(state.offset, 24);

        state.follow(Some(99), 100, 10);
        assert_eq!(state.offset, 90);
    }

    #[test]
    fn test_short_files_never_scroll() {
        let mut state = SourceScrollState::default();
        state.follow(Some(4), 5, 10);
        assert_eq!(state.offset, 0);
    }
}
