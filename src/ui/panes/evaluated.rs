//! Evaluated code pane rendering
//!
//! Shows the program with the active statement's evaluated values
//! substituted, shading the columns the highlight mask marks.

use super::source::{pane_block, SourceScrollState};
use super::syntax::{numbered_line, patch_range, style_line};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::Line,
    widgets::Paragraph,
    Frame,
};
use std::ops::Range;

/// Character ranges marked on each mask line, by 1-based line number
fn mask_ranges(mask: &str, block: char) -> Vec<(usize, Range<usize>)> {
    mask.split('\n')
        .enumerate()
        .filter_map(|(idx, line)| {
            let indent = line.chars().take_while(|&c| c == ' ').count();
            let width = line.chars().skip(indent).take_while(|&c| c == block).count();
            (width > 0).then(|| (idx + 1, indent..indent + width))
        })
        .collect()
}

pub fn render_evaluated_pane(
    frame: &mut Frame,
    area: Rect,
    evaluated_code: &str,
    mask: Option<&str>,
    block_char: char,
    is_focused: bool,
    scroll_state: &mut SourceScrollState,
) {
    let block = pane_block(" Evaluated ", is_focused);
    let lines: Vec<&str> = evaluated_code.lines().collect();
    let visible_height = area.height.saturating_sub(2).max(1) as usize;

    let marked = mask.map(|mask| mask_ranges(mask, block_char)).unwrap_or_default();
    let current_line = marked.first().map(|(line, _)| *line);
    scroll_state.follow(current_line, lines.len(), visible_height);

    let shade = Style::default()
        .bg(DEFAULT_THEME.statement_bg)
        .add_modifier(Modifier::BOLD);
    let visible_lines: Vec<Line> = lines
        .iter()
        .enumerate()
        .skip(scroll_state.offset)
        .take(visible_height)
        .map(|(idx, line)| {
            let line_num = idx + 1;
            let mut chars = style_line(line);
            for (_, range) in marked.iter().filter(|(marked_line, _)| *marked_line == line_num) {
                patch_range(&mut chars, range.clone(), shade);
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
    fn test_mask_ranges_skip_empty_lines() {
        assert_eq!(mask_ranges("\n  ####\n", '#'), vec![(2, 2..6)]);
        assert!(mask_ranges("\n\n", '#').is_empty());
    }
}
