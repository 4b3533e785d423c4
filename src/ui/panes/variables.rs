//! Variables pane rendering

use super::clamp_scroll;
use super::source::pane_block;
use crate::reconstruct::format::format_value;
use crate::replay::variables::Variable;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
    Frame,
};

fn variable_line(variable: &Variable) -> Line<'static> {
    let value = variable
        .data_value
        .as_ref()
        .map_or_else(|| "?".to_string(), |value| format_value(&variable.data_type, value));

    Line::from(vec![
        Span::styled(
            format!("{} ", variable.data_type),
            Style::default().fg(DEFAULT_THEME.type_name),
        ),
        Span::styled(variable.identifier.clone(), Style::default().fg(DEFAULT_THEME.fg)),
        Span::styled(" = ", Style::default().fg(DEFAULT_THEME.comment)),
        Span::styled(value, Style::default().fg(DEFAULT_THEME.value)),
    ])
}

pub fn render_variables_pane(
    frame: &mut Frame,
    area: Rect,
    variables: &[Variable],
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(" Variables ", is_focused);

    if variables.is_empty() {
        let paragraph = Paragraph::new("(no variables)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    clamp_scroll(scroll_offset, variables.len(), visible_height);

    let items: Vec<ListItem> = variables
        .iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|variable| ListItem::new(variable_line(variable)))
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
