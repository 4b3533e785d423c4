//! Call tree pane rendering
//!
//! Calls are listed depth first, indented by nesting. Finished calls are
//! dimmed and show their return value; calls still in progress are bright.

use super::clamp_scroll;
use super::source::pane_block;
use crate::reconstruct::format::format_value;
use crate::replay::call_tree::CallNode;
use crate::trace::step::Step;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
    Frame,
};

fn step_value(step: &Step) -> Option<String> {
    step.value
        .as_ref()
        .map(|value| format_value(&value.data_type, &value.data_value))
}

fn call_signature(call: &CallNode) -> String {
    let arguments: Vec<String> = call
        .parameters
        .iter()
        .map(|parameter| match (parameter.identifier.as_deref(), step_value(parameter)) {
            (Some(name), Some(value)) => format!("{}={}", name, value),
            (None, Some(value)) => value,
            (Some(name), None) => name.to_string(),
            (None, None) => "?".to_string(),
        })
        .collect();
    format!("{}({})", call.name(), arguments.join(", "))
}

/// Flatten the tree into display lines
pub fn call_lines(root: &CallNode) -> Vec<Line<'static>> {
    let mut lines = Vec::with_capacity(root.size());
    let mut pending: Vec<(&CallNode, usize)> = vec![(root, 0)];

    while let Some((call, depth)) = pending.pop() {
        let style = if call.is_finished() {
            Style::default().fg(DEFAULT_THEME.muted_function)
        } else {
            Style::default()
                .fg(DEFAULT_THEME.function)
                .add_modifier(Modifier::BOLD)
        };

        let mut spans = vec![
            Span::raw("  ".repeat(depth)),
            Span::styled(call_signature(call), style),
        ];
        if let Some(value) = call.returns.first().and_then(step_value) {
            spans.push(Span::styled(" → ", Style::default().fg(DEFAULT_THEME.comment)));
            spans.push(Span::styled(value, Style::default().fg(DEFAULT_THEME.value)));
        }
        lines.push(Line::from(spans));

        pending.extend(call.subcalls.iter().rev().map(|sub| (sub, depth + 1)));
    }

    lines
}

pub fn render_calls_pane(
    frame: &mut Frame,
    area: Rect,
    tree: Option<&CallNode>,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(" Calls ", is_focused);

    let Some(root) = tree else {
        let paragraph = Paragraph::new("(no calls)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    };

    let lines = call_lines(root);
    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    clamp_scroll(scroll_offset, lines.len(), visible_height);

    let items: Vec<ListItem> = lines
        .into_iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(ListItem::new)
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
