//! Per-character C syntax styling shared by the code panes
//!
//! Lines are styled one character at a time so that the active statement
//! can be overlaid on any column range before the characters are grouped
//! back into spans.

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};
use std::ops::Range;

pub type StyledChars = Vec<(char, Style)>;

/// Style every character of a source line
pub fn style_line(line: &str) -> StyledChars {
    let chars: Vec<char> = line.chars().collect();
    let mut styled = Vec::with_capacity(chars.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        // Line comment runs to the end
        if c == '/' && chars.get(i + 1) == Some(&'/') {
            let style = Style::default().fg(DEFAULT_THEME.comment);
            styled.extend(chars[i..].iter().map(|&c| (c, style)));
            break;
        }

        if c == '"' || c == '\'' {
            let mut end = i + 1;
            while end < chars.len() && chars[end] != c {
                end += if chars[end] == '\\' { 2 } else { 1 };
            }
            let end = (end + 1).min(chars.len());
            let style = Style::default().fg(DEFAULT_THEME.string);
            styled.extend(chars[i..end].iter().map(|&c| (c, style)));
            i = end;
            continue;
        }

        if c.is_alphanumeric() || c == '_' {
            let start = i;
            while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            let word: String = chars[start..i].iter().collect();
            let is_call = chars.get(i) == Some(&'(');
            let style = word_style(&word, is_call);
            styled.extend(chars[start..i].iter().map(|&c| (c, style)));
            continue;
        }

        let style = match c {
            '{' | '}' | '(' | ')' | '[' | ']' => Style::default().fg(DEFAULT_THEME.primary),
            _ => Style::default().fg(DEFAULT_THEME.fg),
        };
        styled.push((c, style));
        i += 1;
    }

    styled
}

fn word_style(word: &str, is_call: bool) -> Style {
    match word {
        "int" | "char" | "void" | "bool" | "_Bool" | "float" | "double" | "long" | "short"
        | "unsigned" | "signed" | "const" => Style::default().fg(DEFAULT_THEME.type_name),
        "struct" | "return" | "if" | "else" | "while" | "for" | "do" | "switch" | "case"
        | "default" | "break" | "continue" | "goto" | "sizeof" => Style::default()
            .fg(DEFAULT_THEME.keyword)
            .add_modifier(Modifier::BOLD),
        "NULL" => Style::default().fg(DEFAULT_THEME.number),
        _ if word.starts_with(|c: char| c.is_ascii_digit()) => Style::default().fg(DEFAULT_THEME.number),
        _ if is_call => Style::default().fg(DEFAULT_THEME.function),
        _ => Style::default().fg(DEFAULT_THEME.fg),
    }
}

/// Patch `style` onto the characters in `range`, clamped to the line
pub fn patch_range(chars: &mut StyledChars, range: Range<usize>, style: Style) {
    let end = range.end.min(chars.len());
    let start = range.start.min(end);
    for (_, char_style) in &mut chars[start..end] {
        *char_style = char_style.patch(style);
    }
}

/// Group consecutive characters with equal style into spans
pub fn to_spans(chars: StyledChars) -> Vec<Span<'static>> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut text = String::new();
    let mut current: Option<Style> = None;

    for (c, style) in chars {
        if current.is_some_and(|s| s != style) {
            spans.push(Span::styled(std::mem::take(&mut text), current.unwrap_or_default()));
        }
        current = Some(style);
        text.push(c);
    }
    if let Some(style) = current {
        spans.push(Span::styled(text, style));
    }
    spans
}

/// Build a numbered line, marking the line number when it is current
pub fn numbered_line(line_num: usize, is_current: bool, chars: StyledChars) -> Line<'static> {
    let num_style = if is_current {
        Style::default()
            .fg(DEFAULT_THEME.secondary)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.comment)
    };
    let marker = if is_current { "▶" } else { " " };

    let mut spans = vec![Span::styled(format!("{:4}{} ", line_num, marker), num_style)];
    spans.extend(to_spans(chars));
    Line::from(spans)
}

/// Character index of a byte offset within `line`
pub fn char_index(line: &str, byte: usize) -> usize {
    line.get(..byte.min(line.len()))
        .map_or_else(|| line.chars().count(), |prefix| prefix.chars().count())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(spans: &[Span]) -> String {
        spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_styling_keeps_every_character() {
        let line = "int x = f(\"a;b\", 'c'); // done";
        let styled = style_line(line);
        assert_eq!(styled.len(), line.chars().count());
        assert_eq!(text(&to_spans(styled)), line);
    }

    #[test]
    fn test_patch_range_is_clamped() {
        let mut styled = style_line("x = 1;");
        let bg = Style::default().bg(DEFAULT_THEME.statement_bg);
        patch_range(&mut styled, 4..100, bg);
        assert_eq!(styled[3].1.bg, None);
        assert_eq!(styled[5].1.bg, Some(DEFAULT_THEME.statement_bg));
    }

    #[test]
    fn test_char_index_counts_multibyte() {
        assert_eq!(char_index("é = 1;", 2), 1);
        assert_eq!(char_index("abc", 10), 3);
    }
}
