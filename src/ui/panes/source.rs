//! Source code pane rendering with syntax highlighting
//!
//! Renders one program (the exercise example or the learner's file) with
//! line numbers, the line being executed, and the errored line with its
//! message attached inline.
//!
//! # Rendering
//!
//! A small word tokenizer colours section keywords, type names, pin names,
//! numbers, strings and comments. Keywords match case-insensitively, like
//! the interpreter does.

use crate::board::LineError;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

fn highlight_source_code(line: &str) -> Line<'_> {
    let mut spans = Vec::new();
    let mut current_word = String::new();

    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        // Comments run to the end of the line
        if c == '/' && chars.get(i + 1) == Some(&'/') {
            flush_word(&mut spans, &mut current_word);
            let rest: String = chars[i..].iter().collect();
            spans.push(Span::styled(rest, Style::default().fg(DEFAULT_THEME.comment)));
            break;
        }

        if c == '"' {
            flush_word(&mut spans, &mut current_word);
            let mut end = i + 1;
            while end < chars.len() && chars[end] != '"' {
                end += 1;
            }
            end = (end + 1).min(chars.len());
            let text: String = chars[i..end].iter().collect();
            spans.push(Span::styled(text, Style::default().fg(DEFAULT_THEME.string)));
            i = end;
            continue;
        }

        if !c.is_alphanumeric() && c != '_' && c != '.' {
            flush_word(&mut spans, &mut current_word);
            let style = match c {
                '{' | '}' | '(' | ')' => Style::default().fg(DEFAULT_THEME.primary),
                _ => Style::default().fg(DEFAULT_THEME.fg),
            };
            spans.push(Span::styled(c.to_string(), style));
            i += 1;
            continue;
        }

        current_word.push(c);
        i += 1;
    }

    flush_word(&mut spans, &mut current_word);
    Line::from(spans)
}

fn flush_word(spans: &mut Vec<Span<'_>>, word: &mut String) {
    if !word.is_empty() {
        let style = word_style(word);
        spans.push(Span::styled(std::mem::take(word), style));
    }
}

fn word_style(word: &str) -> Style {
    let lower = word.to_lowercase();
    match lower.as_str() {
        "void" | "setup" | "loop" | "si" | "alors" | "sinon" => Style::default()
            .fg(DEFAULT_THEME.keyword)
            .add_modifier(Modifier::BOLD),
        "int" | "float" | "string" => Style::default().fg(DEFAULT_THEME.type_name),
        _ if is_pin_word(&lower) => Style::default().fg(DEFAULT_THEME.pin),
        _ if word.starts_with(|c: char| c.is_ascii_digit()) => {
            Style::default().fg(DEFAULT_THEME.number)
        }
        _ => Style::default().fg(DEFAULT_THEME.fg),
    }
}

/// `pin` followed by a digit, with or without an action suffix
fn is_pin_word(lower: &str) -> bool {
    lower
        .strip_prefix("pin")
        .is_some_and(|rest| rest.starts_with(|c: char| c.is_ascii_digit()))
}

/// Scroll state for a source pane
#[derive(Debug, Default)]
pub struct SourceScrollState {
    pub offset: usize,
}

impl SourceScrollState {
    pub fn scroll_up(&mut self) {
        self.offset = self.offset.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        self.offset = self.offset.saturating_add(1);
    }

    /// Bring `line` into a window of `height` rows
    fn follow(&mut self, line: usize, height: usize) {
        if line < self.offset {
            self.offset = line;
        } else if line >= self.offset + height {
            self.offset = line + 1 - height;
        }
    }
}

/// Render a source pane
#[allow(clippy::too_many_arguments)]
pub fn render_source_pane(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    source_code: &str,
    highlighted: Option<usize>,
    error: Option<&LineError>,
    is_focused: bool,
    scroll_state: &mut SourceScrollState,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(border_style);

    let lines: Vec<&str> = source_code.lines().collect();
    let visible_height = area.height.saturating_sub(2).max(1) as usize;

    if let Some(line) = error.map(|e| e.line).or(highlighted) {
        scroll_state.follow(line, visible_height);
    }
    let max_scroll = lines.len().saturating_sub(visible_height);
    scroll_state.offset = scroll_state.offset.min(max_scroll);

    if lines.is_empty() {
        let hint = Paragraph::new(Line::from(Span::styled(
            "(vide)",
            Style::default().fg(DEFAULT_THEME.comment),
        )))
        .block(block);
        frame.render_widget(hint, area);
        return;
    }

    let visible_lines: Vec<Line> = lines
        .iter()
        .enumerate()
        .skip(scroll_state.offset)
        .take(visible_height)
        .map(|(idx, line)| {
            let is_error = error.is_some_and(|e| e.line == idx);
            let is_current = highlighted == Some(idx);

            let marker = if is_current { "▶" } else { " " };
            let line_num_str = format!("{:3}{} ", idx + 1, marker);

            let mut content_line = highlight_source_code(line);

            let num_style = if is_error {
                for span in &mut content_line.spans {
                    span.style = Style::default()
                        .bg(DEFAULT_THEME.error)
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD);
                }
                Style::default()
                    .fg(DEFAULT_THEME.error)
                    .add_modifier(Modifier::BOLD)
            } else if is_current {
                for span in &mut content_line.spans {
                    span.style = span.style.bg(DEFAULT_THEME.current_line_bg);
                }
                Style::default()
                    .fg(DEFAULT_THEME.secondary)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.comment)
            };

            let mut final_spans = vec![Span::styled(line_num_str, num_style)];
            final_spans.extend(content_line.spans);
            if let Some(error) = error.filter(|_| is_error) {
                final_spans.push(Span::styled(
                    format!("  ◀ {}", error.message),
                    Style::default().fg(DEFAULT_THEME.error),
                ));
            }
            Line::from(final_spans)
        })
        .collect();

    let paragraph = Paragraph::new(visible_lines).block(block);
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(line: &str) -> Vec<String> {
        highlight_source_code(line)
            .spans
            .into_iter()
            .map(|span| span.content.into_owned())
            .collect()
    }

    #[test]
    fn test_tokenizer_keeps_accented_words_whole() {
        assert_eq!(words("pin1_allumé;"), vec!["pin1_allumé", ";"]);
        assert_eq!(words("  // Rien ici"), vec![" ", " ", "// Rien ici"]);
    }

    #[test]
    fn test_word_styles() {
        assert_eq!(word_style("SI").fg, Some(DEFAULT_THEME.keyword));
        assert_eq!(word_style("String").fg, Some(DEFAULT_THEME.type_name));
        assert_eq!(word_style("PIN10_ÉTEINT").fg, Some(DEFAULT_THEME.pin));
        assert_eq!(word_style("pinceau").fg, Some(DEFAULT_THEME.fg));
        assert_eq!(word_style("3.14").fg, Some(DEFAULT_THEME.number));
    }

    #[test]
    fn test_follow_keeps_line_visible() {
        let mut scroll = SourceScrollState::default();
        scroll.follow(12, 5);
        assert_eq!(scroll.offset, 8);
        scroll.follow(3, 5);
        assert_eq!(scroll.offset, 3);
        scroll.follow(5, 5);
        assert_eq!(scroll.offset, 3);
    }
}
