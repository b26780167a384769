//! Board pane: the LEDs and variable panel of one side

use crate::board::Board;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub fn render_board_pane(frame: &mut Frame, area: Rect, title: &str, board: &Board) {
    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(DEFAULT_THEME.border_normal));

    let mut led_spans = Vec::new();
    for (pin, on) in board.leds() {
        let (glyph, color) = if on {
            ("●", DEFAULT_THEME.led_on)
        } else {
            ("○", DEFAULT_THEME.led_off)
        };
        led_spans.push(Span::styled(
            format!(" {} ", glyph),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
        led_spans.push(Span::styled(
            format!("{}  ", pin),
            Style::default().fg(DEFAULT_THEME.pin),
        ));
    }

    let mut lines = vec![Line::from(led_spans), Line::from("")];

    if board.variables().is_empty() {
        lines.push(Line::from(Span::styled(
            " Aucune variable",
            Style::default().fg(DEFAULT_THEME.comment),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            " Variables",
            Style::default()
                .fg(DEFAULT_THEME.primary)
                .add_modifier(Modifier::BOLD),
        )));
        for (name, display) in board.variables() {
            lines.push(Line::from(vec![
                Span::styled(format!("   {}", name), Style::default().fg(DEFAULT_THEME.fg)),
                Span::styled(" = ", Style::default().fg(DEFAULT_THEME.comment)),
                Span::styled(display.clone(), Style::default().fg(DEFAULT_THEME.number)),
            ]));
        }
    }

    if let Some(error) = board.error() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(" Ligne {}: {}", error.line + 1, error.message),
            Style::default()
                .fg(DEFAULT_THEME.error)
                .add_modifier(Modifier::BOLD),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}
