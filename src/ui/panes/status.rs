//! Status bar rendering with keybindings and run state

use crate::interpreter::events::Side;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Render the status bar at the bottom.
///
/// `running` is the side of the run in progress, if any.
pub fn render_status_bar(
    frame: &mut Frame,
    area: Rect,
    message: &str,
    running: Option<Side>,
    is_error: bool,
) {
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    let (state_text, state_color) = match running {
        Some(Side::Example) => (" ▶ EXEMPLE ", DEFAULT_THEME.secondary),
        Some(Side::Student) => (" ▶ TON CODE ", DEFAULT_THEME.secondary),
        None if is_error => (" ERREUR ", DEFAULT_THEME.error),
        None => (" PRÊT ", DEFAULT_THEME.primary),
    };

    let left_spans = vec![
        Span::styled(
            state_text,
            Style::default()
                .bg(state_color)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            " | ",
            Style::default()
                .bg(DEFAULT_THEME.current_line_bg)
                .fg(DEFAULT_THEME.comment),
        ),
        Span::styled(
            format!(" {} ", message),
            Style::default()
                .bg(DEFAULT_THEME.current_line_bg)
                .fg(if is_error {
                    DEFAULT_THEME.error
                } else {
                    DEFAULT_THEME.fg
                }),
        ),
    ];

    let left_paragraph = Paragraph::new(Line::from(left_spans))
        .style(Style::default().bg(DEFAULT_THEME.current_line_bg))
        .alignment(Alignment::Left);
    frame.render_widget(left_paragraph, layout[0]);

    let key_style = Style::default().bg(DEFAULT_THEME.comment).fg(Color::Black);
    let desc_style = Style::default()
        .bg(DEFAULT_THEME.current_line_bg)
        .fg(DEFAULT_THEME.fg);
    let sep_style = Style::default()
        .bg(DEFAULT_THEME.current_line_bg)
        .fg(DEFAULT_THEME.comment);

    let bindings = [
        ("x", "exemple"),
        ("r", "lancer"),
        ("s", "stop"),
        ("c", "vérifier"),
        ("n", "suivant"),
        ("l", "recharger"),
        ("h", "règle"),
        ("q", "quitter"),
    ];
    let mut right_spans = Vec::new();
    for (i, (key, desc)) in bindings.iter().enumerate() {
        if i > 0 {
            right_spans.push(Span::styled("│", sep_style));
        }
        right_spans.push(Span::styled(format!(" {} ", key), key_style));
        right_spans.push(Span::styled(format!(" {} ", desc), desc_style));
    }

    let right_paragraph = Paragraph::new(Line::from(right_spans))
        .style(Style::default().bg(DEFAULT_THEME.current_line_bg))
        .alignment(Alignment::Right);
    frame.render_widget(right_paragraph, layout[1]);
}
