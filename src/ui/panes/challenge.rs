//! Exercise panes: level header, challenge instructions with feedback, and
//! the level popup

use crate::content::{plain_text, Challenge, Level, Popup};
use crate::ui::theme::DEFAULT_THEME;
use crate::validator::Feedback;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Wrap},
    Frame,
};

/// Level title, subtitle and exercise progress
pub fn render_header(frame: &mut Frame, area: Rect, level: &Level, fraction: (usize, usize)) {
    let (current, total) = fraction;
    let block = Block::default()
        .title(Span::styled(
            format!(" Quest 4 - {} ", level.title),
            Style::default()
                .fg(DEFAULT_THEME.primary)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(DEFAULT_THEME.border_normal));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(inner);

    let subtitle = Paragraph::new(Line::from(vec![
        Span::styled(
            format!(" Niveau {} ", level.number),
            Style::default()
                .bg(DEFAULT_THEME.primary)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {} - Exercice {}/{}", level.subtitle, current, total),
            Style::default().fg(DEFAULT_THEME.fg),
        ),
    ]));
    frame.render_widget(subtitle, columns[0]);

    let ratio = if total == 0 {
        0.0
    } else {
        (current as f64 / total as f64).min(1.0)
    };
    let gauge = Gauge::default()
        .gauge_style(
            Style::default()
                .fg(DEFAULT_THEME.success)
                .bg(DEFAULT_THEME.current_line_bg),
        )
        .ratio(ratio)
        .label(format!("Exercice {}/{}", current, total));
    frame.render_widget(gauge, columns[1]);
}

/// Instructions of the current exercise, followed by the last check's feedback
pub fn render_challenge_pane(
    frame: &mut Frame,
    area: Rect,
    challenge: &Challenge,
    feedback: Option<&Feedback>,
    passed: bool,
) {
    let block = Block::default()
        .title(format!(" {} ", challenge.title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(DEFAULT_THEME.border_normal));

    let mut lines: Vec<Line> = challenge
        .instructions
        .iter()
        .map(|instruction| {
            Line::from(vec![
                Span::styled(" • ", Style::default().fg(DEFAULT_THEME.secondary)),
                Span::styled(plain_text(instruction), Style::default().fg(DEFAULT_THEME.fg)),
            ])
        })
        .collect();

    if let Some(feedback) = feedback {
        let color = if passed {
            DEFAULT_THEME.success
        } else {
            DEFAULT_THEME.error
        };
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(" {} ", feedback.title),
            Style::default()
                .bg(color)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            feedback.text.clone(),
            Style::default().fg(color),
        )));
        if passed {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Appuie sur n pour continuer",
                Style::default().fg(DEFAULT_THEME.comment),
            )));
        }
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

/// The level's rule reminder, drawn over everything else
pub fn render_popup(frame: &mut Frame, area: Rect, popup: &Popup) {
    let area = centered(area, 60, 60);
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(Span::styled(
            format!(" {} ", popup.title),
            Style::default()
                .fg(DEFAULT_THEME.border_focused)
                .add_modifier(Modifier::BOLD),
        ))
        .title_bottom(Line::from(Span::styled(
            " h / Échap pour fermer ",
            Style::default().fg(DEFAULT_THEME.comment),
        )))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(DEFAULT_THEME.border_focused));

    let paragraph = Paragraph::new(plain_text(&popup.content))
        .style(Style::default().fg(DEFAULT_THEME.fg))
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

/// A rectangle of the given percentages, centred in `area`
fn centered(area: Rect, width_percent: u16, height_percent: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - height_percent) / 2),
            Constraint::Percentage(height_percent),
            Constraint::Percentage((100 - height_percent) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - width_percent) / 2),
            Constraint::Percentage(width_percent),
            Constraint::Percentage((100 - width_percent) / 2),
        ])
        .split(vertical[1])[1]
}
