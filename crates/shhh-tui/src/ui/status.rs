//! Status bar
//!
//! Displays session phase and the most recent error or notice.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use shhh_app::View;
use shhh_client::SessionPhase;

const HINT: &str = "/create  /room <id>  /name <user>  /join  /leave  Esc quits";

/// Render the status bar.
pub fn render(frame: &mut Frame, view: &View, area: Rect) {
    let phase_style = match view.phase {
        SessionPhase::Connected => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        SessionPhase::Creating | SessionPhase::Connecting => Style::default().fg(Color::Yellow),
        SessionPhase::Error => Style::default().fg(Color::Red),
        SessionPhase::Idle | SessionPhase::Closed => Style::default(),
    };

    let detail = if let Some(error) = &view.error_message {
        Span::styled(error.clone(), Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
    } else if let Some(notice) = &view.notice {
        Span::styled(notice.clone(), Style::default().fg(Color::Yellow))
    } else {
        Span::styled(HINT, Style::default().fg(Color::Gray))
    };

    let status_line = Line::from(vec![
        Span::raw(" "),
        Span::styled(view.status(), phase_style),
        Span::raw(" | "),
        detail,
    ]);

    let paragraph =
        Paragraph::new(status_line).style(Style::default().bg(Color::DarkGray).fg(Color::White));
    frame.render_widget(paragraph, area);
}
