//! Session fields
//!
//! Displays the room ID and username the next join will use.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use shhh_app::View;

const UNSET: &str = "-";

/// Render the fields bar.
pub fn render(frame: &mut Frame, view: &View, area: Rect) {
    let label = Style::default().fg(Color::DarkGray);
    let value = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);
    let or_unset = |s: &str| if s.is_empty() { UNSET.to_string() } else { s.to_string() };

    let line = Line::from(vec![
        Span::styled("Room: ", label),
        Span::styled(or_unset(&view.room_id), value),
        Span::raw("   "),
        Span::styled("User: ", label),
        Span::styled(or_unset(&view.username), value),
    ]);

    let block = Block::default().borders(Borders::ALL).title(" Shhh ");
    frame.render_widget(Paragraph::new(line).block(block), area);
}
