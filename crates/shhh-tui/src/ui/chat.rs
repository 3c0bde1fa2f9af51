//! Chat area
//!
//! Displays received messages, newest at the bottom.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};
use shhh_app::View;

const BORDER_SIZE: u16 = 2;

/// Render the chat area.
pub fn render(frame: &mut Frame, view: &View, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Messages ");

    let items: Vec<ListItem> = if view.messages.is_empty() {
        vec![ListItem::new(Line::from(Span::styled(
            "No messages yet",
            Style::default().fg(Color::DarkGray),
        )))]
    } else {
        view.messages
            .iter()
            .map(|msg| {
                let mut spans = Vec::with_capacity(3);
                if let Some(username) = &msg.username {
                    spans.push(Span::styled(
                        format!("<{username}>"),
                        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                    ));
                    spans.push(Span::raw(" "));
                }
                spans.push(Span::raw(msg.content.clone()));
                ListItem::new(Line::from(spans))
            })
            .collect()
    };

    let visible_height = area.height.saturating_sub(BORDER_SIZE) as usize;
    let skip = items.len().saturating_sub(visible_height);
    let visible_items: Vec<_> = items.into_iter().skip(skip).collect();

    frame.render_widget(List::new(visible_items).block(block), area);
}
