//! UI rendering
//!
//! Rendering functions that convert the [`View`] into terminal output using
//! ratatui widgets. All functions are pure (no I/O), taking state and
//! returning widget trees.

mod chat;
mod fields;
mod input;
mod status;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};
use shhh_app::View;

/// Render the entire UI.
pub fn render(frame: &mut Frame, view: &View) {
    const FIELDS_HEIGHT: u16 = 3;
    const CHAT_MIN_HEIGHT: u16 = 3;
    const INPUT_HEIGHT: u16 = 3;
    const STATUS_HEIGHT: u16 = 1;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(FIELDS_HEIGHT),
            Constraint::Min(CHAT_MIN_HEIGHT),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .split(frame.area());

    let [fields_area, chat_area, input_area, status_area] = chunks.as_ref() else {
        return;
    };

    fields::render(frame, view, *fields_area);
    chat::render(frame, view, *chat_area);
    input::render(frame, view, *input_area);
    status::render(frame, view, *status_area);
}
