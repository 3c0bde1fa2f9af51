//! Input line
//!
//! Displays the input buffer with cursor. Long lines scroll horizontally so
//! the cursor stays visible; columns are display widths, not characters.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::Span,
    widgets::{Block, Borders, Paragraph},
};
use shhh_app::View;

const PROMPT: &str = "> ";
const PROMPT_WIDTH: u16 = 2;
const INPUT_LINE_OFFSET_Y: u16 = 1; // inside top border
const BORDER_WIDTH: u16 = 1;

/// Render the input line.
pub fn render(frame: &mut Frame, view: &View, area: Rect) {
    let title = if view.input.starts_with('/') {
        " Command "
    } else if view.can_send {
        " Message "
    } else {
        " Message (not connected) "
    };
    let block = Block::default().borders(Borders::ALL).title(title);

    let text_width = area.width.saturating_sub(PROMPT_WIDTH + 2 * BORDER_WIDTH);
    let (start, column) = scroll(&view.input, view.cursor, usize::from(text_width));

    let paragraph = Paragraph::new(format!("{PROMPT}{}", &view.input[start..]))
        .style(Style::default().fg(Color::White))
        .block(block);
    frame.render_widget(paragraph, area);

    let cursor_offset = u16::try_from(column).unwrap_or(u16::MAX).min(text_width);
    let cursor_x = area
        .x
        .saturating_add(BORDER_WIDTH)
        .saturating_add(PROMPT_WIDTH)
        .saturating_add(cursor_offset);
    let cursor_y = area.y.saturating_add(INPUT_LINE_OFFSET_Y);
    frame.set_cursor_position((cursor_x, cursor_y));
}

/// Byte offset of the first visible character and the cursor's display
/// column, for a cursor at character `cursor` in a field `width` columns wide.
///
/// Leading characters are skipped until the cursor fits inside the field,
/// keeping one column for the cursor itself.
fn scroll(input: &str, cursor: usize, width: usize) -> (usize, usize) {
    let end = input.char_indices().nth(cursor).map_or(input.len(), |(i, _)| i);
    let before = &input[..end];

    let mut start = 0;
    let mut column = Span::raw(before).width();
    for c in before.chars() {
        if width == 0 || column < width {
            break;
        }
        start += c.len_utf8();
        column = Span::raw(&before[start..]).width();
    }
    (start, column)
}
