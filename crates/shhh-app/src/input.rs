//! Input line state and key handling.
//!
//! Owns the text input buffer and cursor and turns character-level key
//! events into [`UserIntent`]s. The line doubles as message field and
//! command line: text starting with `/` is a command submitted with Enter,
//! anything else is a message draft that is offered for sending on every
//! edit.

use crate::UserIntent;

/// Terminal-agnostic keyboard input.
///
/// Decouples application logic from terminal libraries, enabling
/// deterministic simulation testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// Printable character.
    Char(char),
    /// Enter/Return key.
    Enter,
    /// Backspace key (delete character before cursor).
    Backspace,
    /// Delete key (delete character at cursor).
    Delete,
    /// Escape key (quit).
    Esc,
    /// Left arrow key.
    Left,
    /// Right arrow key.
    Right,
    /// Home key (cursor to start).
    Home,
    /// End key (cursor to end).
    End,
}

/// Input line state.
///
/// The cursor counts characters, not bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputState {
    buffer: String,
    cursor: usize,
    notice: Option<String>,
}

impl InputState {
    /// Create an empty input line.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current text.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Cursor position in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Feedback about the last submitted command, e.g. an unknown command.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Whether the line currently holds a command rather than a message.
    pub fn is_command(&self) -> bool {
        self.buffer.starts_with('/')
    }

    /// Handle a key and return the intents it produces.
    pub fn handle_key(&mut self, key: KeyInput) -> Vec<UserIntent> {
        match key {
            KeyInput::Char(c) => {
                let at = self.byte_offset(self.cursor);
                self.buffer.insert(at, c);
                self.cursor += 1;
                self.edited()
            },
            KeyInput::Backspace => {
                if self.cursor == 0 {
                    return vec![];
                }
                self.cursor -= 1;
                let at = self.byte_offset(self.cursor);
                self.buffer.remove(at);
                self.edited()
            },
            KeyInput::Delete => {
                if self.cursor >= self.len() {
                    return vec![];
                }
                let at = self.byte_offset(self.cursor);
                self.buffer.remove(at);
                self.edited()
            },
            KeyInput::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                vec![]
            },
            KeyInput::Right => {
                self.cursor = (self.cursor + 1).min(self.len());
                vec![]
            },
            KeyInput::Home => {
                self.cursor = 0;
                vec![]
            },
            KeyInput::End => {
                self.cursor = self.len();
                vec![]
            },
            KeyInput::Enter => self.submit(),
            KeyInput::Esc => vec![UserIntent::Quit],
        }
    }

    /// A message draft goes out on every edit; the session debounces it.
    fn edited(&mut self) -> Vec<UserIntent> {
        self.notice = None;
        if self.is_command() {
            return vec![];
        }
        vec![UserIntent::TypeMessage(self.buffer.clone())]
    }

    /// Enter: run the command, or clear the line after a message.
    fn submit(&mut self) -> Vec<UserIntent> {
        let text = std::mem::take(&mut self.buffer);
        self.cursor = 0;

        if !text.starts_with('/') {
            return vec![];
        }

        match UserIntent::parse(&text) {
            Ok(intent) => {
                self.notice = None;
                intent.into_iter().collect()
            },
            Err(e) => {
                self.notice = Some(e.to_string());
                vec![]
            },
        }
    }

    fn len(&self) -> usize {
        self.buffer.chars().count()
    }

    fn byte_offset(&self, chars: usize) -> usize {
        self.buffer.char_indices().nth(chars).map_or(self.buffer.len(), |(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_str(input: &mut InputState, text: &str) -> Vec<UserIntent> {
        text.chars().flat_map(|c| input.handle_key(KeyInput::Char(c))).collect()
    }

    #[test]
    fn each_message_keystroke_offers_the_draft() {
        let mut input = InputState::new();
        let intents = type_str(&mut input, "hi");

        assert_eq!(intents, vec![
            UserIntent::TypeMessage("h".into()),
            UserIntent::TypeMessage("hi".into()),
        ]);
        assert_eq!(input.buffer(), "hi");
    }

    #[test]
    fn command_runs_on_enter_only() {
        let mut input = InputState::new();
        assert!(type_str(&mut input, "/room R1").is_empty());
        assert!(input.is_command());

        assert_eq!(input.handle_key(KeyInput::Enter), vec![UserIntent::SetRoomId("R1".into())]);
        assert!(input.buffer().is_empty());
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn enter_after_message_clears_line() {
        let mut input = InputState::new();
        type_str(&mut input, "hello");
        assert!(input.handle_key(KeyInput::Enter).is_empty());
        assert!(input.buffer().is_empty());
    }

    #[test]
    fn erasing_the_draft_offers_empty_text() {
        let mut input = InputState::new();
        type_str(&mut input, "a");
        assert_eq!(input.handle_key(KeyInput::Backspace), vec![UserIntent::TypeMessage(
            String::new()
        )]);
        assert!(input.handle_key(KeyInput::Backspace).is_empty());
    }

    #[test]
    fn cursor_edits_multibyte_text() {
        let mut input = InputState::new();
        type_str(&mut input, "héllo");
        input.handle_key(KeyInput::Home);
        input.handle_key(KeyInput::Right);
        input.handle_key(KeyInput::Delete);
        assert_eq!(input.buffer(), "hllo");

        input.handle_key(KeyInput::End);
        input.handle_key(KeyInput::Right);
        assert_eq!(input.cursor(), 4);
        input.handle_key(KeyInput::Char('!'));
        assert_eq!(input.buffer(), "hllo!");
    }

    #[test]
    fn unknown_command_sets_notice() {
        let mut input = InputState::new();
        type_str(&mut input, "/dance");
        assert!(input.handle_key(KeyInput::Enter).is_empty());
        assert_eq!(input.notice(), Some("unknown command: /dance"));

        type_str(&mut input, "x");
        assert_eq!(input.notice(), None);
    }

    #[test]
    fn esc_quits() {
        assert_eq!(InputState::new().handle_key(KeyInput::Esc), vec![UserIntent::Quit]);
    }
}
