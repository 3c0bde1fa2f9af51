//! User intents and command parsing.

use shhh_client::SessionEvent;
use thiserror::Error;

/// Something the user asked for.
///
/// Decouples the runtime from any particular input widget or terminal,
/// enabling deterministic simulation testing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserIntent {
    /// Create a new room.
    CreateRoom,
    /// Join the room currently entered.
    JoinRoom,
    /// Leave the joined room.
    Leave,
    /// Replace the room ID field.
    SetRoomId(String),
    /// Replace the username field.
    SetUsername(String),
    /// Message field contents.
    TypeMessage(String),
    /// Exit the application.
    Quit,
}

/// Shell input that is not a valid intent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// Slash command that does not exist.
    #[error("unknown command: /{0}")]
    UnknownCommand(String),
}

impl UserIntent {
    /// Parse one submitted input line.
    ///
    /// Lines starting with `/` are commands (`/create`, `/room <id>`,
    /// `/name <username>`, `/join`, `/leave`, `/quit`); anything else is
    /// message text. `//` escapes a leading slash. Returns `Ok(None)` for a
    /// blank line.
    pub fn parse(line: &str) -> Result<Option<Self>, InputError> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            return Ok(None);
        }

        if let Some(text) = line.strip_prefix("//") {
            return Ok(Some(Self::TypeMessage(format!("/{text}"))));
        }
        let Some(command) = line.strip_prefix('/') else {
            return Ok(Some(Self::TypeMessage(line.to_string())));
        };

        let (name, arg) = match command.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (command, ""),
        };

        let intent = match name {
            "create" => Self::CreateRoom,
            "join" => Self::JoinRoom,
            "leave" => Self::Leave,
            "room" => Self::SetRoomId(arg.to_string()),
            "name" => Self::SetUsername(arg.to_string()),
            "quit" | "q" => Self::Quit,
            other => return Err(InputError::UnknownCommand(other.to_string())),
        };
        Ok(Some(intent))
    }

    /// Session event for this intent. `None` for [`UserIntent::Quit`], which
    /// the runtime handles itself.
    pub fn into_session_event<I>(self) -> Option<SessionEvent<I>> {
        match self {
            Self::CreateRoom => Some(SessionEvent::CreateRoom),
            Self::JoinRoom => Some(SessionEvent::JoinRoom),
            Self::Leave => Some(SessionEvent::Leave),
            Self::SetRoomId(room_id) => Some(SessionEvent::SetRoomId(room_id)),
            Self::SetUsername(username) => Some(SessionEvent::SetUsername(username)),
            Self::TypeMessage(text) => Some(SessionEvent::TypeMessage(text)),
            Self::Quit => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Option<UserIntent> {
        UserIntent::parse(line).unwrap()
    }

    #[test]
    fn commands() {
        assert_eq!(parse("/create"), Some(UserIntent::CreateRoom));
        assert_eq!(parse("/join\n"), Some(UserIntent::JoinRoom));
        assert_eq!(parse("/leave"), Some(UserIntent::Leave));
        assert_eq!(parse("/q"), Some(UserIntent::Quit));
        assert_eq!(parse("/room  R1 "), Some(UserIntent::SetRoomId("R1".into())));
        assert_eq!(parse("/name al ice"), Some(UserIntent::SetUsername("al ice".into())));
    }

    #[test]
    fn bare_field_command_clears_field() {
        assert_eq!(parse("/room"), Some(UserIntent::SetRoomId(String::new())));
    }

    #[test]
    fn plain_text_is_a_message() {
        assert_eq!(parse("hi there"), Some(UserIntent::TypeMessage("hi there".into())));
        assert_eq!(parse("//shrug"), Some(UserIntent::TypeMessage("/shrug".into())));
        assert_eq!(parse("   "), None);
    }

    #[test]
    fn unknown_command_is_rejected() {
        assert_eq!(UserIntent::parse("/dance"), Err(InputError::UnknownCommand("dance".into())));
    }

    #[test]
    fn quit_has_no_session_event() {
        assert_eq!(UserIntent::Quit.into_session_event::<u64>(), None);
        assert_eq!(
            UserIntent::TypeMessage("x".into()).into_session_event::<u64>(),
            Some(SessionEvent::TypeMessage("x".into()))
        );
    }
}
