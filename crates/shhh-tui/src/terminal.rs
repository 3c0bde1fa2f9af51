//! Terminal driver for the TUI.
//!
//! Implements the [`Driver`] trait for terminal I/O using crossterm for
//! keyboard events and ratatui for rendering. Network uses reqwest for room
//! creation and tokio-tungstenite for the join connection; both report back
//! over channels.

use std::{
    io::{self, Stdout, stdout},
    pin::pin,
    time::{Duration, Instant},
};

use crossterm::{
    ExecutableCommand,
    event::{Event, EventStream, KeyCode, KeyEventKind, KeyModifiers},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use shhh_app::{AppEvent, Driver, KeyInput, UserIntent, View};
use shhh_client::{
    ConnectionAction, SessionAction, SessionEvent, TransportEvent,
    transport::{RoomApi, SocketHandle, open_socket},
};
use thiserror::Error;
use tokio::sync::mpsc;

use crate::ui;

/// How long shutdown waits for the join connection to finish closing.
const CLOSE_GRACE: Duration = Duration::from_millis(500);

/// Terminal driver errors.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// I/O error from terminal operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Terminal driver implementing the [`Driver`] trait.
///
/// Owns the terminal, the HTTP client and at most one socket task. Room
/// creation runs in its own task per request.
pub struct TerminalDriver {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    event_stream: EventStream,
    api: RoomApi,
    socket: Option<SocketHandle>,
    completions_tx: mpsc::UnboundedSender<SessionEvent>,
    completions_rx: mpsc::UnboundedReceiver<SessionEvent>,
    transport_tx: mpsc::UnboundedSender<TransportEvent>,
    transport_rx: mpsc::UnboundedReceiver<TransportEvent>,
    last_view: Option<View>,
}

impl TerminalDriver {
    /// Enter raw mode and the alternate screen.
    pub fn new(api: RoomApi) -> Result<Self, TerminalError> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        let (transport_tx, transport_rx) = mpsc::unbounded_channel();

        Ok(Self {
            terminal,
            event_stream: EventStream::new(),
            api,
            socket: None,
            completions_tx,
            completions_rx,
            transport_tx,
            transport_rx,
            last_view: None,
        })
    }

    /// Convert crossterm `KeyCode` to `KeyInput`.
    fn convert_key(code: KeyCode) -> Option<KeyInput> {
        match code {
            KeyCode::Char(c) => Some(KeyInput::Char(c)),
            KeyCode::Enter => Some(KeyInput::Enter),
            KeyCode::Backspace => Some(KeyInput::Backspace),
            KeyCode::Delete => Some(KeyInput::Delete),
            KeyCode::Esc => Some(KeyInput::Esc),
            KeyCode::Left => Some(KeyInput::Left),
            KeyCode::Right => Some(KeyInput::Right),
            KeyCode::Home => Some(KeyInput::Home),
            KeyCode::End => Some(KeyInput::End),
            _ => None,
        }
    }

    fn redraw(&mut self) -> Result<(), TerminalError> {
        if let Some(view) = &self.last_view {
            self.terminal.draw(|frame| ui::render(frame, view))?;
        }
        Ok(())
    }

    fn spawn_create_room(&self, url: String) {
        let api = self.api.clone();
        let tx = self.completions_tx.clone();
        tokio::spawn(async move {
            let event = match api.create_room(&url).await {
                Ok(room_id) => SessionEvent::RoomCreated { room_id },
                Err(error) => SessionEvent::RoomCreateFailed { error },
            };
            let _ = tx.send(event);
        });
    }
}

impl Driver for TerminalDriver {
    type Error = TerminalError;
    type Instant = Instant;

    async fn next_event(
        &mut self,
        timeout: Option<Duration>,
    ) -> Result<Option<AppEvent>, Self::Error> {
        let mut deadline = pin!(async {
            match timeout {
                Some(timeout) => tokio::time::sleep(timeout).await,
                None => std::future::pending().await,
            }
        });

        loop {
            tokio::select! {
                biased;

                Some(event) = self.transport_rx.recv() => return Ok(Some(event.into())),
                Some(event) = self.completions_rx.recv() => return Ok(Some(event.into())),

                // Terminal events
                maybe_event = self.event_stream.next() => match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
                        if ctrl && key.code == KeyCode::Char('c') {
                            return Ok(Some(UserIntent::Quit.into()));
                        }
                        if let Some(key) = Self::convert_key(key.code) {
                            return Ok(Some(key.into()));
                        }
                    },
                    Some(Ok(Event::Resize(..))) => self.redraw()?,
                    Some(Ok(_)) => {},
                    Some(Err(e)) => return Err(TerminalError::Io(e)),
                    None => return Ok(Some(UserIntent::Quit.into())),
                },

                // Pending send is due
                () = &mut deadline => return Ok(None),
            }
        }
    }

    async fn execute(&mut self, action: SessionAction) -> Result<(), Self::Error> {
        match action {
            SessionAction::CreateRoom { url } => self.spawn_create_room(url),
            SessionAction::Connection(ConnectionAction::Open { connection, url }) => {
                let socket = open_socket(connection, url, self.transport_tx.clone());
                if let Some(previous) = self.socket.replace(socket) {
                    previous.close();
                }
            },
            SessionAction::Connection(ConnectionAction::Transmit { connection, payload }) => {
                match &self.socket {
                    Some(socket) if socket.connection() == connection => {
                        if !socket.transmit(payload) {
                            tracing::warn!(%connection, "socket task ended, message dropped");
                        }
                    },
                    _ => tracing::warn!(%connection, "no socket for connection, message dropped"),
                }
            },
            SessionAction::Connection(ConnectionAction::Close { connection }) => {
                let socket = self.socket.as_ref().filter(|s| s.connection() == connection);
                if let Some(socket) = socket {
                    socket.close();
                }
            },
            SessionAction::StateChanged => {},
        }
        Ok(())
    }

    fn now(&self) -> Self::Instant {
        Instant::now()
    }

    fn render(&mut self, view: &View) -> Result<(), Self::Error> {
        self.terminal.draw(|frame| ui::render(frame, view))?;
        self.last_view = Some(view.clone());
        Ok(())
    }

    async fn stop(&mut self) {
        if let Some(socket) = self.socket.take() {
            socket.shutdown(CLOSE_GRACE).await;
        }
    }
}

impl Drop for TerminalDriver {
    fn drop(&mut self) {
        if let Some(socket) = self.socket.take() {
            socket.close();
        }
        let _ = disable_raw_mode();
        let _ = stdout().execute(LeaveAlternateScreen);
    }
}
