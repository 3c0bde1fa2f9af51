//! Chat session state machine.
//!
//! A [`Session`] owns everything one chat session needs: the room and
//! username fields, the single join [`Connection`], the outbound
//! [`Debouncer`] and the received [`MessageLog`]. It is a pure state machine:
//! it consumes [`SessionEvent`]s and produces [`SessionAction`]s, so the same
//! code runs against real sockets and in deterministic tests.
//!
//! # State Machine
//!
//! ```text
//!            createRoom              RoomCreated / RoomCreateFailed
//!   ┌──────┐ ─────────> ┌──────────┐ ──────────────────────────────┐
//!   │ Idle │            │ Creating │                               │
//!   └──────┘ <───────────────────────────────────────────────────-─┘
//!      │ joinRoom (roomId + username set)
//!      ↓
//! ┌────────────┐ Established ┌───────────┐  Closed  ┌────────┐
//! │ Connecting │────────────>│ Connected │─────────>│ Closed │
//! └────────────┘             └───────────┘          └────────┘
//!      │ Failed / Closed           │ Failed
//!      ↓                           ↓
//!   ┌───────┐ / ┌────────┐      ┌───────┐
//!   │ Error │   │ Closed │      │ Error │
//!   └───────┘   └────────┘      └───────┘
//! ```
//!
//! Creating and Connecting are "busy": while one of them is in flight both
//! createRoom and joinRoom are ignored. Closed and Error behave like Idle for
//! starting the next cycle.
//!
//! # Invariants
//!
//! - At most one connection is live; starting a cycle closes the previous one
//!   before anything else happens
//! - Room ID and username cannot change while Connecting or Connected
//! - Events from a connection that is no longer current are dropped
//! - The message log only grows during a cycle; it is cleared when the next
//!   create/join cycle starts

use std::time::Duration;

use shhh_core::{
    connection::{Connection, ConnectionId},
    debounce::{DEFAULT_DEBOUNCE_DELAY, Debouncer},
    endpoint::BackendConfig,
    env::Environment,
    error::SendError,
};

use crate::{
    error::{RequestError, SessionError},
    event::{SessionAction, SessionEvent, TransportEvent},
    message_log::MessageLog,
};

/// Session configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Backend addresses.
    pub backend: BackendConfig,
    /// Quiet period before a typed message is sent.
    pub debounce_delay: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { backend: BackendConfig::default(), debounce_delay: DEFAULT_DEBOUNCE_DELAY }
    }
}

/// Top-level session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No operation in flight and no connection.
    Idle,
    /// Room-creation call in flight.
    Creating,
    /// Join connection opening.
    Connecting,
    /// Join connection usable.
    Connected,
    /// Join connection ended.
    Closed,
    /// Join connection failed.
    Error,
}

impl SessionPhase {
    /// An asynchronous create or join is in flight.
    pub fn is_busy(self) -> bool {
        matches!(self, Self::Creating | Self::Connecting)
    }
}

/// Chat session state machine.
///
/// Generic over Environment to support both production and simulation.
pub struct Session<E: Environment> {
    env: E,
    config: SessionConfig,
    phase: SessionPhase,
    /// Room ID field. Empty if unset.
    room_id: String,
    /// Username field. Empty if unset.
    username: String,
    /// Most recent failure. Cleared when a create/join attempt starts.
    error: Option<SessionError>,
    /// Current join connection. `None` outside Connecting/Connected.
    connection: Option<Connection>,
    next_connection: ConnectionId,
    log: MessageLog,
    outbox: Debouncer<String, E::Instant>,
}

impl<E: Environment> Session<E> {
    /// Create an idle session.
    pub fn new(env: E, config: SessionConfig) -> Self {
        let outbox = Debouncer::new(config.debounce_delay);
        Self {
            env,
            config,
            phase: SessionPhase::Idle,
            room_id: String::new(),
            username: String::new(),
            error: None,
            connection: None,
            next_connection: ConnectionId::new(1),
            log: MessageLog::new(),
            outbox,
        }
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: SessionEvent<E::Instant>) -> Vec<SessionAction> {
        match event {
            SessionEvent::CreateRoom => self.create_room(),
            SessionEvent::JoinRoom => self.join_room(),
            SessionEvent::Leave => self.leave(),
            SessionEvent::SetRoomId(room_id) => self.set_room_id(room_id),
            SessionEvent::SetUsername(username) => self.set_username(username),
            SessionEvent::TypeMessage(text) => self.type_message(text),
            SessionEvent::Tick { now } => self.tick(now),
            SessionEvent::RoomCreated { room_id } => self.handle_room_created(room_id),
            SessionEvent::RoomCreateFailed { error } => self.handle_room_create_failed(error),
            SessionEvent::Transport(event) => self.handle_transport(event),
        }
    }

    /// Start a room-creation cycle.
    ///
    /// Ignored while busy. Username and the entered room ID are kept; the
    /// user still has to join explicitly.
    pub fn create_room(&mut self) -> Vec<SessionAction> {
        if self.phase.is_busy() {
            tracing::debug!(phase = ?self.phase, "create room ignored while busy");
            return vec![];
        }

        let mut actions = self.begin_cycle();
        self.phase = SessionPhase::Creating;
        actions.push(SessionAction::CreateRoom { url: self.config.backend.create_room_url() });
        actions.push(SessionAction::StateChanged);
        actions
    }

    /// Start a join cycle for the entered room ID and username.
    ///
    /// Ignored while busy. Missing fields are reported without touching the
    /// network; the room ID is checked first.
    pub fn join_room(&mut self) -> Vec<SessionAction> {
        if self.phase.is_busy() {
            tracing::debug!(phase = ?self.phase, "join room ignored while busy");
            return vec![];
        }

        if self.room_id.is_empty() {
            self.error = Some(SessionError::MissingRoomId);
            return vec![SessionAction::StateChanged];
        }
        if self.username.is_empty() {
            self.error = Some(SessionError::MissingUsername);
            return vec![SessionAction::StateChanged];
        }

        let mut actions = self.begin_cycle();
        let id = self.next_connection;
        self.next_connection = id.next();

        match Connection::open(&self.config.backend, id, &self.room_id, &self.username) {
            Ok((connection, action)) => {
                tracing::info!(
                    room_id = %self.room_id,
                    username = %self.username,
                    %id,
                    "joining room"
                );
                self.connection = Some(connection);
                self.phase = SessionPhase::Connecting;
                actions.push(SessionAction::Connection(action));
            },
            Err(e) => {
                tracing::warn!(error = %e, "cannot open room connection");
                self.phase = SessionPhase::Idle;
                self.error = Some(SessionError::Connect(e));
            },
        }

        actions.push(SessionAction::StateChanged);
        actions
    }

    /// Ask the live connection to close.
    ///
    /// The session reaches Closed when the transport confirms.
    pub fn leave(&mut self) -> Vec<SessionAction> {
        let Some(action) = self.connection.as_mut().and_then(Connection::close) else {
            return vec![];
        };

        self.outbox.cancel();
        vec![SessionAction::Connection(action), SessionAction::StateChanged]
    }

    /// Tear the session down for application exit.
    ///
    /// Discards the pending send and closes the live connection, if any.
    pub fn shutdown(&mut self) -> Vec<SessionAction> {
        self.outbox.cancel();

        let Some(mut connection) = self.connection.take() else {
            return vec![];
        };

        self.phase = SessionPhase::Closed;
        connection.close().map(SessionAction::Connection).into_iter().collect()
    }

    /// Edit the room ID field. Rejected while Connecting or Connected.
    pub fn set_room_id(&mut self, room_id: String) -> Vec<SessionAction> {
        if self.fields_locked() {
            tracing::debug!(phase = ?self.phase, "room ID is fixed while joined");
            return vec![];
        }

        self.room_id = room_id;
        vec![SessionAction::StateChanged]
    }

    /// Edit the username field. Rejected while Connecting or Connected.
    pub fn set_username(&mut self, username: String) -> Vec<SessionAction> {
        if self.fields_locked() {
            tracing::debug!(phase = ?self.phase, "username is fixed while joined");
            return vec![];
        }

        self.username = username;
        vec![SessionAction::StateChanged]
    }

    /// Queue `text` for sending once typing pauses.
    ///
    /// No-op unless Connected. Each call supersedes the previous draft.
    pub fn type_message(&mut self, text: String) -> Vec<SessionAction> {
        if !self.can_send() {
            return vec![];
        }

        let now = self.env.now();
        if self.outbox.trigger(text, now) {
            tracing::trace!("superseded pending draft");
        }
        vec![]
    }

    /// Advance time; sends the pending draft once its delay has passed.
    pub fn tick(&mut self, now: E::Instant) -> Vec<SessionAction> {
        let Some(text) = self.outbox.poll(now) else {
            return vec![];
        };
        let Some(connection) = self.connection.as_ref() else {
            return vec![];
        };

        match connection.send(&text) {
            Ok(Some(action)) => vec![SessionAction::Connection(action)],
            Ok(None) => {
                tracing::debug!(
                    state = ?connection.state(),
                    "draft dropped, connection not established"
                );
                vec![]
            },
            Err(SendError::EmptyMessage) => {
                tracing::debug!("empty draft not sent");
                vec![]
            },
            Err(e) => {
                tracing::warn!(error = %e, "failed to send message");
                vec![]
            },
        }
    }

    fn handle_room_created(&mut self, room_id: String) -> Vec<SessionAction> {
        if self.phase != SessionPhase::Creating {
            tracing::debug!(phase = ?self.phase, "stale room creation result ignored");
            return vec![];
        }

        self.phase = SessionPhase::Idle;
        if room_id.is_empty() {
            self.error = Some(SessionError::Request(RequestError::InvalidResponse(
                "empty room ID".to_string(),
            )));
        } else {
            tracing::info!(%room_id, "room created");
            self.room_id = room_id;
        }
        vec![SessionAction::StateChanged]
    }

    fn handle_room_create_failed(&mut self, error: RequestError) -> Vec<SessionAction> {
        if self.phase != SessionPhase::Creating {
            tracing::debug!(phase = ?self.phase, "stale room creation failure ignored");
            return vec![];
        }

        tracing::warn!(error = %error, "room creation failed");
        self.phase = SessionPhase::Idle;
        self.error = Some(SessionError::Request(error));
        vec![SessionAction::StateChanged]
    }

    fn handle_transport(&mut self, event: TransportEvent) -> Vec<SessionAction> {
        let Some(connection) =
            self.connection.as_mut().filter(|c| c.id() == event.connection())
        else {
            tracing::debug!(
                connection = %event.connection(),
                "event from stale connection dropped"
            );
            return vec![];
        };

        match event {
            TransportEvent::Established { .. } => {
                if let Err(e) = connection.handle_established() {
                    tracing::debug!(error = %e, "establish ignored");
                    return vec![];
                }
                tracing::info!(connection = %connection.id(), "connected");
                self.phase = SessionPhase::Connected;
                vec![SessionAction::StateChanged]
            },
            TransportEvent::Frame { payload, .. } => {
                if connection.state() == shhh_core::ConnectionState::Opening {
                    tracing::warn!("frame before establishment dropped");
                    return vec![];
                }
                match connection.handle_frame(&payload) {
                    Ok(frame) => {
                        self.log.append(&self.env, frame);
                        vec![SessionAction::StateChanged]
                    },
                    Err(e) => {
                        tracing::warn!(error = %e, "dropping malformed frame");
                        vec![]
                    },
                }
            },
            TransportEvent::Closed { .. } => {
                connection.handle_closed();
                tracing::info!(connection = %connection.id(), "connection closed");
                self.connection = None;
                self.phase = SessionPhase::Closed;
                self.outbox.cancel();
                vec![SessionAction::StateChanged]
            },
            TransportEvent::Failed { detail, .. } => {
                connection.handle_error();
                tracing::warn!(connection = %connection.id(), %detail, "connection failed");
                self.connection = None;
                self.phase = SessionPhase::Error;
                self.error = Some(SessionError::Transport { detail });
                self.outbox.cancel();
                vec![SessionAction::StateChanged]
            },
        }
    }

    /// Reset per-cycle state: close the live connection, drop the pending
    /// draft, clear the log and the error line.
    fn begin_cycle(&mut self) -> Vec<SessionAction> {
        let mut actions = Vec::new();
        if let Some(mut previous) = self.connection.take()
            && let Some(action) = previous.close()
        {
            actions.push(SessionAction::Connection(action));
        }

        self.outbox.cancel();
        self.log.clear();
        self.error = None;
        actions
    }

    fn fields_locked(&self) -> bool {
        matches!(self.phase, SessionPhase::Connecting | SessionPhase::Connected)
    }

    /// Current phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// A create or join is in flight.
    pub fn is_busy(&self) -> bool {
        self.phase.is_busy()
    }

    /// Room ID field. Empty if unset.
    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    /// Username field. Empty if unset.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Most recent failure. `None` if the last attempt has not failed.
    pub fn error(&self) -> Option<&SessionError> {
        self.error.as_ref()
    }

    /// User-facing error line. `None` if there is nothing to show.
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }

    /// Whether typed messages will be sent.
    pub fn can_send(&self) -> bool {
        self.phase == SessionPhase::Connected
            && self.connection.as_ref().is_some_and(Connection::is_established)
    }

    /// Received messages.
    pub fn messages(&self) -> &MessageLog {
        &self.log
    }

    /// Current join connection. `None` outside Connecting/Connected.
    pub fn connection(&self) -> Option<&Connection> {
        self.connection.as_ref()
    }

    /// Whether a typed draft is waiting to be sent.
    pub fn has_pending_send(&self) -> bool {
        self.outbox.is_pending()
    }

    /// Time until the pending draft is due. `None` if nothing is pending.
    pub fn send_due_in(&self, now: E::Instant) -> Option<Duration> {
        self.outbox.remaining(now)
    }

    /// Environment.
    pub fn env(&self) -> &E {
        &self.env
    }
}
