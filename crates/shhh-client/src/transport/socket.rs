//! WebSocket join connection.
//!
//! [`open_socket`] spawns one task per connection. The task owns the socket:
//! it reports establishment, inbound text frames and the end of the
//! connection as [`TransportEvent`]s, and takes outbound payloads and the
//! close request over its own channel.

use std::{pin::pin, time::Duration};

use futures::{SinkExt, StreamExt};
use shhh_core::connection::ConnectionId;
use tokio::{sync::mpsc, task::JoinHandle};
use tokio_tungstenite::{connect_async, tungstenite::Message};

use super::TransportError;
use crate::event::TransportEvent;

/// Time allowed for the TCP connect plus WebSocket upgrade.
pub const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

/// Requests from the session side to the socket task.
#[derive(Debug)]
enum Command {
    Transmit(String),
    Close,
}

/// Handle to a running socket task.
///
/// Dropping the handle closes the command channel, which makes the task
/// close the socket.
#[derive(Debug)]
pub struct SocketHandle {
    connection: ConnectionId,
    commands: mpsc::UnboundedSender<Command>,
    task: JoinHandle<()>,
}

impl SocketHandle {
    /// Connection this socket serves.
    pub fn connection(&self) -> ConnectionId {
        self.connection
    }

    /// Queue one text frame. Returns `false` if the task has already ended.
    pub fn transmit(&self, payload: String) -> bool {
        self.commands.send(Command::Transmit(payload)).is_ok()
    }

    /// Ask the task to close the socket. It reports `Closed` when done.
    ///
    /// Honoured while the handshake is still pending too.
    pub fn close(&self) {
        // Task already gone means the socket is already closed
        let _ = self.commands.send(Command::Close);
    }

    /// Close the socket and wait up to `grace` for the task to finish.
    ///
    /// A task still running after `grace` is aborted and reports nothing
    /// further.
    pub async fn shutdown(mut self, grace: Duration) {
        self.close();
        if tokio::time::timeout(grace, &mut self.task).await.is_err() {
            tracing::debug!(connection = %self.connection, "socket close timed out, aborting");
            self.task.abort();
        }
    }
}

/// Open a join connection to `url` in a background task.
///
/// Returns immediately; the outcome arrives on `events` as `Established`
/// followed eventually by `Closed` or `Failed`, or `Failed` alone if the
/// connection never comes up. The handshake is bounded by
/// [`HANDSHAKE_TIMEOUT`].
pub fn open_socket(
    connection: ConnectionId,
    url: String,
    events: mpsc::UnboundedSender<TransportEvent>,
) -> SocketHandle {
    open_socket_with_timeout(connection, url, HANDSHAKE_TIMEOUT, events)
}

/// [`open_socket`] with an explicit handshake timeout.
pub fn open_socket_with_timeout(
    connection: ConnectionId,
    url: String,
    handshake_timeout: Duration,
    events: mpsc::UnboundedSender<TransportEvent>,
) -> SocketHandle {
    let (commands_tx, commands_rx) = mpsc::unbounded_channel();
    let task = tokio::spawn(run_socket(connection, url, handshake_timeout, commands_rx, events));

    SocketHandle { connection, commands: commands_tx, task }
}

/// Run the connection, bridging between channels and the WebSocket.
async fn run_socket(
    connection: ConnectionId,
    url: String,
    handshake_timeout: Duration,
    mut commands: mpsc::UnboundedReceiver<Command>,
    events: mpsc::UnboundedSender<TransportEvent>,
) {
    let connect = connect_async(url.as_str());
    let mut handshake = pin!(tokio::time::timeout(handshake_timeout, connect));

    // Commands stay live during the handshake so a close is never lost
    let stream = loop {
        tokio::select! {
            result = &mut handshake => match result {
                Ok(Ok((stream, _response))) => break stream,
                Ok(Err(e)) => {
                    let detail = TransportError::Connection(e.to_string()).to_string();
                    tracing::debug!(%connection, %url, %detail, "websocket connect failed");
                    let _ = events.send(TransportEvent::Failed { connection, detail });
                    return;
                },
                Err(_elapsed) => {
                    let detail = TransportError::Connection(format!(
                        "handshake timed out after {}ms",
                        handshake_timeout.as_millis()
                    ))
                    .to_string();
                    tracing::debug!(%connection, %url, %detail, "websocket connect timed out");
                    let _ = events.send(TransportEvent::Failed { connection, detail });
                    return;
                },
            },
            command = commands.recv() => match command {
                Some(Command::Transmit(_)) => {
                    tracing::warn!(%connection, "transmit before established, dropped");
                },
                Some(Command::Close) | None => {
                    tracing::debug!(%connection, "closed during handshake");
                    let _ = events.send(TransportEvent::Closed { connection });
                    return;
                },
            },
        }
    };

    if events.send(TransportEvent::Established { connection }).is_err() {
        return;
    }

    let (mut sink, mut stream) = stream.split();
    let outcome = loop {
        tokio::select! {
            command = commands.recv() => match command {
                Some(Command::Transmit(payload)) => {
                    if let Err(e) = sink.send(Message::Text(payload.into())).await {
                        break Err(TransportError::Socket(e.to_string()));
                    }
                },
                Some(Command::Close) | None => {
                    if let Err(e) = sink.close().await {
                        tracing::debug!(%connection, error = %e, "close handshake failed");
                    }
                    break Ok(());
                },
            },
            message = stream.next() => match message {
                Some(Ok(Message::Text(text))) => {
                    let payload = text.as_str().to_owned();
                    if events.send(TransportEvent::Frame { connection, payload }).is_err() {
                        break Ok(());
                    }
                },
                Some(Ok(Message::Close(_))) | None => break Ok(()),
                // Ping/pong are answered by tungstenite; binary frames are not part of the protocol
                Some(Ok(_)) => {},
                Some(Err(e)) => break Err(TransportError::Socket(e.to_string())),
            },
        }
    };

    let event = match outcome {
        Ok(()) => TransportEvent::Closed { connection },
        Err(e) => TransportEvent::Failed { connection, detail: e.to_string() },
    };
    let _ = events.send(event);
}
