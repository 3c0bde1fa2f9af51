//! Transport integration tests against an in-process backend.
//!
//! Spins up an axum server on a random local port that speaks the backend's
//! HTTP and WebSocket API, then drives the real reqwest and tokio-tungstenite
//! adapters against it.

use std::{collections::HashMap, time::Duration};

use axum::{
    Router,
    extract::{
        Path, Query,
        ws::{Message as WsMessage, WebSocket, WebSocketUpgrade},
    },
    http::{StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use shhh_client::{
    ConnectionAction, ConnectionId, RequestError, Session, SessionAction, SessionConfig,
    SessionEvent, SessionPhase, TransportEvent,
    transport::{RoomApi, SocketHandle, SystemEnv, open_socket, open_socket_with_timeout},
};
use shhh_core::{BackendConfig, env::Environment};
use tokio::sync::mpsc;

/// Start the backend and return its base URL.
async fn spawn_backend() -> String {
    let app = Router::new()
        .route("/health", get(|| async { "skrrrt" }))
        .route(
            "/room/create",
            post(|| async { ([(CONTENT_TYPE, "application/json")], r#"{"roomId":"R1"}"#) }),
        )
        .route("/broken/room/create", post(|| async { StatusCode::SERVICE_UNAVAILABLE }))
        .route("/room/{room_id}/join", get(join));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    format!("http://{addr}")
}

/// Accept TCP connections and never answer the upgrade request.
async fn spawn_silent_listener() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
        }
    });
    format!("http://{addr}")
}

async fn join(
    Path(room_id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    ws: WebSocketUpgrade,
) -> Response {
    if room_id == "missing" {
        return StatusCode::NOT_FOUND.into_response();
    }
    let username = params.get("username").cloned().unwrap_or_default();
    ws.on_upgrade(move |socket| room(socket, room_id, username))
}

/// Greets the member, then echoes every text frame back.
async fn room(mut socket: WebSocket, room_id: String, username: String) {
    if room_id == "closing" {
        let _ = socket.send(WsMessage::Close(None)).await;
        return;
    }

    let hello = format!(r#"{{"content":"welcome to {room_id}","username":"{username}"}}"#);
    if socket.send(WsMessage::Text(hello.into())).await.is_err() {
        return;
    }

    while let Some(Ok(message)) = socket.recv().await {
        match message {
            WsMessage::Text(text) => {
                if socket.send(WsMessage::Text(text)).await.is_err() {
                    break;
                }
            },
            WsMessage::Close(_) => break,
            _ => {},
        }
    }
}

async fn next_event(rx: &mut mpsc::UnboundedReceiver<TransportEvent>) -> TransportEvent {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("transport event within 5s")
        .expect("socket task alive")
}

fn join_url(base: &str, room_id: &str, username: &str) -> String {
    BackendConfig::new(base).join_url(room_id, username).unwrap()
}

#[tokio::test]
async fn create_room_returns_room_id() {
    let base = spawn_backend().await;
    let api = RoomApi::new();

    let room_id = api.create_room(&BackendConfig::new(&base).create_room_url()).await.unwrap();
    assert_eq!(room_id, "R1");
}

#[tokio::test]
async fn create_room_maps_error_status() {
    let base = spawn_backend().await;
    let api = RoomApi::new();

    let url = BackendConfig::new(format!("{base}/broken")).create_room_url();
    let err = api.create_room(&url).await.unwrap_err();

    assert_eq!(err, RequestError::Status {
        status: 503,
        status_text: "Service Unavailable".into()
    });
    assert_eq!(err.to_string(), "Failed to create chat: 503 Service Unavailable");
}

#[tokio::test]
async fn create_room_unreachable_is_transport_error() {
    let api = RoomApi::with_timeout(Duration::from_secs(2)).unwrap();
    let err = api.create_room("http://127.0.0.1:1/room/create").await.unwrap_err();
    assert!(matches!(err, RequestError::Transport(_)));
}

#[tokio::test]
async fn health_returns_body() {
    let base = spawn_backend().await;
    let body = RoomApi::new().health(&BackendConfig::new(&base).health_url()).await.unwrap();
    assert_eq!(body, "skrrrt");
}

#[tokio::test]
async fn socket_round_trip() {
    let base = spawn_backend().await;
    let (tx, mut rx) = mpsc::unbounded_channel();
    let connection = ConnectionId::new(1);

    let socket = open_socket(connection, join_url(&base, "R1", "al ice"), tx);
    assert_eq!(socket.connection(), connection);

    assert_eq!(next_event(&mut rx).await, TransportEvent::Established { connection });
    assert_eq!(next_event(&mut rx).await, TransportEvent::Frame {
        connection,
        payload: r#"{"content":"welcome to R1","username":"al ice"}"#.into(),
    });

    assert!(socket.transmit(r#"{"content":"hi"}"#.into()));
    assert_eq!(next_event(&mut rx).await, TransportEvent::Frame {
        connection,
        payload: r#"{"content":"hi"}"#.into(),
    });

    socket.close();
    assert_eq!(next_event(&mut rx).await, TransportEvent::Closed { connection });
}

#[tokio::test]
async fn socket_to_missing_room_fails() {
    let base = spawn_backend().await;
    let (tx, mut rx) = mpsc::unbounded_channel();
    let connection = ConnectionId::new(2);

    let _socket = open_socket(connection, join_url(&base, "missing", "bob"), tx);

    assert!(matches!(
        next_event(&mut rx).await,
        TransportEvent::Failed { connection: c, .. } if c == connection
    ));
}

#[tokio::test]
async fn server_close_is_reported() {
    let base = spawn_backend().await;
    let (tx, mut rx) = mpsc::unbounded_channel();
    let connection = ConnectionId::new(3);

    let _socket = open_socket(connection, join_url(&base, "closing", "bob"), tx);

    assert_eq!(next_event(&mut rx).await, TransportEvent::Established { connection });
    assert_eq!(next_event(&mut rx).await, TransportEvent::Closed { connection });
}

#[tokio::test]
async fn close_during_handshake_is_reported() {
    let base = spawn_silent_listener().await;
    let (tx, mut rx) = mpsc::unbounded_channel();
    let connection = ConnectionId::new(4);

    let socket = open_socket(connection, join_url(&base, "R1", "bob"), tx);
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(rx.try_recv().is_err(), "handshake still pending");

    socket.close();
    assert_eq!(next_event(&mut rx).await, TransportEvent::Closed { connection });
}

#[tokio::test]
async fn stalled_handshake_times_out() {
    let base = spawn_silent_listener().await;
    let (tx, mut rx) = mpsc::unbounded_channel();
    let connection = ConnectionId::new(5);

    let _socket = open_socket_with_timeout(
        connection,
        join_url(&base, "R1", "bob"),
        Duration::from_millis(200),
        tx,
    );

    match next_event(&mut rx).await {
        TransportEvent::Failed { connection: c, detail } => {
            assert_eq!(c, connection);
            assert!(detail.contains("timed out"), "{detail}");
        },
        other => panic!("expected Failed, got {other:?}"),
    }
}

#[tokio::test]
async fn shutdown_waits_for_socket_task() {
    let base = spawn_backend().await;
    let (tx, mut rx) = mpsc::unbounded_channel();
    let connection = ConnectionId::new(6);

    let socket = open_socket(connection, join_url(&base, "R1", "bob"), tx);
    assert_eq!(next_event(&mut rx).await, TransportEvent::Established { connection });
    assert!(matches!(next_event(&mut rx).await, TransportEvent::Frame { .. }));

    socket.shutdown(Duration::from_secs(2)).await;
    assert_eq!(rx.try_recv(), Ok(TransportEvent::Closed { connection }));
}

#[tokio::test]
async fn shutdown_during_handshake_returns() {
    let base = spawn_silent_listener().await;
    let (tx, mut rx) = mpsc::unbounded_channel();
    let connection = ConnectionId::new(7);

    let socket = open_socket(connection, join_url(&base, "R1", "bob"), tx);
    tokio::time::timeout(Duration::from_secs(3), socket.shutdown(Duration::from_secs(1)))
        .await
        .expect("shutdown bounded by grace period");
    assert_eq!(rx.try_recv(), Ok(TransportEvent::Closed { connection }));
}

/// Execute connection actions the way a driver would.
fn execute(
    actions: Vec<SessionAction>,
    socket: &mut Option<SocketHandle>,
    tx: &mpsc::UnboundedSender<TransportEvent>,
) {
    for action in actions {
        match action {
            SessionAction::Connection(ConnectionAction::Open { connection, url }) => {
                *socket = Some(open_socket(connection, url, tx.clone()));
            },
            SessionAction::Connection(ConnectionAction::Transmit { payload, .. }) => {
                assert!(socket.as_ref().unwrap().transmit(payload));
            },
            SessionAction::Connection(ConnectionAction::Close { .. }) => {
                socket.as_ref().unwrap().close();
            },
            SessionAction::CreateRoom { .. } | SessionAction::StateChanged => {},
        }
    }
}

#[tokio::test]
async fn session_over_real_transport() {
    let base = spawn_backend().await;
    let config = SessionConfig {
        backend: BackendConfig::new(&base),
        debounce_delay: Duration::from_millis(50),
    };
    let mut session = Session::new(SystemEnv::new(), config);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut socket = None;

    session.set_room_id("R1".into());
    session.set_username("alice".into());
    let actions = session.join_room();
    execute(actions, &mut socket, &tx);

    let actions = session.handle(next_event(&mut rx).await.into());
    execute(actions, &mut socket, &tx);
    assert!(session.can_send());

    // Welcome frame
    session.handle(next_event(&mut rx).await.into());
    assert_eq!(session.messages().len(), 1);

    session.type_message("h".into());
    session.type_message("hi".into());
    tokio::time::sleep(Duration::from_millis(60)).await;
    let now = session.env().now();
    let actions = session.handle(SessionEvent::Tick { now });
    execute(actions, &mut socket, &tx);

    // Echo of the debounced send
    session.handle(next_event(&mut rx).await.into());
    let last = session.messages().last().unwrap();
    assert_eq!(last.content, "hi");
    assert_eq!(last.arrival_order, 1);

    let actions = session.leave();
    execute(actions, &mut socket, &tx);
    session.handle(next_event(&mut rx).await.into());
    assert!(!session.can_send());
    assert_eq!(session.messages().len(), 2, "log survives the close");
}

#[tokio::test]
async fn leave_while_connecting_releases_session() {
    let base = spawn_silent_listener().await;
    let config = SessionConfig { backend: BackendConfig::new(&base), ..SessionConfig::default() };
    let mut session = Session::new(SystemEnv::new(), config);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut socket = None;

    session.set_room_id("R1".into());
    session.set_username("alice".into());
    execute(session.join_room(), &mut socket, &tx);
    assert_eq!(session.phase(), SessionPhase::Connecting);

    execute(session.leave(), &mut socket, &tx);
    session.handle(next_event(&mut rx).await.into());

    assert_eq!(session.phase(), SessionPhase::Closed);
    assert!(!session.is_busy());
    assert!(!session.create_room().is_empty(), "session usable again");
}
