//! Wire protocol.
//!
//! JSON records exchanged with the backend:
//!
//! - `POST /room/create` answers with [`CreateRoomResponse`]
//! - the join connection carries [`OutgoingFrame`] client → server and
//!   [`IncomingFrame`] server → client, one JSON object per text frame

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;

/// Body of a successful room-creation response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRoomResponse {
    /// Server-issued room identifier.
    #[serde(rename = "roomId")]
    pub room_id: String,
}

impl CreateRoomResponse {
    /// Decode a response body.
    pub fn decode(body: &[u8]) -> Result<Self, ProtocolError> {
        serde_json::from_slice(body).map_err(|e| ProtocolError::Decode(e.to_string()))
    }
}

/// Chat frame sent to the room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingFrame {
    /// Message text.
    pub content: String,
}

impl OutgoingFrame {
    /// Create a frame carrying `content`.
    pub fn new(content: impl Into<String>) -> Self {
        Self { content: content.into() }
    }

    /// Serialize to the JSON text sent over the connection.
    pub fn encode(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(|e| ProtocolError::Encode(e.to_string()))
    }
}

/// Chat frame received from the room.
///
/// Only `content` is required. The backend's message record also carries the
/// sender's `username`; unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomingFrame {
    /// Message text.
    pub content: String,
    /// Sender, when the backend includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl IncomingFrame {
    /// Decode a text frame.
    pub fn decode(raw: &str) -> Result<Self, ProtocolError> {
        serde_json::from_str(raw).map_err(|e| ProtocolError::Decode(e.to_string()))
    }
}
