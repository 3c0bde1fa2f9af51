//! HTTP calls to the backend.

use std::time::Duration;

use reqwest::{Client, header::CONTENT_TYPE};
use shhh_core::protocol::CreateRoomResponse;

use super::TransportError;
use crate::error::RequestError;

/// HTTP client for room creation and health checks.
#[derive(Debug, Clone, Default)]
pub struct RoomApi {
    client: Client,
}

impl RoomApi {
    /// Client with reqwest defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Client whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// - `TransportError::Client` if the TLS backend cannot be initialised
    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;
        Ok(Self { client })
    }

    /// `POST` to the room-creation endpoint and return the new room ID.
    ///
    /// # Errors
    ///
    /// - `RequestError::Status` if the backend answers with a non-success
    ///   status
    /// - `RequestError::Transport` if the request never completes
    /// - `RequestError::InvalidResponse` if the body has no room ID
    pub async fn create_room(&self, url: &str) -> Result<String, RequestError> {
        tracing::debug!(%url, "creating room");

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| RequestError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RequestError::Status {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let body = response.bytes().await.map_err(|e| RequestError::Transport(e.to_string()))?;
        let created = CreateRoomResponse::decode(&body)
            .map_err(|e| RequestError::InvalidResponse(e.to_string()))?;
        Ok(created.room_id)
    }

    /// `GET` the health endpoint and return its body.
    ///
    /// # Errors
    ///
    /// Same as [`RoomApi::create_room`], minus `InvalidResponse`.
    pub async fn health(&self, url: &str) -> Result<String, RequestError> {
        let response =
            self.client.get(url).send().await.map_err(|e| RequestError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RequestError::Status {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        response.text().await.map_err(|e| RequestError::Transport(e.to_string()))
    }
}
