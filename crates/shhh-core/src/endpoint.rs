//! Backend endpoints.
//!
//! All URLs the client talks to are derived from a single base address such
//! as `http://localhost:8000`. The join connection uses `wss` exactly when the
//! base address is `https`.

use crate::error::ConnectError;

/// Address of the development backend.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Backend base address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    /// Base URL without trailing slash.
    base_url: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BACKEND_URL)
    }
}

impl BackendConfig {
    /// Create a config for the given base URL. Trailing slashes are dropped.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    /// Base URL without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether the backend is reached over TLS.
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }

    /// Room-creation endpoint (`POST`).
    pub fn create_room_url(&self) -> String {
        format!("{}/room/create", self.base_url)
    }

    /// Health endpoint (`GET`).
    pub fn health_url(&self) -> String {
        format!("{}/health", self.base_url)
    }

    /// Join endpoint for `room_id` as `username`.
    ///
    /// Both path segment and query value are percent-encoded.
    pub fn join_url(&self, room_id: &str, username: &str) -> Result<String, ConnectError> {
        if room_id.is_empty() {
            return Err(ConnectError::EmptyRoomId);
        }
        if username.is_empty() {
            return Err(ConnectError::EmptyUsername);
        }

        let (scheme, host) = if let Some(host) = self.base_url.strip_prefix("https://") {
            ("wss", host)
        } else if let Some(host) = self.base_url.strip_prefix("http://") {
            ("ws", host)
        } else {
            return Err(ConnectError::UnsupportedScheme(self.base_url.clone()));
        };

        Ok(format!(
            "{scheme}://{host}/room/{}/join?username={}",
            urlencoding::encode(room_id),
            urlencoding::encode(username)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_local_backend() {
        let config = BackendConfig::default();
        assert_eq!(config.create_room_url(), "http://localhost:8000/room/create");
        assert_eq!(config.health_url(), "http://localhost:8000/health");
        assert!(!config.is_secure());
    }

    #[test]
    fn join_url_uses_ws_for_plain_http() {
        let url = BackendConfig::new("http://localhost:8000/").join_url("R1", "alice").unwrap();
        insta::assert_snapshot!(url, @"ws://localhost:8000/room/R1/join?username=alice");
    }

    #[test]
    fn join_url_uses_wss_for_https() {
        let url = BackendConfig::new("https://chat.example.com").join_url("R1", "alice").unwrap();
        insta::assert_snapshot!(url, @"wss://chat.example.com/room/R1/join?username=alice");
    }

    #[test]
    fn join_url_percent_encodes_username() {
        let url = BackendConfig::default().join_url("R1", "a b&c=d/é").unwrap();
        insta::assert_snapshot!(
            url,
            @"ws://localhost:8000/room/R1/join?username=a%20b%26c%3Dd%2F%C3%A9"
        );
    }

    #[test]
    fn join_url_rejects_unknown_scheme() {
        let err = BackendConfig::new("ftp://host").join_url("R1", "alice").unwrap_err();
        assert_eq!(err, ConnectError::UnsupportedScheme("ftp://host".into()));

        let err = BackendConfig::new("https://").join_url("R1", "alice").unwrap_err();
        assert_eq!(err, ConnectError::UnsupportedScheme("https:".into()));
    }

    #[test]
    fn join_url_requires_room_and_username() {
        let config = BackendConfig::default();
        assert_eq!(config.join_url("", "alice"), Err(ConnectError::EmptyRoomId));
        assert_eq!(config.join_url("R1", ""), Err(ConnectError::EmptyUsername));
    }
}
