//! Startup health probe.

use shhh_client::{RequestError, transport::RoomApi};
use shhh_core::BackendConfig;
use tokio::task::JoinHandle;

/// Check the backend's health endpoint in the background.
///
/// Returns at once; the outcome is logged and also available through the
/// returned handle. A failing probe is never fatal.
pub fn spawn_health_check(
    api: &RoomApi,
    backend: &BackendConfig,
) -> JoinHandle<Result<String, RequestError>> {
    let api = api.clone();
    let url = backend.health_url();
    tokio::spawn(async move {
        let result = api.health(&url).await;
        match &result {
            Ok(body) => tracing::info!(%body, "backend healthy"),
            Err(e) => tracing::warn!(error = %e, "backend health check failed"),
        }
        result
    })
}
