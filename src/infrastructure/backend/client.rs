//! HTTP client for the backend API.
//!
//! The backend hosts the dependent side of the protocol: an admin
//! endpoint to adopt a new identifier, a broadcast endpoint that fans the
//! change out to UI-facing channels, and a read endpoint reporting the
//! currently-effective identifier (used by the convergence verifier).

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::domain::error::{SyncError, SyncResult};
use crate::domain::models::config::BackendConfig;

#[derive(Debug, Deserialize)]
struct FlowIdResponse {
    flow_id: Option<String>,
}

/// Typed client for the backend's flow-id endpoints.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: Client,
    base_url: String,
    timeout: Duration,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            http: Client::new(),
            base_url,
            timeout,
        }
    }

    pub fn from_config(config: &BackendConfig) -> Self {
        Self::new(&config.host, Duration::from_secs(config.request_timeout_secs))
    }

    /// Liveness endpoint, used by the readiness prober.
    pub fn health_url(&self) -> String {
        format!("{}/health", self.base_url)
    }

    /// Tell the backend to adopt a new identifier.
    pub async fn update_flow_id(&self, flow_id: &str, source: &str) -> SyncResult<()> {
        let url = format!("{}/api/admin/update-flow-id", self.base_url);
        let payload = serde_json::json!({ "flow_id": flow_id, "source": source });

        let resp = self
            .http
            .post(url)
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await
            .map_err(|e| SyncError::Backend(format!("update-flow-id request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(SyncError::Backend(format!(
                "update-flow-id returned {}",
                resp.status()
            )));
        }
        Ok(())
    }

    /// Ask the backend to broadcast the identifier to UI-facing channels.
    pub async fn broadcast_flow_id(&self, flow_id: &str) -> SyncResult<()> {
        let url = format!("{}/api/admin/broadcast-flow-id", self.base_url);
        let payload = serde_json::json!({ "flow_id": flow_id });

        let resp = self
            .http
            .post(url)
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await
            .map_err(|e| SyncError::Backend(format!("broadcast-flow-id request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(SyncError::Backend(format!(
                "broadcast-flow-id returned {}",
                resp.status()
            )));
        }
        Ok(())
    }

    /// Identifier the backend is currently serving chat traffic with.
    pub async fn current_flow_id(&self) -> SyncResult<Option<String>> {
        let url = format!("{}/api/chatbot/flow-id", self.base_url);
        let resp = self
            .http
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| SyncError::Backend(format!("flow-id read failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(SyncError::Backend(format!(
                "flow-id read returned {}",
                resp.status()
            )));
        }

        let body: FlowIdResponse = resp
            .json()
            .await
            .map_err(|e| SyncError::Backend(format!("flow-id read parse failed: {e}")))?;
        Ok(body.flow_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_url() {
        let client = BackendClient::new("http://backend:8000/", Duration::from_secs(5));
        assert_eq!(client.health_url(), "http://backend:8000/health");
    }

    #[tokio::test]
    async fn test_current_flow_id_maps_transport_error() {
        let client = BackendClient::new("http://127.0.0.1:1", Duration::from_millis(200));
        let err = client.current_flow_id().await.unwrap_err();
        assert!(matches!(err, SyncError::Backend(_)));
    }
}
