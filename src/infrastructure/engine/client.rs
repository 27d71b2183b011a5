//! HTTP client for the flow engine API.
//!
//! Wraps the engine's v1 REST surface: health probe, flow listing,
//! per-flow existence check, definition upload (bootstrap path), and
//! flow execution (smoke test). Every call carries an explicit timeout
//! and maps transport or status failures to [`SyncError::Engine`] —
//! a slow or absent engine is a normal failure, never a panic.

use std::time::Duration;

use reqwest::Client;

use crate::domain::error::{SyncError, SyncResult};
use crate::domain::models::config::EngineConfig;
use crate::domain::models::flow::FlowSummary;

/// Typed client for the engine's flow API.
#[derive(Debug, Clone)]
pub struct EngineClient {
    http: Client,
    base_url: String,
    timeout: Duration,
}

impl EngineClient {
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

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(&config.host, Duration::from_secs(config.request_timeout_secs))
    }

    /// Liveness endpoint, used by the readiness prober.
    pub fn health_url(&self) -> String {
        format!("{}/api/v1/health", self.base_url)
    }

    /// List the flows the engine currently hosts.
    pub async fn list_flows(&self) -> SyncResult<Vec<FlowSummary>> {
        let url = format!("{}/api/v1/flows/", self.base_url);
        let resp = self
            .http
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| SyncError::Engine(format!("list flows request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            return Err(SyncError::Engine(format!("list flows returned {status}")));
        }

        resp.json::<Vec<FlowSummary>>()
            .await
            .map_err(|e| SyncError::Engine(format!("list flows parse failed: {e}")))
    }

    /// Check whether a flow with the given id still exists on the engine.
    ///
    /// A 404 is a definitive "no"; any other non-success status is an
    /// engine failure.
    pub async fn flow_exists(&self, flow_id: &str) -> SyncResult<bool> {
        let url = format!("{}/api/v1/flows/{}", self.base_url, flow_id);
        let resp = self
            .http
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| SyncError::Engine(format!("flow existence check failed: {e}")))?;

        if resp.status().is_success() {
            return Ok(true);
        }
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(false);
        }
        Err(SyncError::Engine(format!(
            "flow existence check returned {}",
            resp.status()
        )))
    }

    /// Upload a flow definition and return the engine-assigned identifier.
    ///
    /// The engine answers the upload with a listing of the created flows;
    /// the first entry carries the id we adopt.
    pub async fn upload_flow(&self, definition: &serde_json::Value) -> SyncResult<String> {
        let url = format!("{}/api/v1/flows/upload/", self.base_url);
        let resp = self
            .http
            .post(url)
            .timeout(self.timeout)
            .json(definition)
            .send()
            .await
            .map_err(|e| SyncError::Engine(format!("flow upload request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(SyncError::Engine(format!(
                "flow upload returned {status}: {body}"
            )));
        }

        let created: Vec<FlowSummary> = resp
            .json()
            .await
            .map_err(|e| SyncError::Engine(format!("flow upload parse failed: {e}")))?;

        created
            .into_iter()
            .next()
            .map(|flow| flow.id)
            .ok_or_else(|| SyncError::Engine("flow upload response contained no flow".to_string()))
    }

    /// Run a flow once with a chat input. Used as a post-bootstrap smoke
    /// test; the response body is returned untyped since only success
    /// matters here.
    pub async fn run_flow(&self, flow_id: &str, input: &str) -> SyncResult<serde_json::Value> {
        let url = format!("{}/api/v1/run/{}", self.base_url, flow_id);
        let payload = serde_json::json!({
            "input_value": input,
            "input_type": "chat",
            "output_type": "chat",
            "session_id": "flowsync_smoke_test"
        });

        let resp = self
            .http
            .post(url)
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await
            .map_err(|e| SyncError::Engine(format!("flow run request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            return Err(SyncError::Engine(format!("flow run returned {status}")));
        }

        resp.json()
            .await
            .map_err(|e| SyncError::Engine(format!("flow run parse failed: {e}")))
    }
}
