//! Observability records written to shared storage.
//!
//! These documents are derived artifacts: they are fully overwritten on
//! every write, consumed by external observers, and never read back into
//! resolution decisions.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Timestamp format used in the human-readable `sync_time` fields.
const SYNC_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Status record written at the end of every synchronization pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncStatusRecord {
    /// Unix timestamp of the pass.
    pub timestamp: i64,
    /// Identifier the pass propagated.
    pub flow_id: String,
    /// Whether every propagation task succeeded.
    pub sync_success: bool,
    /// Propagation tasks that succeeded.
    pub tasks_completed: usize,
    /// Propagation tasks attempted.
    pub total_tasks: usize,
    /// Human-readable time of the pass.
    pub last_sync: String,
}

impl SyncStatusRecord {
    pub fn new(flow_id: impl Into<String>, tasks_completed: usize, total_tasks: usize) -> Self {
        let now = Utc::now();
        Self {
            timestamp: now.timestamp(),
            flow_id: flow_id.into(),
            sync_success: tasks_completed == total_tasks,
            tasks_completed,
            total_tasks,
            last_sync: now.format(SYNC_TIME_FORMAT).to_string(),
        }
    }
}

/// Notification written when the change detector observes a divergence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeNotification {
    /// RFC 3339 timestamp of the observation.
    pub timestamp: String,
    /// Previous last-known value, if the watcher had one.
    pub old_flow_id: Option<String>,
    /// Newly observed value.
    pub new_flow_id: String,
    /// Human-readable description.
    pub message: String,
}

impl ChangeNotification {
    pub fn new(old_flow_id: Option<String>, new_flow_id: impl Into<String>) -> Self {
        let new_flow_id = new_flow_id.into();
        let message = match &old_flow_id {
            Some(old) => format!("Flow ID updated from {old} to {new_flow_id}"),
            None => format!("Flow ID set to {new_flow_id}"),
        };
        Self {
            timestamp: Utc::now().to_rfc3339(),
            old_flow_id,
            new_flow_id,
            message,
        }
    }
}

/// Sidecar written next to the plain-text record on every save.
///
/// The timestamp gives readers staleness provenance without a locking
/// protocol; the plain file stays last-write-wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowIdSidecar {
    pub flow_id: String,
    pub timestamp: i64,
    pub sync_time: String,
}

impl FlowIdSidecar {
    pub fn new(flow_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            flow_id: flow_id.into(),
            timestamp: now.timestamp(),
            sync_time: now.format(SYNC_TIME_FORMAT).to_string(),
        }
    }
}

/// Record dropped in shared storage for dependents that only see the
/// filesystem (backend env sync, frontend sync).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependentSyncRecord {
    pub flow_id: String,
    pub timestamp: i64,
    pub sync_time: String,
}

impl DependentSyncRecord {
    pub fn new(flow_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            flow_id: flow_id.into(),
            timestamp: now.timestamp(),
            sync_time: now.format(SYNC_TIME_FORMAT).to_string(),
        }
    }
}
