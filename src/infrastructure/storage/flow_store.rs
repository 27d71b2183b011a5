//! Persisted flow-id record and its observability sidecars.
//!
//! The store is the only shared mutable resource between the cooperating
//! processes. No locking: every writer performs a full-content overwrite
//! through a temp file + atomic rename, every reader performs a
//! full-content read, so a reader sees a complete old or new value and
//! two near-simultaneous writes race only on which one prevails
//! (last-write-wins).

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::domain::error::{SyncError, SyncResult};
use crate::domain::models::sync::{
    ChangeNotification, DependentSyncRecord, FlowIdSidecar, SyncStatusRecord,
};

/// Well-known file names inside the shared data directory.
const FLOW_ID_FILE: &str = "flow_id.txt";
const FLOW_ID_SIDECAR: &str = "flow_id.json";
const SYNC_STATUS_FILE: &str = "sync_status.json";
const CHANGE_NOTIFICATION_FILE: &str = "flow_id_changed.json";
const BACKEND_SYNC_FILE: &str = "backend_env_sync.json";
const FRONTEND_SYNC_FILE: &str = "frontend_sync.json";

/// Reads and writes the canonical identifier on shared storage.
#[derive(Debug, Clone)]
pub struct FlowIdStore {
    data_dir: PathBuf,
}

impl FlowIdStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Path of the plain-text record.
    pub fn flow_id_path(&self) -> PathBuf {
        self.data_dir.join(FLOW_ID_FILE)
    }

    /// Load the persisted identifier.
    ///
    /// Absent or empty files yield `None`. Read errors degrade to `None`
    /// with a warning so resolution can fall through its chain.
    pub fn load(&self) -> Option<String> {
        let path = self.flow_id_path();
        if !path.exists() {
            return None;
        }
        match fs::read_to_string(&path) {
            Ok(contents) => {
                let trimmed = contents.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read persisted flow id");
                None
            }
        }
    }

    /// Persist the identifier, overwriting any previous value.
    ///
    /// Also writes the JSON sidecar with a timestamp; the sidecar is
    /// best-effort and its failure only logs a warning.
    pub fn save(&self, flow_id: &str) -> SyncResult<()> {
        self.write_atomic(&self.flow_id_path(), flow_id.as_bytes())?;

        let sidecar = FlowIdSidecar::new(flow_id);
        if let Err(e) = self.write_json(&self.data_dir.join(FLOW_ID_SIDECAR), &sidecar) {
            tracing::warn!(error = %e, "Failed to write flow id sidecar");
        }

        tracing::debug!(flow_id = %flow_id, path = %self.flow_id_path().display(), "Persisted flow id");
        Ok(())
    }

    /// Overwrite the sync status record.
    pub fn write_sync_status(&self, record: &SyncStatusRecord) -> SyncResult<()> {
        self.write_json(&self.data_dir.join(SYNC_STATUS_FILE), record)
    }

    /// Read back the latest sync status record, if any.
    pub fn read_sync_status(&self) -> Option<SyncStatusRecord> {
        self.read_json(&self.data_dir.join(SYNC_STATUS_FILE))
    }

    /// Overwrite the change notification record.
    pub fn write_change_notification(&self, notification: &ChangeNotification) -> SyncResult<()> {
        self.write_json(&self.data_dir.join(CHANGE_NOTIFICATION_FILE), notification)
    }

    /// Read back the latest change notification, if any.
    pub fn read_change_notification(&self) -> Option<ChangeNotification> {
        self.read_json(&self.data_dir.join(CHANGE_NOTIFICATION_FILE))
    }

    /// Drop the sync record consumed by the backend container.
    pub fn write_backend_sync(&self, flow_id: &str) -> SyncResult<()> {
        let record = DependentSyncRecord::new(flow_id);
        self.write_json(&self.data_dir.join(BACKEND_SYNC_FILE), &record)
    }

    /// Drop the sync record consumed by the frontend container.
    pub fn write_frontend_sync(&self, flow_id: &str) -> SyncResult<()> {
        let record = DependentSyncRecord::new(flow_id);
        self.write_json(&self.data_dir.join(FRONTEND_SYNC_FILE), &record)
    }

    fn write_json<T: serde::Serialize>(&self, path: &Path, value: &T) -> SyncResult<()> {
        let bytes = serde_json::to_vec_pretty(value)
            .map_err(|e| SyncError::PersistenceUnavailable(e.to_string()))?;
        self.write_atomic(path, &bytes)
    }

    fn read_json<T: serde::de::DeserializeOwned>(&self, path: &Path) -> Option<T> {
        let contents = fs::read_to_string(path).ok()?;
        match serde_json::from_str(&contents) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to parse stored record");
                None
            }
        }
    }

    /// Full-content overwrite via temp file + rename, so concurrent
    /// readers never observe a partial write.
    fn write_atomic(&self, path: &Path, bytes: &[u8]) -> SyncResult<()> {
        fs::create_dir_all(&self.data_dir)
            .map_err(|e| SyncError::PersistenceUnavailable(e.to_string()))?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "record".to_string());
        let tmp_path = self.data_dir.join(format!(".{file_name}.tmp"));

        let mut tmp = fs::File::create(&tmp_path)
            .map_err(|e| SyncError::PersistenceUnavailable(e.to_string()))?;
        tmp.write_all(bytes)
            .and_then(|()| tmp.flush())
            .map_err(|e| SyncError::PersistenceUnavailable(e.to_string()))?;
        drop(tmp);

        fs::rename(&tmp_path, path).map_err(|e| SyncError::PersistenceUnavailable(e.to_string()))
    }
}
