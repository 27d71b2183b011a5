//! Error taxonomy for the flow identifier subsystem.

use thiserror::Error;

/// Errors that can occur while discovering, persisting, or propagating
/// a flow identifier.
///
/// Only two of these are ever fatal to a run: [`SyncError::ServicesNotReady`]
/// when a run gates on readiness, and [`SyncError::NoFlowFound`] when no
/// identifier can be resolved from any source. Everything else is absorbed
/// at its call site and reflected in the pass classification.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("services not ready after {waited_secs}s, still pending: {}", pending.join(", "))]
    ServicesNotReady {
        waited_secs: u64,
        pending: Vec<String>,
    },

    #[error("no flows found on the engine")]
    NoFlowFound,

    #[error("shared storage unavailable: {0}")]
    PersistenceUnavailable(String),

    #[error("engine request failed: {0}")]
    Engine(String),

    #[error("backend request failed: {0}")]
    Backend(String),

    #[error("flow definition unreadable: {0}")]
    FlowDefinition(String),
}

pub type SyncResult<T> = Result<T, SyncError>;

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        SyncError::PersistenceUnavailable(err.to_string())
    }
}
