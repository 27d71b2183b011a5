//! Best-effort propagation of a resolved identifier.
//!
//! Runs an ordered list of independent tasks and tallies the outcome.
//! A task failure never aborts the remaining tasks and never fails the
//! pass; partial success is a normal outcome, reflected in the report.

use async_trait::async_trait;

use crate::domain::error::SyncResult;
use crate::infrastructure::backend::BackendClient;
use crate::infrastructure::storage::FlowIdStore;

/// One propagation target.
#[async_trait]
pub trait PropagationTask: Send + Sync {
    /// Task name, used in logs and the failure report.
    fn name(&self) -> &str;

    /// Push the identifier to this target.
    async fn run(&self, flow_id: &str) -> SyncResult<()>;
}

/// Outcome of one propagation pass.
#[derive(Debug, Clone)]
pub struct PropagationReport {
    /// Tasks that succeeded.
    pub succeeded: usize,
    /// Tasks attempted.
    pub total: usize,
    /// `(task name, error)` for each failed task, in execution order.
    pub failures: Vec<(String, String)>,
}

impl PropagationReport {
    pub fn all_succeeded(&self) -> bool {
        self.succeeded == self.total
    }

    /// `"3/4"`-style fraction for summaries.
    pub fn tally(&self) -> String {
        format!("{}/{}", self.succeeded, self.total)
    }
}

/// Executes propagation tasks in order.
pub struct Propagator {
    tasks: Vec<Box<dyn PropagationTask>>,
}

impl Propagator {
    pub fn new(tasks: Vec<Box<dyn PropagationTask>>) -> Self {
        Self { tasks }
    }

    /// The standard task set: notify the backend, broadcast to the UI
    /// channels, and drop the filesystem sync records for dependents
    /// that only share storage.
    pub fn standard(backend: BackendClient, store: FlowIdStore) -> Self {
        Self::new(vec![
            Box::new(UpdateBackendTask {
                client: backend.clone(),
            }),
            Box::new(BroadcastUiTask { client: backend }),
            Box::new(BackendSyncFileTask {
                store: store.clone(),
            }),
            Box::new(FrontendSyncFileTask { store }),
        ])
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Run every task against `flow_id`, in order, absorbing failures.
    pub async fn propagate(&self, flow_id: &str) -> PropagationReport {
        let mut succeeded = 0;
        let mut failures = Vec::new();

        for task in &self.tasks {
            tracing::info!(task = task.name(), flow_id = %flow_id, "Running propagation task");
            match task.run(flow_id).await {
                Ok(()) => succeeded += 1,
                Err(e) => {
                    tracing::warn!(task = task.name(), error = %e, "Propagation task failed");
                    failures.push((task.name().to_string(), e.to_string()));
                }
            }
        }

        PropagationReport {
            succeeded,
            total: self.tasks.len(),
            failures,
        }
    }
}

/// Tell the backend to adopt the identifier.
struct UpdateBackendTask {
    client: BackendClient,
}

#[async_trait]
impl PropagationTask for UpdateBackendTask {
    fn name(&self) -> &str {
        "update backend"
    }

    async fn run(&self, flow_id: &str) -> SyncResult<()> {
        self.client.update_flow_id(flow_id, "flowsync").await
    }
}

/// Fan the change out to UI-facing channels through the backend.
struct BroadcastUiTask {
    client: BackendClient,
}

#[async_trait]
impl PropagationTask for BroadcastUiTask {
    fn name(&self) -> &str {
        "broadcast to ui"
    }

    async fn run(&self, flow_id: &str) -> SyncResult<()> {
        self.client.broadcast_flow_id(flow_id).await
    }
}

/// Write the backend's filesystem sync record.
struct BackendSyncFileTask {
    store: FlowIdStore,
}

#[async_trait]
impl PropagationTask for BackendSyncFileTask {
    fn name(&self) -> &str {
        "backend sync file"
    }

    async fn run(&self, flow_id: &str) -> SyncResult<()> {
        self.store.write_backend_sync(flow_id)
    }
}

/// Write the frontend's filesystem sync record.
struct FrontendSyncFileTask {
    store: FlowIdStore,
}

#[async_trait]
impl PropagationTask for FrontendSyncFileTask {
    fn name(&self) -> &str {
        "frontend sync file"
    }

    async fn run(&self, flow_id: &str) -> SyncResult<()> {
        self.store.write_frontend_sync(flow_id)
    }
}
