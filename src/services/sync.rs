//! Full synchronization pass.
//!
//! Chains the subsystem end to end: resolve an identifier, persist it,
//! fan it out to the dependents, verify convergence, and record a status
//! document for operators. A pass only fails hard when no identifier can
//! be resolved at all; every downstream problem degrades the pass
//! instead of aborting it.

use crate::domain::error::SyncResult;
use crate::domain::models::flow::{Resolution, ResolutionSource};
use crate::domain::models::sync::SyncStatusRecord;
use crate::infrastructure::storage::FlowIdStore;
use crate::services::propagator::{PropagationReport, Propagator};
use crate::services::resolver::FlowResolver;
use crate::services::verifier::{ConvergenceVerifier, Verification};

/// Classification of a completed pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Every propagation task succeeded and the backend converged.
    Clean,
    /// The pass completed, but with task failures or without verified
    /// convergence. Not a hard failure of the host process.
    Degraded,
}

/// End-of-pass summary handed back to the caller.
#[derive(Debug, Clone)]
pub struct SyncReport {
    pub flow_id: String,
    pub source: ResolutionSource,
    pub propagation: PropagationReport,
    pub verification: Verification,
    pub outcome: SyncOutcome,
}

/// Coordinates one resolve → persist → propagate → verify pass.
pub struct SyncService {
    resolver: FlowResolver,
    store: FlowIdStore,
    propagator: Propagator,
    verifier: ConvergenceVerifier,
}

impl SyncService {
    pub fn new(
        resolver: FlowResolver,
        store: FlowIdStore,
        propagator: Propagator,
        verifier: ConvergenceVerifier,
    ) -> Self {
        Self {
            resolver,
            store,
            propagator,
            verifier,
        }
    }

    /// Run a full pass, resolving through the fallback chain.
    pub async fn run_pass(&mut self) -> SyncResult<SyncReport> {
        let resolution = self.resolver.resolve().await?;
        Ok(self.complete_pass(resolution).await)
    }

    /// Run a full pass for an identifier something else already
    /// resolved (e.g. the change watcher observed it in the store).
    pub async fn run_pass_for(&mut self, flow_id: &str) -> SyncReport {
        let resolution = Resolution::new(flow_id, ResolutionSource::Persisted);
        self.complete_pass(resolution).await
    }

    async fn complete_pass(&mut self, resolution: Resolution) -> SyncReport {
        let flow_id = resolution.flow_id.clone();

        // Durably record the canonical value. Failure degrades: the
        // in-memory value carries the rest of the pass.
        if let Err(e) = self.store.save(&flow_id) {
            tracing::warn!(flow_id = %flow_id, error = %e, "Could not persist flow id, continuing in memory");
        }

        let propagation = self.propagator.propagate(&flow_id).await;
        let verification = self.verifier.verify(&flow_id).await;

        let outcome = if propagation.all_succeeded() && verification == Verification::Converged {
            SyncOutcome::Clean
        } else {
            SyncOutcome::Degraded
        };

        let status = SyncStatusRecord::new(&flow_id, propagation.succeeded, propagation.total);
        if let Err(e) = self.store.write_sync_status(&status) {
            tracing::warn!(error = %e, "Could not write sync status record");
        }

        match outcome {
            SyncOutcome::Clean => tracing::info!(
                flow_id = %flow_id,
                source = resolution.source.label(),
                tasks = %propagation.tally(),
                "Flow id sync completed"
            ),
            SyncOutcome::Degraded => tracing::warn!(
                flow_id = %flow_id,
                source = resolution.source.label(),
                tasks = %propagation.tally(),
                verification = verification.label(),
                "Flow id sync completed with warnings"
            ),
        }

        SyncReport {
            flow_id,
            source: resolution.source,
            propagation,
            verification,
            outcome,
        }
    }
}
