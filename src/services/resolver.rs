//! Layered flow-id resolution.
//!
//! Produces a single identifier from an ordered fallback chain, stopping
//! at the first source that yields a value. The chain order depends on
//! the caller's role: the orchestrator is the writer of record and
//! trusts the persisted file first, while the backend trusts its own
//! configured value first so an operator override always wins locally.
//! The resolver is constructed once per process and handed to call sites
//! explicitly; its cache lives exactly as long as the process.

use std::fs;

use crate::domain::error::{SyncError, SyncResult};
use crate::domain::models::flow::{Resolution, ResolutionSource, ResolverRole};
use crate::infrastructure::engine::EngineClient;
use crate::infrastructure::storage::FlowIdStore;

/// Resolves the canonical flow identifier for one process.
#[derive(Debug)]
pub struct FlowResolver {
    store: FlowIdStore,
    engine: EngineClient,
    role: ResolverRole,
    /// Identifier supplied by deployment configuration, if any.
    configured_id: Option<String>,
    /// Name of the flow auto-detection prefers.
    target_flow_name: String,
    /// Last value this process resolved. Lives until process exit.
    cached: Option<String>,
}

impl FlowResolver {
    pub fn new(
        store: FlowIdStore,
        engine: EngineClient,
        role: ResolverRole,
        configured_id: Option<String>,
        target_flow_name: impl Into<String>,
    ) -> Self {
        Self {
            store,
            engine,
            role,
            configured_id,
            target_flow_name: target_flow_name.into(),
            cached: None,
        }
    }

    /// The value this process last resolved, if any.
    pub fn cached(&self) -> Option<&str> {
        self.cached.as_deref()
    }

    /// Resolve an identifier through the role's fallback chain.
    ///
    /// Local sources are consulted first; the engine is only queried
    /// when none of them yields a value. Every success fills the
    /// in-process cache.
    pub async fn resolve(&mut self) -> SyncResult<Resolution> {
        if let Some(resolution) = self.resolve_local() {
            tracing::info!(
                flow_id = %resolution.flow_id,
                source = resolution.source.label(),
                "Resolved flow id"
            );
            self.cached = Some(resolution.flow_id.clone());
            return Ok(resolution);
        }

        tracing::info!("No local flow id available, querying the engine");
        let resolution = self.auto_detect().await?;
        self.cached = Some(resolution.flow_id.clone());
        Ok(resolution)
    }

    /// Resolve, creating the flow if the engine has none (bootstrap).
    ///
    /// Orchestrator-only entry point. A persisted candidate is verified
    /// against the engine before being trusted: a restart may have left a
    /// stale id behind. Whatever this returns has been persisted.
    pub async fn get_or_create(&mut self, definition_path: &str) -> SyncResult<Resolution> {
        if let Some(stored) = self.store.load() {
            if self.engine.flow_exists(&stored).await? {
                tracing::info!(flow_id = %stored, "Persisted flow still exists on the engine");
                self.cached = Some(stored.clone());
                return Ok(Resolution::new(stored, ResolutionSource::Persisted));
            }
            tracing::warn!(flow_id = %stored, "Persisted flow no longer exists, rediscovering");
        }

        match self.auto_detect().await {
            Ok(resolution) => {
                self.persist(&resolution.flow_id);
                self.cached = Some(resolution.flow_id.clone());
                Ok(resolution)
            }
            Err(SyncError::NoFlowFound) => {
                let flow_id = self.upload_definition(definition_path).await?;
                tracing::info!(flow_id = %flow_id, "Uploaded new flow definition");
                self.persist(&flow_id);
                self.cached = Some(flow_id.clone());
                Ok(Resolution::new(flow_id, ResolutionSource::Bootstrapped))
            }
            Err(e) => Err(e),
        }
    }

    /// Walk the local (non-network) sources in role order.
    fn resolve_local(&self) -> Option<Resolution> {
        match self.role {
            ResolverRole::Orchestrator => self
                .from_store()
                .or_else(|| self.from_config())
                .or_else(|| self.from_cache()),
            ResolverRole::Backend => self
                .from_config()
                .or_else(|| self.from_store())
                .or_else(|| self.from_cache()),
        }
    }

    fn from_store(&self) -> Option<Resolution> {
        self.store
            .load()
            .map(|id| Resolution::new(id, ResolutionSource::Persisted))
    }

    fn from_config(&self) -> Option<Resolution> {
        self.configured_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .map(|id| Resolution::new(id, ResolutionSource::Configured))
    }

    fn from_cache(&self) -> Option<Resolution> {
        self.cached
            .as_deref()
            .map(|id| Resolution::new(id, ResolutionSource::Cached))
    }

    /// Query the engine's flow listing. Prefers the configured target
    /// name; falls back to the first listed flow with degraded
    /// confidence; an empty listing is `NoFlowFound`.
    async fn auto_detect(&self) -> SyncResult<Resolution> {
        let flows = self.engine.list_flows().await?;

        if let Some(flow) = flows
            .iter()
            .find(|f| f.name.as_deref() == Some(self.target_flow_name.as_str()))
        {
            tracing::info!(flow_id = %flow.id, name = %self.target_flow_name, "Found target flow on the engine");
            return Ok(Resolution::new(
                flow.id.clone(),
                ResolutionSource::AutoDetected { matched_name: true },
            ));
        }

        if let Some(flow) = flows.first() {
            tracing::warn!(
                flow_id = %flow.id,
                name = flow.name.as_deref().unwrap_or("unknown"),
                "Target flow not found, using first available flow"
            );
            return Ok(Resolution::new(
                flow.id.clone(),
                ResolutionSource::AutoDetected {
                    matched_name: false,
                },
            ));
        }

        Err(SyncError::NoFlowFound)
    }

    async fn upload_definition(&self, definition_path: &str) -> SyncResult<String> {
        let raw = fs::read_to_string(definition_path).map_err(|e| {
            SyncError::FlowDefinition(format!("{definition_path}: {e}"))
        })?;
        let definition: serde_json::Value = serde_json::from_str(&raw)
            .map_err(|e| SyncError::FlowDefinition(format!("{definition_path}: {e}")))?;

        self.engine.upload_flow(&definition).await
    }

    /// Persist a freshly adopted value. Failure degrades to a warning:
    /// the in-memory value remains usable for this process lifetime.
    fn persist(&self, flow_id: &str) {
        if let Err(e) = self.store.save(flow_id) {
            tracing::warn!(flow_id = %flow_id, error = %e, "Could not persist flow id");
        }
    }
}
