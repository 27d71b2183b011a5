//! Flow identity types.
//!
//! A flow identifier is an opaque token assigned by the engine; at any
//! instant at most one value is canonical and all cooperating processes
//! converge to it. Brief windows of disagreement are tolerated.

use serde::{Deserialize, Serialize};

/// One element of the engine's flow listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowSummary {
    /// Engine-assigned identifier.
    pub id: String,
    /// Display name, if the engine reports one.
    #[serde(default)]
    pub name: Option<String>,
}

/// Which process is asking the resolver.
///
/// The orchestrator is the writer of record and trusts the persisted
/// value first; the backend is a reader and trusts its own configured
/// value first so an operator override always wins locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverRole {
    Orchestrator,
    Backend,
}

/// Where a resolved identifier came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionSource {
    /// Read from the persisted record on shared storage.
    Persisted,
    /// Supplied by deployment configuration.
    Configured,
    /// Last value this process resolved, still held in memory.
    Cached,
    /// Discovered by querying the engine's flow listing.
    AutoDetected {
        /// Whether the flow matched the configured target name, or was
        /// merely the first entry in the listing (degraded confidence).
        matched_name: bool,
    },
    /// Created by uploading the bundled flow definition.
    Bootstrapped,
}

impl ResolutionSource {
    /// Short label for logs and CLI output.
    pub fn label(&self) -> &'static str {
        match self {
            ResolutionSource::Persisted => "persisted",
            ResolutionSource::Configured => "configured",
            ResolutionSource::Cached => "cached",
            ResolutionSource::AutoDetected { matched_name: true } => "auto-detected",
            ResolutionSource::AutoDetected { matched_name: false } => "auto-detected (first flow)",
            ResolutionSource::Bootstrapped => "bootstrapped",
        }
    }
}

/// A successfully resolved identifier plus its provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub flow_id: String,
    pub source: ResolutionSource,
}

impl Resolution {
    pub fn new(flow_id: impl Into<String>, source: ResolutionSource) -> Self {
        Self {
            flow_id: flow_id.into(),
            source,
        }
    }
}
