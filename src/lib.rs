//! Flowsync - Flow Identifier Discovery & Propagation
//!
//! Three independently deployed processes (an orchestration job, an API
//! backend, a UI) must agree on a single externally assigned identifier
//! naming a conversational-flow resource owned by a separate engine,
//! with no central coordinator — only a shared filesystem path and HTTP
//! calls. Flowsync discovers that identifier the first time a fresh
//! engine comes up, persists it across restarts, detects when it changes
//! underneath the deployment, and propagates the new value to every
//! dependent before declaring convergence.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): identifier/provenance types, the
//!   observability records, and the error taxonomy
//! - **Service Layer** (`services`): readiness prober, fallback
//!   resolver, change watcher, best-effort propagator, convergence
//!   verifier, and the pass coordinator
//! - **Infrastructure Layer** (`infrastructure`): configuration loading,
//!   the shared-storage store, and the engine/backend HTTP clients
//! - **CLI Layer** (`cli`): the `flowsync` command surface

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{
    ChangeNotification, Config, FlowSummary, Resolution, ResolutionSource, ResolverRole,
    SyncStatusRecord,
};
pub use domain::{SyncError, SyncResult};
pub use infrastructure::backend::BackendClient;
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use infrastructure::engine::EngineClient;
pub use infrastructure::storage::FlowIdStore;
pub use services::{
    ConvergenceVerifier, FlowResolver, FlowWatcher, PropagationReport, PropagationTask, Propagator,
    ReadinessProber, ServiceProbe, SyncOutcome, SyncReport, SyncService, Verification,
    WatcherEvent, WatcherHandle,
};
