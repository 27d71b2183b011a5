//! Domain models.

pub mod config;
pub mod flow;
pub mod sync;

pub use config::{
    BackendConfig, Config, EngineConfig, LoggingConfig, ReadinessConfig, StorageConfig,
    WatcherConfig,
};
pub use flow::{FlowSummary, Resolution, ResolutionSource, ResolverRole};
pub use sync::{ChangeNotification, DependentSyncRecord, FlowIdSidecar, SyncStatusRecord};
