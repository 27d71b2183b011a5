//! Service layer: the components of the discovery & propagation
//! subsystem.

pub mod propagator;
pub mod readiness;
pub mod resolver;
pub mod sync;
pub mod verifier;
pub mod watcher;

pub use propagator::{PropagationReport, PropagationTask, Propagator};
pub use readiness::{ReadinessProber, ServiceProbe};
pub use resolver::FlowResolver;
pub use sync::{SyncOutcome, SyncReport, SyncService};
pub use verifier::{ConvergenceVerifier, Verification};
pub use watcher::{FlowWatcher, WatcherEvent, WatcherHandle};
