//! Domain layer: core types and the error taxonomy.

pub mod error;
pub mod models;

pub use error::{SyncError, SyncResult};
