//! Convergence verification.
//!
//! After propagation, reads the backend's currently-effective identifier
//! and compares it to the value just propagated. None of the outcomes is
//! fatal; divergence is a warning, an unreachable backend an error log,
//! and both only feed the pass classification.

use crate::infrastructure::backend::BackendClient;

/// Result of comparing the backend's effective identifier against the
/// propagated value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    /// Backend reports exactly the propagated value.
    Converged,
    /// Backend reports a different (or no) value.
    Diverged { effective: Option<String> },
    /// The read itself failed.
    Unreachable { reason: String },
}

impl Verification {
    /// Short label for logs and summaries.
    pub fn label(&self) -> &'static str {
        match self {
            Verification::Converged => "converged",
            Verification::Diverged { .. } => "diverged",
            Verification::Unreachable { .. } => "unreachable",
        }
    }
}

/// Queries the backend's read endpoint to confirm convergence.
#[derive(Debug, Clone)]
pub struct ConvergenceVerifier {
    backend: BackendClient,
}

impl ConvergenceVerifier {
    pub fn new(backend: BackendClient) -> Self {
        Self { backend }
    }

    /// Compare the backend's effective identifier with `expected` by
    /// exact string equality.
    pub async fn verify(&self, expected: &str) -> Verification {
        match self.backend.current_flow_id().await {
            Ok(Some(effective)) if effective == expected => {
                tracing::info!(flow_id = %expected, "Backend converged on propagated flow id");
                Verification::Converged
            }
            Ok(effective) => {
                tracing::warn!(
                    expected = %expected,
                    effective = effective.as_deref().unwrap_or("none"),
                    "Backend reports a different flow id"
                );
                Verification::Diverged { effective }
            }
            Err(e) => {
                tracing::error!(error = %e, "Could not read backend flow id for verification");
                Verification::Unreachable {
                    reason: e.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(Verification::Converged.label(), "converged");
        assert_eq!(
            Verification::Diverged { effective: None }.label(),
            "diverged"
        );
        assert_eq!(
            Verification::Unreachable {
                reason: "timeout".to_string()
            }
            .label(),
            "unreachable"
        );
    }

    #[tokio::test]
    async fn test_unreachable_backend() {
        let backend = BackendClient::new("http://127.0.0.1:1", std::time::Duration::from_millis(200));
        let verifier = ConvergenceVerifier::new(backend);
        let outcome = verifier.verify("flow-1").await;
        assert!(matches!(outcome, Verification::Unreachable { .. }));
    }
}
