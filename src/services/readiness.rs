//! Readiness prober.
//!
//! Gates all identifier work: nothing can be resolved or propagated
//! until the processes we depend on answer their health endpoints.
//! Several independent processes run their own prober against the same
//! endpoints concurrently; the prober holds no shared state, so the
//! instances cannot interfere.

use std::time::Duration;

use reqwest::Client;

use crate::domain::error::{SyncError, SyncResult};
use crate::domain::models::config::ReadinessConfig;
use crate::infrastructure::retry::{poll_until, PollPolicy};

/// A named health endpoint to wait on.
#[derive(Debug, Clone)]
pub struct ServiceProbe {
    pub name: String,
    pub health_url: String,
}

impl ServiceProbe {
    pub fn new(name: impl Into<String>, health_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            health_url: health_url.into(),
        }
    }
}

/// Polls a set of health endpoints until all report ready.
#[derive(Debug, Clone)]
pub struct ReadinessProber {
    http: Client,
    policy: PollPolicy,
    probe_timeout: Duration,
}

impl ReadinessProber {
    pub fn new(config: &ReadinessConfig) -> Self {
        Self {
            http: Client::new(),
            policy: PollPolicy {
                interval: Duration::from_secs(config.poll_interval_secs),
                max_attempts: config.max_attempts,
                progress_every: config.progress_every,
            },
            probe_timeout: Duration::from_secs(config.probe_timeout_secs),
        }
    }

    /// Wait until every probe answers with a success status in the same
    /// round. Returns the number of rounds used.
    ///
    /// Fails with [`SyncError::ServicesNotReady`] naming the services
    /// that were still pending when the attempt budget ran out.
    pub async fn wait_all(&self, probes: &[ServiceProbe]) -> SyncResult<u32> {
        if probes.is_empty() {
            return Ok(0);
        }

        tracing::info!(
            services = %probes.iter().map(|p| p.name.as_str()).collect::<Vec<_>>().join(", "),
            max_attempts = self.policy.max_attempts,
            "Waiting for services to become ready"
        );

        let result = poll_until("service readiness", &self.policy, |_attempt| async move {
            let pending = self.probe_round(probes).await;
            if pending.is_empty() {
                Some(())
            } else {
                tracing::debug!(pending = %pending.join(", "), "Services still pending");
                None
            }
        })
        .await;

        match result {
            Some(((), attempts)) => {
                tracing::info!(attempts, "All services ready");
                Ok(attempts)
            }
            None => {
                // One more round to report an accurate pending set.
                let pending = self.probe_round(probes).await;
                Err(SyncError::ServicesNotReady {
                    waited_secs: self.policy.budget_secs(),
                    pending,
                })
            }
        }
    }

    /// Probe every endpoint once, returning the names that are not ready.
    async fn probe_round(&self, probes: &[ServiceProbe]) -> Vec<String> {
        let mut pending = Vec::new();
        for probe in probes {
            if !self.is_ready(probe).await {
                pending.push(probe.name.clone());
            }
        }
        pending
    }

    async fn is_ready(&self, probe: &ServiceProbe) -> bool {
        match self
            .http
            .get(&probe.health_url)
            .timeout(self.probe_timeout)
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                tracing::debug!(service = %probe.name, error = %e, "Health probe failed");
                false
            }
        }
    }
}
