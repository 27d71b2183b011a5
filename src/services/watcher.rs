//! Flow-id change detector.
//!
//! A long-lived polling loop that re-reads the persisted record and
//! compares it against the last value it knew about. On divergence it
//! records a change notification and emits an event so the host can run
//! a new propagate/verify cycle. Stopping is cooperative: the flag is
//! checked between ticks and in-flight work finishes before the loop
//! exits.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::interval;

use crate::domain::models::config::WatcherConfig;
use crate::domain::models::sync::ChangeNotification;
use crate::infrastructure::storage::FlowIdStore;

/// Event emitted by the watcher.
#[derive(Debug, Clone)]
pub enum WatcherEvent {
    /// Monitoring started with this last-known value.
    Started { initial: Option<String> },
    /// The persisted value diverged from the last-known value.
    FlowChanged {
        old: Option<String>,
        new: String,
    },
    /// The loop exited after a stop request.
    Stopped,
}

/// Handle to request a cooperative stop.
#[derive(Debug, Clone)]
pub struct WatcherHandle {
    stop_flag: Arc<AtomicBool>,
}

impl WatcherHandle {
    /// Request the watcher to stop after its current tick.
    pub fn stop(&self) {
        self.stop_flag.store(true, Ordering::Release);
    }

    /// Check if stop was requested.
    pub fn is_stop_requested(&self) -> bool {
        self.stop_flag.load(Ordering::Acquire)
    }
}

/// Polls the persistence store for identifier changes.
#[derive(Debug)]
pub struct FlowWatcher {
    store: FlowIdStore,
    poll_interval: Duration,
    stop_flag: Arc<AtomicBool>,
    last_known: Option<String>,
}

impl FlowWatcher {
    /// Create a watcher and initialize its last-known value from the
    /// store (which may hold nothing yet).
    pub fn new(store: FlowIdStore, config: &WatcherConfig) -> Self {
        let last_known = store.load();
        tracing::info!(
            initial = last_known.as_deref().unwrap_or("none"),
            poll_interval_secs = config.poll_interval_secs,
            "Flow watcher initialized"
        );
        Self {
            store,
            poll_interval: Duration::from_secs(config.poll_interval_secs),
            stop_flag: Arc::new(AtomicBool::new(false)),
            last_known,
        }
    }

    /// Get a handle to control the watcher.
    pub fn handle(&self) -> WatcherHandle {
        WatcherHandle {
            stop_flag: self.stop_flag.clone(),
        }
    }

    /// The value the watcher currently believes is canonical.
    pub fn last_known(&self) -> Option<&str> {
        self.last_known.as_deref()
    }

    /// One poll tick.
    ///
    /// Returns the change when the loaded value is non-empty and differs
    /// from last-known; updates last-known and records the notification
    /// as a side effect. A quiescent tick returns `None`.
    pub fn tick(&mut self) -> Option<ChangeNotification> {
        let loaded = self.store.load()?;
        if self.last_known.as_deref() == Some(loaded.as_str()) {
            return None;
        }

        let old = self.last_known.replace(loaded.clone());
        tracing::info!(
            old = old.as_deref().unwrap_or("none"),
            new = %loaded,
            "Flow id changed"
        );

        let notification = ChangeNotification::new(old, loaded);
        if let Err(e) = self.store.write_change_notification(&notification) {
            tracing::warn!(error = %e, "Could not record change notification");
        }
        Some(notification)
    }

    /// Run the monitoring loop, returning a channel of events.
    pub fn run(self) -> mpsc::Receiver<WatcherEvent> {
        let (tx, rx) = mpsc::channel(16);

        tokio::spawn(async move {
            self.run_loop(tx).await;
        });

        rx
    }

    async fn run_loop(mut self, tx: mpsc::Sender<WatcherEvent>) {
        let _ = tx
            .send(WatcherEvent::Started {
                initial: self.last_known.clone(),
            })
            .await;

        let mut ticker = interval(self.poll_interval);
        // The first tick fires immediately; consume it so the loop waits
        // a full interval before the first poll.
        ticker.tick().await;

        loop {
            ticker.tick().await;

            if self.stop_flag.load(Ordering::Acquire) {
                break;
            }

            if let Some(change) = self.tick() {
                let event = WatcherEvent::FlowChanged {
                    old: change.old_flow_id.clone(),
                    new: change.new_flow_id.clone(),
                };
                if tx.send(event).await.is_err() {
                    // Receiver gone; nothing left to notify.
                    break;
                }
            }

            if self.stop_flag.load(Ordering::Acquire) {
                break;
            }
        }

        tracing::info!("Flow watcher stopped");
        let _ = tx.send(WatcherEvent::Stopped).await;
    }
}
