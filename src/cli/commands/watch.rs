//! `flowsync watch` — long-running change detection.
//!
//! Starts the watcher loop and, on every observed divergence, runs a
//! propagate → verify cycle for the new value. Ctrl-C requests a
//! cooperative stop; the loop finishes its current tick before exiting.

use anyhow::Result;
use clap::Args;

use crate::domain::models::config::Config;
use crate::domain::models::flow::ResolverRole;
use crate::infrastructure::backend::BackendClient;
use crate::infrastructure::engine::EngineClient;
use crate::infrastructure::storage::FlowIdStore;
use crate::services::{
    ConvergenceVerifier, FlowResolver, FlowWatcher, Propagator, SyncService, WatcherEvent,
};

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Run one full sync pass before starting to watch
    #[arg(long)]
    pub sync_on_start: bool,
}

pub async fn execute(args: WatchArgs, config: &Config, json_mode: bool) -> Result<()> {
    let engine = EngineClient::from_config(&config.engine);
    let backend = BackendClient::from_config(&config.backend);
    let store = FlowIdStore::new(&config.storage.data_dir);

    let resolver = FlowResolver::new(
        store.clone(),
        engine,
        ResolverRole::Orchestrator,
        config.flow_id.clone(),
        &config.engine.flow_name,
    );
    let propagator = Propagator::standard(backend.clone(), store.clone());
    let verifier = ConvergenceVerifier::new(backend);
    let mut service = SyncService::new(resolver, store.clone(), propagator, verifier);

    if args.sync_on_start {
        let report = service.run_pass().await?;
        super::sync::print_report(&report, json_mode);
    }

    let watcher = FlowWatcher::new(store, &config.watcher);
    let handle = watcher.handle();
    let mut events = watcher.run();

    if !json_mode {
        println!(
            "Watching for flow id changes every {}s (ctrl-c to stop)",
            config.watcher.poll_interval_secs
        );
    }

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Stop requested, finishing current tick");
                handle.stop();
            }
            event = events.recv() => match event {
                Some(WatcherEvent::Started { initial }) => {
                    tracing::info!(
                        initial = initial.as_deref().unwrap_or("none"),
                        "Watcher started"
                    );
                }
                Some(WatcherEvent::FlowChanged { old, new }) => {
                    tracing::info!(
                        old = old.as_deref().unwrap_or("none"),
                        new = %new,
                        "Change detected, re-propagating"
                    );
                    let report = service.run_pass_for(&new).await;
                    super::sync::print_report(&report, json_mode);
                }
                Some(WatcherEvent::Stopped) | None => break,
            }
        }
    }

    if !json_mode {
        println!("Watcher stopped");
    }
    Ok(())
}
