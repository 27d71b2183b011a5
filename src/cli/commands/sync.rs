//! `flowsync sync` — the orchestrated synchronization run.
//!
//! readiness-wait → resolve → persist → propagate → verify → summary.
//! A degraded pass (task failures, unverified convergence) still exits
//! zero; only a run that cannot resolve any identifier fails.

use anyhow::Result;
use clap::Args;

use crate::domain::models::config::Config;
use crate::domain::models::flow::ResolverRole;
use crate::infrastructure::backend::BackendClient;
use crate::infrastructure::engine::EngineClient;
use crate::infrastructure::storage::FlowIdStore;
use crate::services::{
    ConvergenceVerifier, FlowResolver, Propagator, ReadinessProber, ServiceProbe, SyncOutcome,
    SyncReport, SyncService,
};

#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Skip the readiness gate (assume services are up)
    #[arg(long)]
    pub skip_readiness: bool,
}

pub async fn execute(args: SyncArgs, config: &Config, json_mode: bool) -> Result<()> {
    let engine = EngineClient::from_config(&config.engine);
    let backend = BackendClient::from_config(&config.backend);
    let store = FlowIdStore::new(&config.storage.data_dir);

    if !args.skip_readiness {
        let prober = ReadinessProber::new(&config.readiness);
        prober
            .wait_all(&[
                ServiceProbe::new("engine", engine.health_url()),
                ServiceProbe::new("backend", backend.health_url()),
            ])
            .await?;
    }

    let resolver = FlowResolver::new(
        store.clone(),
        engine,
        ResolverRole::Orchestrator,
        config.flow_id.clone(),
        &config.engine.flow_name,
    );
    let propagator = Propagator::standard(backend.clone(), store.clone());
    let verifier = ConvergenceVerifier::new(backend);
    let mut service = SyncService::new(resolver, store, propagator, verifier);

    let report = service.run_pass().await?;
    print_report(&report, json_mode);
    Ok(())
}

pub(crate) fn print_report(report: &SyncReport, json_mode: bool) {
    if json_mode {
        let payload = serde_json::json!({
            "status": match report.outcome {
                SyncOutcome::Clean => "success",
                SyncOutcome::Degraded => "degraded",
            },
            "flow_id": report.flow_id,
            "source": report.source.label(),
            "tasks_completed": report.propagation.succeeded,
            "total_tasks": report.propagation.total,
            "failures": report.propagation.failures.iter()
                .map(|(task, error)| serde_json::json!({ "task": task, "error": error }))
                .collect::<Vec<_>>(),
            "verification": report.verification.label(),
        });
        println!("{payload}");
        return;
    }

    println!();
    match report.outcome {
        SyncOutcome::Clean => println!("Flow id sync completed successfully"),
        SyncOutcome::Degraded => println!("Flow id sync completed with warnings"),
    }
    println!("   Flow id:      {} ({})", report.flow_id, report.source.label());
    println!("   Tasks:        {}", report.propagation.tally());
    for (task, error) in &report.propagation.failures {
        println!("     failed: {task}: {error}");
    }
    println!("   Verification: {}", report.verification.label());
}
