//! `flowsync bootstrap` — first-boot flow discovery.
//!
//! Waits for the engine, then locates the target flow or creates it
//! from the bundled definition, persisting whatever identifier comes
//! out. Runs exactly once per fresh engine deployment in practice,
//! but is idempotent: re-runs find the persisted flow and stop there.

use anyhow::Result;
use clap::Args;

use crate::domain::models::config::Config;
use crate::domain::models::flow::ResolverRole;
use crate::infrastructure::engine::EngineClient;
use crate::infrastructure::storage::FlowIdStore;
use crate::services::{FlowResolver, ReadinessProber, ServiceProbe};

#[derive(Args, Debug)]
pub struct BootstrapArgs {
    /// Skip the readiness gate (assume the engine is up)
    #[arg(long)]
    pub skip_readiness: bool,

    /// Run the flow once after bootstrap to confirm it answers
    #[arg(long)]
    pub smoke_test: bool,
}

pub async fn execute(args: BootstrapArgs, config: &Config, json_mode: bool) -> Result<()> {
    let engine = EngineClient::from_config(&config.engine);
    let store = FlowIdStore::new(&config.storage.data_dir);

    if !args.skip_readiness {
        let prober = ReadinessProber::new(&config.readiness);
        prober
            .wait_all(&[ServiceProbe::new("engine", engine.health_url())])
            .await?;
    }

    let mut resolver = FlowResolver::new(
        store,
        engine.clone(),
        ResolverRole::Orchestrator,
        config.flow_id.clone(),
        &config.engine.flow_name,
    );

    let resolution = resolver.get_or_create(&config.engine.flow_definition).await?;

    // The smoke test is advisory: a flow that does not answer yet is a
    // warning, not a failed bootstrap.
    let mut smoke_ok = None;
    if args.smoke_test {
        match engine
            .run_flow(&resolution.flow_id, "bootstrap smoke test")
            .await
        {
            Ok(_) => smoke_ok = Some(true),
            Err(e) => {
                tracing::warn!(flow_id = %resolution.flow_id, error = %e, "Smoke test failed");
                smoke_ok = Some(false);
            }
        }
    }

    if json_mode {
        let payload = serde_json::json!({
            "status": "success",
            "flow_id": resolution.flow_id,
            "source": resolution.source.label(),
            "smoke_test": smoke_ok,
        });
        println!("{payload}");
    } else {
        println!();
        println!("Bootstrap complete");
        println!(
            "   Flow id: {} ({})",
            resolution.flow_id,
            resolution.source.label()
        );
        match smoke_ok {
            Some(true) => println!("   Smoke test: passed"),
            Some(false) => println!("   Smoke test: FAILED (see logs)"),
            None => {}
        }
    }

    Ok(())
}
