//! `flowsync resolve` — run the fallback chain once and print the result.

use anyhow::Result;
use clap::{Args, ValueEnum};

use crate::domain::models::config::Config;
use crate::domain::models::flow::ResolverRole;
use crate::infrastructure::engine::EngineClient;
use crate::infrastructure::storage::FlowIdStore;
use crate::services::FlowResolver;

/// Which process's precedence to apply.
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum RoleArg {
    /// Persisted record first (writer of record)
    Orchestrator,
    /// Configured value first (operator override)
    Backend,
}

impl From<RoleArg> for ResolverRole {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Orchestrator => ResolverRole::Orchestrator,
            RoleArg::Backend => ResolverRole::Backend,
        }
    }
}

#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Resolution precedence to apply
    #[arg(long, value_enum, default_value = "orchestrator")]
    pub role: RoleArg,
}

pub async fn execute(args: ResolveArgs, config: &Config, json_mode: bool) -> Result<()> {
    let engine = EngineClient::from_config(&config.engine);
    let store = FlowIdStore::new(&config.storage.data_dir);

    let mut resolver = FlowResolver::new(
        store,
        engine,
        args.role.into(),
        config.flow_id.clone(),
        &config.engine.flow_name,
    );

    let resolution = resolver.resolve().await?;

    if json_mode {
        let payload = serde_json::json!({
            "flow_id": resolution.flow_id,
            "source": resolution.source.label(),
        });
        println!("{payload}");
    } else {
        println!("{} ({})", resolution.flow_id, resolution.source.label());
    }

    Ok(())
}
