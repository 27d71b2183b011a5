//! `flowsync status` — operator view of the last sync pass.

use anyhow::Result;
use clap::Args;

use crate::domain::models::config::Config;
use crate::infrastructure::storage::FlowIdStore;

#[derive(Args, Debug)]
pub struct StatusArgs {}

pub async fn execute(_args: StatusArgs, config: &Config, json_mode: bool) -> Result<()> {
    let store = FlowIdStore::new(&config.storage.data_dir);

    let flow_id = store.load();
    let status = store.read_sync_status();
    let change = store.read_change_notification();

    if json_mode {
        let payload = serde_json::json!({
            "flow_id": flow_id,
            "last_sync": status,
            "last_change": change,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    match &flow_id {
        Some(id) => println!("Persisted flow id: {id}"),
        None => println!("Persisted flow id: (none)"),
    }

    match &status {
        Some(record) => {
            println!(
                "Last sync: {} ({} tasks {}/{})",
                record.last_sync,
                if record.sync_success { "ok" } else { "degraded" },
                record.tasks_completed,
                record.total_tasks
            );
        }
        None => println!("Last sync: (no record)"),
    }

    if let Some(notification) = &change {
        println!("Last change: {}", notification.message);
    }

    Ok(())
}
