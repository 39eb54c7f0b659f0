//! Fetch a monitor definition as YAML and create a workflow
//!
//! Run with: `cargo run --example monitor_yaml -- <monitor-id>`

use groundcover_client::{Error, GroundcoverClient};

const WORKFLOW: &str = r#"id: notify-on-oom
description: Notify when a container is OOM killed
triggers:
  - type: alert
    filters:
      - key: reason
        value: OOMKilled
actions:
  - name: slack
    provider:
      type: slack
"#;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let monitor_id = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("usage: monitor_yaml <monitor-id>"))?;

    let client = GroundcoverClient::from_env()?;

    match client.get_monitor(monitor_id.as_str()).call().await {
        Ok(yaml) => {
            println!("--- monitor {} ---", monitor_id);
            println!("{}", String::from_utf8_lossy(&yaml));
        }
        Err(Error::Client { status: 404, .. }) => {
            println!("Monitor {} does not exist", monitor_id);
        }
        Err(e) => return Err(e.into()),
    }

    // Sent as text/plain regardless of what the caller sets
    let created = client.create_workflow(WORKFLOW).call().await?;
    println!("Created workflow: {}", created);

    Ok(())
}
