//! Basic usage: metrics, logs, and workflows
//!
//! Run with: `cargo run --example basic_usage`
//!
//! Requires `GC_API_KEY` and `GC_BACKEND_ID` (a `.env` file works too).

use groundcover_client::models::{filter_keys, Condition};
use groundcover_client::GroundcoverClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let client = GroundcoverClient::from_env()?;
    println!("Connected to {} as {}", client.base_url(), client.backend_id());

    let nodes = client
        .query_metrics()
        .promql("count(groundcover_node_capacity_mem_bytes{})")
        .call()
        .await?;
    println!("Node count: {}", nodes);

    let cpu = client
        .query_metrics()
        .promql("avg(groundcover_container_cpu_limit_m_cpu)")
        .conditions(vec![Condition::string_eq(filter_keys::NAMESPACE, "default")])
        .step("1m")
        .call()
        .await?;
    println!("CPU limits in default namespace: {}", cpu);

    let logs = client
        .search_logs()
        .query("level:error | limit 10")
        .call()
        .await?;
    println!("Found {} error log lines in the last hour", logs.len());
    for line in logs.iter().take(3) {
        println!("  {}", line);
    }

    let workflows = client.list_workflows().call().await?;
    println!("Workflows: {}", workflows);

    Ok(())
}
