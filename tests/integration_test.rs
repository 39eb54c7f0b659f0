//! Integration tests against a live groundcover backend

use groundcover_client::{GroundcoverClient, RequestOptions};

/// Helper to create a client from environment variables
fn create_test_client() -> GroundcoverClient {
    GroundcoverClient::from_env().expect("Failed to create client from environment")
}

#[tokio::test]
#[ignore = "requires groundcover API credentials"]
async fn test_node_count_query() {
    let client = create_test_client();

    let result = client
        .query_metrics()
        .promql("count(groundcover_node_capacity_mem_bytes{})")
        .call()
        .await;

    assert!(result.is_ok(), "Failed to query metrics: {:?}", result.err());
}

#[tokio::test]
#[ignore = "requires groundcover API credentials"]
async fn test_gzip_logs_search() {
    let client = create_test_client();

    let result = client
        .search_logs()
        .query("level:error | limit 5")
        .options(RequestOptions::new().gzip(true))
        .call()
        .await;

    assert!(result.is_ok(), "Failed to search logs: {:?}", result.err());
}

#[tokio::test]
#[ignore = "requires groundcover API credentials"]
async fn test_list_workflows_and_silences() {
    let client = create_test_client();

    let workflows = client.list_workflows().call().await;
    assert!(workflows.is_ok(), "Failed to list workflows: {:?}", workflows.err());

    let silences = client.list_silences().call().await;
    assert!(silences.is_ok(), "Failed to list silences: {:?}", silences.err());
}
