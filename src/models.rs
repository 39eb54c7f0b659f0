//! Request and response bodies for the operations exposed by the client
//!
//! Field names follow the wire format of each endpoint, which is not
//! consistent across the API (metrics queries use PascalCase keys).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const COLUMN_TYPE_STRING: &str = "string";
pub const COLUMN_ORIGIN_ROOT: &str = "root";
pub const OP_EQUAL: &str = "eq";

/// Well-known filter keys
pub mod filter_keys {
    pub const WORKLOAD: &str = "workload";
    pub const CLUSTER: &str = "cluster";
    pub const ENV: &str = "env";
    pub const NAMESPACE: &str = "namespace";
    pub const INSTANCE: &str = "instance";
}

/// Body of a metrics query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueryRequest {
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promql: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<String>,
}

/// A search condition on one column
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_filter: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub auto_complete: bool,
    #[serde(default)]
    pub filter_keys: Vec<String>,
    #[serde(default)]
    pub filters: Vec<Filter>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_nullable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub column_type: Option<String>,
}

impl Condition {
    /// `key == value` on a root string column
    pub fn string_eq(key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            filter_keys: vec![key.clone()],
            filters: vec![Filter {
                op: OP_EQUAL.to_string(),
                value: value.into(),
            }],
            key: Some(key),
            origin: Some(COLUMN_ORIGIN_ROOT.to_string()),
            column_type: Some(COLUMN_TYPE_STRING.to_string()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub op: String,
    pub value: String,
}

/// Body of a logs search
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogsSearchRequest {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub query: String,
}

/// Body of an events search
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventsSearchRequest {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub query: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteSilenceRequest {
    pub id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSecretRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub secret_type: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateSecretRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub secret_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// A stored secret; the content is never returned
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretResponse {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub secret_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_request_uses_pascal_case() {
        let request = QueryRequest {
            promql: Some("count(groundcover_node_capacity_mem_bytes{})".to_string()),
            query_type: Some("instant".to_string()),
            step: Some("1m".to_string()),
            ..Default::default()
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "Conditions": [],
                "Promql": "count(groundcover_node_capacity_mem_bytes{})",
                "QueryType": "instant",
                "Step": "1m"
            })
        );
    }

    #[test]
    fn test_string_eq_condition() {
        let condition = Condition::string_eq(filter_keys::NAMESPACE, "default");
        let value = serde_json::to_value(&condition).unwrap();
        assert_eq!(
            value,
            json!({
                "filterKeys": ["namespace"],
                "filters": [{"op": "eq", "value": "default"}],
                "key": "namespace",
                "origin": "root",
                "type": "string"
            })
        );
    }

    #[test]
    fn test_secret_response_tolerates_missing_fields() {
        let secret: SecretResponse = serde_json::from_value(json!({"id": "s-1"})).unwrap();
        assert_eq!(secret.id, "s-1");
        assert!(secret.name.is_empty());
    }
}
