//! Firewall Sync Types
//!
//! Wire shapes for the record store and the management API, plus the
//! structured result of a sync operation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single IP rule as the management API represents it.
///
/// The same shape is used on the read path (rule list) and the write path
/// (full replacement body), so both sides of the API speak one schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpRule {
    /// IP address permitted by this rule
    pub value: String,
}

/// Response body of the firewall-rules read.
#[derive(Debug, Deserialize)]
pub struct FirewallRuleList {
    pub value: Vec<IpRule>,
}

/// Request body of the firewall-rules write (full overwrite).
///
/// Any rule absent from `ip_rules` is dropped by the remote service, so
/// callers must always submit the complete desired list.
#[derive(Debug, Serialize)]
pub struct FirewallRuleSetRequest {
    pub properties: FirewallRuleProperties,
}

#[derive(Debug, Serialize)]
pub struct FirewallRuleProperties {
    #[serde(rename = "ipRules")]
    pub ip_rules: Vec<IpRule>,
}

impl FirewallRuleSetRequest {
    /// Build a replacement rule set from a complete list of IPs.
    pub fn from_ips(ips: &[String]) -> Self {
        Self {
            properties: FirewallRuleProperties {
                ip_rules: ips.iter().map(|ip| IpRule { value: ip.clone() }).collect(),
            },
        }
    }
}

/// One observed-IP entity from the record store.
///
/// Written upstream by the IP watcher; this agent only reads the `IP`
/// column. The table schema must return the most recently written entity
/// first - that ordering is a precondition on the store, not enforced here.
#[derive(Debug, Deserialize)]
pub struct IpRecordEntity {
    #[serde(rename = "PartitionKey")]
    pub partition_key: String,
    #[serde(rename = "RowKey")]
    pub row_key: String,
    #[serde(rename = "IP")]
    pub ip: String,
}

/// Table query response (`odata=nometadata` payload).
#[derive(Debug, Deserialize)]
pub struct TableQueryResponse {
    pub value: Vec<IpRecordEntity>,
}

/// What a sync invocation did to the allow-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncAction {
    Updated,
    Unchanged,
}

/// Result of a firewall sync operation.
#[derive(Debug, Clone, Serialize)]
pub struct SyncOutcome {
    /// Whether the allow-list was rewritten
    pub action: SyncAction,
    /// The latest observed IP
    pub ip: String,
    /// Size of the allow-list after the sync
    pub rule_count: usize,
    /// Timestamp of the sync
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_set_request_serialization() {
        let request = FirewallRuleSetRequest::from_ips(&[
            "198.51.100.1".to_string(),
            "203.0.113.7".to_string(),
        ]);

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "properties": {
                    "ipRules": [
                        { "value": "198.51.100.1" },
                        { "value": "203.0.113.7" },
                    ]
                }
            })
        );
    }

    #[test]
    fn test_rule_list_deserialization() {
        let body = r#"{ "value": [ { "value": "198.51.100.1" } ] }"#;
        let list: FirewallRuleList = serde_json::from_str(body).unwrap();

        assert_eq!(list.value.len(), 1);
        assert_eq!(list.value[0].value, "198.51.100.1");
    }

    #[test]
    fn test_rule_list_rejects_shape_mismatch() {
        // A bare string list is not the rule schema; decoding must fail
        // explicitly rather than coerce.
        let body = r#"{ "value": [ "198.51.100.1" ] }"#;
        assert!(serde_json::from_str::<FirewallRuleList>(body).is_err());
    }

    #[test]
    fn test_ip_record_entity_deserialization() {
        let body = r#"{
            "value": [
                {
                    "PartitionKey": "FirewallUpdate",
                    "RowKey": "0001",
                    "Timestamp": "2024-11-02T09:30:00Z",
                    "IP": "203.0.113.7"
                }
            ]
        }"#;

        let response: TableQueryResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.value.len(), 1);
        assert_eq!(response.value[0].partition_key, "FirewallUpdate");
        assert_eq!(response.value[0].ip, "203.0.113.7");
    }
}
