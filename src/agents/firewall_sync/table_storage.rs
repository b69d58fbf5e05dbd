//! Table Storage IP Source
//!
//! Reads the most recently observed public IP from an Azure Table storage
//! table. The upstream watcher writes entities into the `FirewallUpdate`
//! partition with descending row keys, so the store's default result order
//! yields the newest entity first; this component asks for exactly one.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::azure_auth::{AadTokenIssuer, STORAGE_SCOPE};
use super::orchestrator::IpRecordSource;
use super::types::TableQueryResponse;
use crate::config::SyncConfig;
use crate::error::{Result, SyncError};

const TABLE_API_VERSION: &str = "2020-12-06";

/// Partition tag of observed-IP entities.
const IP_PARTITION: &str = "FirewallUpdate";

/// Table storage client scoped to one account and table.
pub struct TableIpSource {
    http_client: Client,
    token_issuer: AadTokenIssuer,
    storage_account: String,
    table_name: String,
}

impl TableIpSource {
    pub fn new(http_client: Client, token_issuer: AadTokenIssuer, config: &SyncConfig) -> Self {
        Self {
            http_client,
            token_issuer,
            storage_account: config.storage_account.clone(),
            table_name: config.table_name.clone(),
        }
    }

    fn query_url(&self) -> String {
        format!(
            "https://{}.table.core.windows.net/{}()",
            self.storage_account, self.table_name
        )
    }

    fn partition_filter() -> String {
        format!("PartitionKey eq '{IP_PARTITION}'")
    }

    async fn fetch_latest(&self) -> Result<String> {
        let token = self.token_issuer.issue(STORAGE_SCOPE).await?;

        debug!(table = %self.table_name, "Querying latest IP record");

        let response = self
            .http_client
            .get(self.query_url())
            .query(&[
                ("$filter", Self::partition_filter()),
                ("$top", "1".to_string()),
            ])
            .bearer_auth(&token)
            .header("Accept", "application/json;odata=nometadata")
            .header("x-ms-version", TABLE_API_VERSION)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let reason = response.text().await.unwrap_or_default();
            return Err(SyncError::RemoteApi { status, reason });
        }

        let body: TableQueryResponse = response.json().await?;

        body.value
            .into_iter()
            .next()
            .map(|entity| entity.ip)
            .ok_or(SyncError::IpRecordNotFound {
                table: self.table_name.clone(),
            })
    }
}

#[async_trait]
impl IpRecordSource for TableIpSource {
    async fn latest_ip(&self) -> Result<String> {
        self.fetch_latest().await
    }
}
