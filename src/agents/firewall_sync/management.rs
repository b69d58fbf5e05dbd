//! Management API Firewall Client
//!
//! Reads and replaces the IP allow-list of one protected resource via the
//! Azure management API. The write is a full overwrite: the submitted list
//! becomes the entire rule set, and anything omitted is dropped by the
//! service. A fresh bearer token is issued for each call.

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};

use super::azure_auth::{AadTokenIssuer, MANAGEMENT_SCOPE};
use super::orchestrator::FirewallRuleStore;
use super::types::{FirewallRuleList, FirewallRuleSetRequest};
use crate::config::SyncConfig;
use crate::error::{Result, SyncError};

const MANAGEMENT_API_BASE: &str = "https://management.azure.com";
const FIREWALL_API_VERSION: &str = "2022-07-01";

/// ARM firewall-rules client for one target resource.
pub struct ArmFirewallClient {
    http_client: Client,
    token_issuer: AadTokenIssuer,
    subscription_id: String,
    resource_group: String,
    resource_provider: String,
    resource_name: String,
}

impl ArmFirewallClient {
    pub fn new(http_client: Client, token_issuer: AadTokenIssuer, config: &SyncConfig) -> Self {
        Self {
            http_client,
            token_issuer,
            subscription_id: config.subscription_id.clone(),
            resource_group: config.resource_group.clone(),
            resource_provider: config.resource_provider.clone(),
            resource_name: config.resource_name.clone(),
        }
    }

    fn resource_base(&self) -> String {
        format!(
            "{}/subscriptions/{}/resourceGroups/{}/providers/{}/{}",
            MANAGEMENT_API_BASE,
            self.subscription_id,
            self.resource_group,
            self.resource_provider,
            self.resource_name
        )
    }

    fn rules_url(&self) -> String {
        format!(
            "{}/firewallRules?api-version={}",
            self.resource_base(),
            FIREWALL_API_VERSION
        )
    }

    fn default_rule_set_url(&self) -> String {
        format!(
            "{}/firewallRules/default?api-version={}",
            self.resource_base(),
            FIREWALL_API_VERSION
        )
    }

    async fn read_rules(&self) -> Result<Vec<String>> {
        let token = self.token_issuer.issue(MANAGEMENT_SCOPE).await?;

        debug!(resource = %self.resource_name, "Reading firewall allow-list");

        let response = self
            .http_client
            .get(self.rules_url())
            .bearer_auth(&token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let reason = response.text().await.unwrap_or_default();
            return Err(SyncError::RemoteApi { status, reason });
        }

        let list: FirewallRuleList = response.json().await?;

        Ok(list.value.into_iter().map(|rule| rule.value).collect())
    }

    async fn write_rules(&self, rules: &[String]) -> Result<()> {
        let token = self.token_issuer.issue(MANAGEMENT_SCOPE).await?;
        let body = FirewallRuleSetRequest::from_ips(rules);

        info!(
            resource = %self.resource_name,
            rules = rules.len(),
            "Replacing firewall allow-list"
        );

        let response = self
            .http_client
            .put(self.default_rule_set_url())
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let reason = response.text().await.unwrap_or_default();
            return Err(SyncError::RemoteApi { status, reason });
        }

        Ok(())
    }
}

#[async_trait]
impl FirewallRuleStore for ArmFirewallClient {
    async fn current_rules(&self) -> Result<Vec<String>> {
        self.read_rules().await
    }

    async fn replace_rules(&self, rules: &[String]) -> Result<()> {
        self.write_rules(rules).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ArmFirewallClient {
        ArmFirewallClient {
            http_client: Client::new(),
            token_issuer: AadTokenIssuer::new(
                Client::new(),
                &crate::config::SyncConfig {
                    storage_account: "ipwatcher".to_string(),
                    table_name: "ObservedIps".to_string(),
                    resource_name: "search-prod".to_string(),
                    subscription_id: "sub-123".to_string(),
                    resource_group: "rg-prod".to_string(),
                    resource_provider: "Microsoft.CognitiveServices/accounts".to_string(),
                    client_id: "client-abc".to_string(),
                    client_secret: "s3cret".to_string(),
                    tenant_id: "tenant-xyz".to_string(),
                },
            ),
            subscription_id: "sub-123".to_string(),
            resource_group: "rg-prod".to_string(),
            resource_provider: "Microsoft.CognitiveServices/accounts".to_string(),
            resource_name: "search-prod".to_string(),
        }
    }

    #[test]
    fn test_rules_url() {
        assert_eq!(
            client().rules_url(),
            "https://management.azure.com/subscriptions/sub-123/resourceGroups/rg-prod\
             /providers/Microsoft.CognitiveServices/accounts/search-prod\
             /firewallRules?api-version=2022-07-01"
        );
    }

    #[test]
    fn test_default_rule_set_url() {
        assert_eq!(
            client().default_rule_set_url(),
            "https://management.azure.com/subscriptions/sub-123/resourceGroups/rg-prod\
             /providers/Microsoft.CognitiveServices/accounts/search-prod\
             /firewallRules/default?api-version=2022-07-01"
        );
    }
}
