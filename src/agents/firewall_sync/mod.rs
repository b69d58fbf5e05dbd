//! Firewall Sync Agent
//!
//! Keeps the IP allow-list of an access-controlled Azure resource in sync
//! with a dynamic public IP. An upstream watcher records the network's
//! current public IP in a Table storage table; this agent reads the latest
//! record, compares it against the resource's firewall rules via the
//! management API, and appends it when missing.
//!
//! ## Flow
//!
//! 1. Read the newest `FirewallUpdate` record from Table storage
//! 2. Read the current allow-list from the management API
//! 3. If the IP is absent, PUT the full list with the IP appended
//!
//! All remote calls authenticate with fresh service-principal bearer tokens.

mod azure_auth;
mod management;
mod orchestrator;
mod table_storage;
mod types;

use std::time::Duration;

use reqwest::Client;

use crate::config::SyncConfig;
use crate::error::Result;

pub use azure_auth::{AadTokenIssuer, MANAGEMENT_SCOPE, STORAGE_SCOPE};
pub use management::ArmFirewallClient;
pub use orchestrator::{plan_rule_update, FirewallRuleStore, FirewallSyncAgent, IpRecordSource};
pub use table_storage::TableIpSource;
pub use types::{
    FirewallRuleList, FirewallRuleProperties, FirewallRuleSetRequest, IpRecordEntity, IpRule,
    SyncAction, SyncOutcome, TableQueryResponse,
};

/// The agent wired to its production sources.
pub type AzureFirewallSync = FirewallSyncAgent<TableIpSource, ArmFirewallClient>;

impl AzureFirewallSync {
    /// Build the fully wired agent: one shared HTTP client, a token issuer
    /// for the configured service principal, and the table and management
    /// API clients around it.
    pub fn from_config(config: &SyncConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        let token_issuer = AadTokenIssuer::new(http_client.clone(), config);
        let ip_source = TableIpSource::new(http_client.clone(), token_issuer.clone(), config);
        let rule_store = ArmFirewallClient::new(http_client, token_issuer, config);

        Ok(FirewallSyncAgent::new(ip_source, rule_store))
    }
}
