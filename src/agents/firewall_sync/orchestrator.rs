//! Firewall Sync Orchestrator
//!
//! The read-compare-write sequence: fetch the latest observed IP, fetch the
//! current allow-list, and replace the allow-list only when the IP is not
//! yet present. Steps run strictly sequentially; a failure anywhere
//! propagates out and leaves no partial state behind (there is nothing to
//! roll back - the only side effect is the final write).

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

use super::types::{SyncAction, SyncOutcome};
use crate::error::Result;

/// Source of the most recently observed public IP.
#[async_trait]
pub trait IpRecordSource: Send + Sync {
    async fn latest_ip(&self) -> Result<String>;
}

/// Read/replace access to one resource's firewall allow-list.
///
/// `replace_rules` is a full overwrite; implementations must treat the
/// given list as the entire desired rule set.
#[async_trait]
pub trait FirewallRuleStore: Send + Sync {
    async fn current_rules(&self) -> Result<Vec<String>>;
    async fn replace_rules(&self, rules: &[String]) -> Result<()>;
}

/// Decide whether the allow-list needs rewriting.
///
/// Returns the full replacement list (original order preserved, new IP
/// appended once) when `latest_ip` is absent, or `None` when it is already
/// present by exact string match. Existing entries are never deduplicated
/// or removed.
pub fn plan_rule_update(latest_ip: &str, current: &[String]) -> Option<Vec<String>> {
    if current.iter().any(|rule| rule == latest_ip) {
        return None;
    }

    let mut updated = current.to_vec();
    updated.push(latest_ip.to_string());
    Some(updated)
}

/// Orchestrates one sync pass over an IP source and a rule store.
pub struct FirewallSyncAgent<S, F> {
    ip_source: S,
    rule_store: F,
}

impl<S, F> FirewallSyncAgent<S, F>
where
    S: IpRecordSource,
    F: FirewallRuleStore,
{
    pub fn new(ip_source: S, rule_store: F) -> Self {
        Self {
            ip_source,
            rule_store,
        }
    }

    /// Run one read-compare-write pass.
    pub async fn sync(&self) -> Result<SyncOutcome> {
        let latest_ip = self.ip_source.latest_ip().await?;
        info!(ip = %latest_ip, "Fetched latest observed IP");

        let current = self.rule_store.current_rules().await?;

        match plan_rule_update(&latest_ip, &current) {
            None => {
                info!(ip = %latest_ip, "Allow-list already contains IP, no changes");
                Ok(SyncOutcome {
                    action: SyncAction::Unchanged,
                    ip: latest_ip,
                    rule_count: current.len(),
                    timestamp: Utc::now(),
                })
            }
            Some(updated) => {
                self.rule_store.replace_rules(&updated).await?;
                info!(
                    ip = %latest_ip,
                    rules = updated.len(),
                    "Firewall allow-list updated"
                );
                Ok(SyncOutcome {
                    action: SyncAction::Updated,
                    ip: latest_ip,
                    rule_count: updated.len(),
                    timestamp: Utc::now(),
                })
            }
        }
    }
}
