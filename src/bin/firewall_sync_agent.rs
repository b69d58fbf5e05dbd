//! Firewall Sync Agent - Standalone Binary
//!
//! Runs the read-compare-write pass directly, either once (CronJob mode) or
//! on an interval. `--dry-run` reports what a pass would write without
//! touching the firewall.

use anyhow::Result;
use clap::Parser;
use reqwest::Client;
use std::time::Duration;
use tokio::time::interval;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use firewall_sync_agent::firewall_sync::{
    plan_rule_update, AadTokenIssuer, ArmFirewallClient, FirewallRuleStore, FirewallSyncAgent,
    IpRecordSource, SyncAction, TableIpSource,
};
use firewall_sync_agent::SyncConfig;

/// Firewall Sync Agent - keeps a resource firewall in sync with a dynamic IP
#[derive(Parser, Debug)]
#[command(name = "firewall-sync-agent", version, about)]
struct Args {
    #[command(flatten)]
    config: SyncConfig,

    /// Sync interval in seconds
    #[arg(long, default_value = "300", env = "SYNC_INTERVAL")]
    interval: u64,

    /// Run once and exit (for CronJob mode)
    #[arg(long, default_value = "false")]
    once: bool,

    /// Dry run - don't actually update the firewall
    #[arg(long, default_value = "false")]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .json()
        .init();

    let args = Args::parse();

    info!(
        resource = %args.config.resource_name,
        table = %args.config.table_name,
        interval = args.interval,
        dry_run = args.dry_run,
        "Starting Firewall Sync Agent"
    );

    let http_client = Client::builder().timeout(Duration::from_secs(30)).build()?;
    let token_issuer = AadTokenIssuer::new(http_client.clone(), &args.config);
    let ip_source = TableIpSource::new(http_client.clone(), token_issuer.clone(), &args.config);
    let rule_store = ArmFirewallClient::new(http_client, token_issuer, &args.config);

    if args.dry_run {
        if args.once {
            run_dry(&ip_source, &rule_store).await?;
        } else {
            let mut ticker = interval(Duration::from_secs(args.interval));
            loop {
                ticker.tick().await;
                if let Err(e) = run_dry(&ip_source, &rule_store).await {
                    error!(error = %e, "Dry-run cycle failed");
                }
            }
        }
        return Ok(());
    }

    let agent = FirewallSyncAgent::new(ip_source, rule_store);

    if args.once {
        run_sync(&agent).await?;
    } else {
        let mut ticker = interval(Duration::from_secs(args.interval));
        loop {
            ticker.tick().await;
            if let Err(e) = run_sync(&agent).await {
                error!(error = %e, "Sync cycle failed");
            }
        }
    }

    Ok(())
}

/// Run a single sync cycle
async fn run_sync(agent: &FirewallSyncAgent<TableIpSource, ArmFirewallClient>) -> Result<()> {
    info!("Starting firewall sync cycle");

    let outcome = agent.sync().await?;

    match outcome.action {
        SyncAction::Updated => info!(
            ip = %outcome.ip,
            rules = outcome.rule_count,
            "Sync cycle complete - allow-list updated"
        ),
        SyncAction::Unchanged => info!(
            ip = %outcome.ip,
            "Sync cycle complete - no changes"
        ),
    }

    Ok(())
}

/// Report what a sync would do without writing
async fn run_dry(ip_source: &TableIpSource, rule_store: &ArmFirewallClient) -> Result<()> {
    let latest_ip = ip_source.latest_ip().await?;
    let current = rule_store.current_rules().await?;

    match plan_rule_update(&latest_ip, &current) {
        Some(updated) => info!(
            ip = %latest_ip,
            rules = updated.len(),
            "DRY RUN - would replace allow-list"
        ),
        None => info!(
            ip = %latest_ip,
            "DRY RUN - allow-list already contains IP"
        ),
    }

    Ok(())
}
