//! Firewall Sync Service
//!
//! HTTP trigger surface for the firewall sync agent. A hosting platform
//! (scheduler, webhook, manual curl) POSTs to `/api/firewall-sync` with the
//! configured function key; the handler runs one read-compare-write pass
//! and answers with a plain-text status line.

use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use firewall_sync_agent::firewall_sync::{AzureFirewallSync, SyncAction};
use firewall_sync_agent::SyncConfig;

const FUNCTION_KEY_HEADER: &str = "x-functions-key";

#[derive(Parser, Debug)]
#[command(name = "firewall-sync-service", version, about)]
struct Cli {
    #[command(flatten)]
    config: SyncConfig,

    /// Invocation key required on every trigger request
    #[arg(long, env = "FUNCTION_KEY", hide_env_values = true)]
    function_key: String,

    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0:8080", env = "LISTEN_ADDR")]
    listen_addr: String,
}

#[derive(Clone)]
struct AppState {
    agent: Arc<AzureFirewallSync>,
    function_key: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .json()
        .init();

    let cli = Cli::parse();

    info!(
        resource = %cli.config.resource_name,
        table = %cli.config.table_name,
        "Starting Firewall Sync Service"
    );

    let agent = AzureFirewallSync::from_config(&cli.config)?;

    let state = AppState {
        agent: Arc::new(agent),
        function_key: cli.function_key,
    };

    let app = Router::new()
        .route("/health", get(health_check))
        .route("/api/firewall-sync", post(trigger_sync))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr: SocketAddr = cli
        .listen_addr
        .parse()
        .context("Invalid listen address")?;
    info!("Service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "firewall-sync",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn trigger_sync(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if !key_matches(&headers, &state.function_key) {
        return (StatusCode::UNAUTHORIZED, "invalid or missing function key").into_response();
    }

    let invocation_id = uuid::Uuid::new_v4();
    info!(%invocation_id, "Firewall sync triggered");

    match state.agent.sync().await {
        Ok(outcome) => {
            let message = match outcome.action {
                SyncAction::Updated => format!(
                    "Firewall updated: added {} ({} rules total)",
                    outcome.ip, outcome.rule_count
                ),
                SyncAction::Unchanged => {
                    format!("No changes: {} already allowed", outcome.ip)
                }
            };
            info!(%invocation_id, action = ?outcome.action, "Firewall sync complete");
            (StatusCode::OK, message).into_response()
        }
        Err(e) => {
            error!(%invocation_id, error = %e, "Firewall sync failed");
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
    }
}

fn key_matches(headers: &HeaderMap, expected: &str) -> bool {
    headers
        .get(FUNCTION_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(|supplied| supplied == expected)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_matches() {
        let mut headers = HeaderMap::new();
        headers.insert(FUNCTION_KEY_HEADER, "sekrit".parse().unwrap());

        assert!(key_matches(&headers, "sekrit"));
        assert!(!key_matches(&headers, "other"));
        assert!(!key_matches(&HeaderMap::new(), "sekrit"));
    }
}
