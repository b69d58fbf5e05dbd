//! Error taxonomy for the firewall sync agent.
//!
//! Every fault in the read-compare-write sequence collapses into one of
//! these variants; each delivery surface catches the error exactly once at
//! its top level and reports the Display text verbatim.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    /// The record store held no entity in the FirewallUpdate partition.
    #[error("no IP record found in table '{table}'")]
    IpRecordNotFound { table: String },

    /// The client-credentials token exchange failed. Covers invalid
    /// credentials, a revoked app, and network faults during the exchange.
    #[error("token exchange failed: {0}")]
    Authentication(String),

    /// A remote API returned a non-success status. `reason` is the
    /// remote-supplied response body text.
    #[error("remote API error {status}: {reason}")]
    RemoteApi { status: StatusCode, reason: String },

    /// Transport or decode fault outside the token exchange.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, SyncError>;
