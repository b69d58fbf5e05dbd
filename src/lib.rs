//! Firewall Sync Agent Library
//!
//! Read-compare-write synchronization between an observed-IP record store
//! and an Azure resource's firewall allow-list.

pub mod agents;
pub mod config;
pub mod error;

pub use agents::firewall_sync;
pub use config::SyncConfig;
pub use error::{Result, SyncError};
