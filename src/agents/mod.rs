//! Agent modules
//!
//! - `firewall_sync`: keeps a resource's firewall allow-list in sync with a
//!   dynamic public IP

pub mod firewall_sync;

pub use firewall_sync::FirewallSyncAgent;
