//! Agent configuration.
//!
//! All settings are resolved once at process start (flags with env
//! fallbacks) and passed into the agent by value. The agent itself never
//! reads the process environment.

use clap::Args;

/// Coordinates and credentials for one sync target.
#[derive(Args, Debug, Clone)]
pub struct SyncConfig {
    /// Table storage account holding the observed-IP records
    #[arg(long, env = "STORAGE_ACCOUNT")]
    pub storage_account: String,

    /// Logical table holding the observed-IP records
    #[arg(long, env = "TABLE_NAME")]
    pub table_name: String,

    /// Name of the protected resource whose firewall is managed
    #[arg(long, env = "RESOURCE_NAME")]
    pub resource_name: String,

    /// Subscription containing the protected resource
    #[arg(long, env = "SUBSCRIPTION_ID")]
    pub subscription_id: String,

    /// Resource group containing the protected resource
    #[arg(long, env = "RESOURCE_GROUP")]
    pub resource_group: String,

    /// ARM provider path segment of the protected resource
    #[arg(
        long,
        env = "RESOURCE_PROVIDER",
        default_value = "Microsoft.CognitiveServices/accounts"
    )]
    pub resource_provider: String,

    /// Service-principal client ID for the management API
    #[arg(long, env = "AZURE_CLIENT_ID")]
    pub client_id: String,

    /// Service-principal client secret
    #[arg(long, env = "AZURE_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: String,

    /// AAD tenant of the service principal
    #[arg(long, env = "AZURE_TENANT_ID")]
    pub tenant_id: String,
}
