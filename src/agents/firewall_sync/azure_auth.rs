//! Azure AD Token Issuer
//!
//! Non-interactive client-credentials exchange against the AAD token
//! endpoint. Tokens are requested fresh for every downstream call - there is
//! no caching or expiry tracking, so a token can never outlive the single
//! request it authorizes.

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::SyncConfig;
use crate::error::{Result, SyncError};

const AUTHORITY_BASE: &str = "https://login.microsoftonline.com";

/// Scope for the Azure management API audience.
pub const MANAGEMENT_SCOPE: &str = "https://management.azure.com/.default";

/// Scope for the storage service audience (table reads).
pub const STORAGE_SCOPE: &str = "https://storage.azure.com/.default";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Issues bearer tokens for a fixed service principal.
#[derive(Clone)]
pub struct AadTokenIssuer {
    http_client: Client,
    tenant_id: String,
    client_id: String,
    client_secret: String,
}

impl AadTokenIssuer {
    pub fn new(http_client: Client, config: &SyncConfig) -> Self {
        Self {
            http_client,
            tenant_id: config.tenant_id.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
        }
    }

    fn token_url(&self) -> String {
        format!("{}/{}/oauth2/v2.0/token", AUTHORITY_BASE, self.tenant_id)
    }

    /// Exchange the client credentials for a bearer token scoped to
    /// `scope`. Any failure in the exchange - bad credentials, revoked app,
    /// network fault - surfaces as an authentication error.
    pub async fn issue(&self, scope: &str) -> Result<String> {
        debug!(scope = %scope, "Requesting bearer token");

        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("scope", scope),
        ];

        let response = self
            .http_client
            .post(self.token_url())
            .form(&params)
            .send()
            .await
            .map_err(|e| SyncError::Authentication(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(SyncError::Authentication(format!("{status}: {text}")));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| SyncError::Authentication(e.to_string()))?;

        Ok(token.access_token)
    }
}
