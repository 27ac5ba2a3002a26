//! Access tokens for the Firestore REST API
//!
//! On Google Cloud runtimes tokens come from the metadata server and live
//! about an hour. They are cached and fetched again once they are within
//! [`REFRESH_MARGIN_SECS`] of expiry, so a long-running server keeps writing
//! after its first token lapses.

use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Mutex;

use mp_core::errors::StoreError;
use mp_shared::config::{FirestoreAuth, Secret};

use crate::InfrastructureError;

/// Refresh this long before the reported expiry
pub const REFRESH_MARGIN_SECS: i64 = 60;

#[derive(Debug, Clone)]
struct CachedToken {
    value: Secret,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(REFRESH_MARGIN_SECS) < self.expires_at
    }
}

#[derive(Debug, Deserialize)]
struct MetadataTokenResponse {
    access_token: String,
    expires_in: i64,
}

/// Parse a metadata server token response received at `now`
fn parse_token_response(body: &str, now: DateTime<Utc>) -> Result<CachedToken, StoreError> {
    let response: MetadataTokenResponse = serde_json::from_str(body)?;
    Ok(CachedToken {
        value: Secret::new(response.access_token),
        expires_at: now + Duration::seconds(response.expires_in),
    })
}

/// Bearer token provider for Firestore requests
pub enum TokenSource {
    Static(Secret),
    Metadata {
        client: Client,
        token_url: String,
        /// Held across the refresh so concurrent callers share one fetch
        cached: Mutex<Option<CachedToken>>,
    },
}

impl std::fmt::Debug for TokenSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenSource::Static(_) => f.write_str("TokenSource::Static"),
            TokenSource::Metadata { token_url, .. } => write!(f, "TokenSource::Metadata({})", token_url),
        }
    }
}

impl TokenSource {
    pub fn from_config(auth: &FirestoreAuth, client: Client) -> Result<Self, InfrastructureError> {
        match auth {
            FirestoreAuth::Static { token } => Ok(TokenSource::Static(token.resolve()?)),
            FirestoreAuth::Metadata { token_url } => Ok(TokenSource::Metadata {
                client,
                token_url: token_url.clone(),
                cached: Mutex::new(None),
            }),
        }
    }

    /// Current bearer token, fetching a new one when the cached one is stale
    pub async fn bearer(&self) -> Result<Secret, StoreError> {
        let (client, token_url, cached) = match self {
            TokenSource::Static(token) => return Ok(token.clone()),
            TokenSource::Metadata {
                client,
                token_url,
                cached,
            } => (client, token_url, cached),
        };

        let mut cached = cached.lock().await;
        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh(Utc::now())) {
            return Ok(token.value.clone());
        }

        let requested_at = Utc::now();
        let response = client
            .get(token_url.as_str())
            .header("Metadata-Flavor", "Google")
            .send()
            .await
            .map_err(|e| StoreError::Backend(format!("Metadata server unreachable: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Backend(format!("Metadata server returned {}", status)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| StoreError::Backend(format!("Metadata server response: {}", e)))?;
        let token = parse_token_response(&body, requested_at)?;

        tracing::debug!(expires_at = %token.expires_at, event = "firestore_token_refreshed", "Fetched Firestore access token");

        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }
}
