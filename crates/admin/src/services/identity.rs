//! Identity provider client.
//!
//! Same provider as the storefront; the back-office additionally checks the
//! admin role carried in the verified claims' public metadata before it
//! opens a session. Webhooks are handled by the storefront only.

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::config::IdentityConfig;

/// Errors that can occur when talking to the identity provider.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl IdentityError {
    /// Whether this error means the caller's token was rejected, as
    /// opposed to the provider itself failing.
    #[must_use]
    pub const fn is_rejected_token(&self) -> bool {
        matches!(self, Self::Api { status, .. } if *status >= 400 && *status < 500)
    }
}

/// Verified claims for a session token.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionClaims {
    /// The provider's subject for this identity.
    #[serde(rename = "userId")]
    pub external_id: String,
    /// Email address, when the identity carries one.
    pub email: Option<String>,
    /// Given name, when set on the profile.
    pub first_name: Option<String>,
    /// Username, when set on the profile.
    pub username: Option<String>,
    /// Public metadata attached to the identity by the back office.
    #[serde(default)]
    public_metadata: PublicMetadata,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct PublicMetadata {
    role: Option<String>,
}

impl SessionClaims {
    /// Whether the identity carries the admin role in its public metadata.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.public_metadata.role.as_deref() == Some("admin")
    }

    /// Display name for the local user row: given name, else username,
    /// else a generic fallback.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.first_name
            .as_deref()
            .or(self.username.as_deref())
            .unwrap_or("Customer")
    }
}

/// Identity provider API client.
#[derive(Clone)]
pub struct IdentityClient {
    client: reqwest::Client,
    api_url: Url,
}

impl IdentityClient {
    /// Create a new identity client with the API key as a default header.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &IdentityConfig) -> Result<Self, IdentityError> {
        let mut headers = HeaderMap::new();

        let auth_value = format!("Bearer {}", config.api_key.expose_secret());
        let mut auth_header = HeaderValue::from_str(&auth_value)
            .map_err(|e| IdentityError::Parse(format!("invalid API key format: {e}")))?;
        auth_header.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_header);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
        })
    }

    /// Verify a session token and return its claims.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::Api` for non-2xx responses (a 4xx means the
    /// token was rejected), `Http` for transport failures, and `Parse` for
    /// undecodable bodies.
    pub async fn verify_session(&self, token: &str) -> Result<SessionClaims, IdentityError> {
        let url = self
            .api_url
            .join("v1/sessions/verify")
            .map_err(|e| IdentityError::Parse(format!("invalid API URL: {e}")))?;

        let response = self
            .client
            .post(url)
            .json(&serde_json::json!({ "token": token }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(IdentityError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| IdentityError::Parse(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_admin_role_from_public_metadata() {
        let claims: SessionClaims = serde_json::from_value(serde_json::json!({
            "userId": "user_2x9",
            "email": "boss@essenza.shop",
            "firstName": "Dana",
            "publicMetadata": { "role": "admin" }
        }))
        .unwrap();

        assert!(claims.is_admin());
        assert_eq!(claims.display_name(), "Dana");
    }

    #[test]
    fn test_claims_without_metadata_are_not_admin() {
        let claims: SessionClaims = serde_json::from_value(serde_json::json!({
            "userId": "user_2x9"
        }))
        .unwrap();

        assert!(!claims.is_admin());
        assert_eq!(claims.display_name(), "Customer");
    }

    #[test]
    fn test_claims_other_role_is_not_admin() {
        let claims: SessionClaims = serde_json::from_value(serde_json::json!({
            "userId": "user_2x9",
            "publicMetadata": { "role": "support" }
        }))
        .unwrap();

        assert!(!claims.is_admin());
    }
}
