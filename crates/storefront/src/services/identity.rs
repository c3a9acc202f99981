//! Identity provider client.
//!
//! The provider owns credentials and issues session tokens to the SPA; the
//! backend verifies a token here, then establishes its own cookie session.
//! Also verifies inbound webhook signatures (svix-style HMAC scheme).

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, Mac};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use sha2::Sha256;
use thiserror::Error;
use url::Url;

use crate::config::IdentityConfig;

type HmacSha256 = Hmac<Sha256>;

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

/// Verify a svix-style webhook signature.
///
/// The signed content is `{id}.{timestamp}.{body}`; the signature header
/// carries space-separated `v1,<base64>` candidates. Comparison is
/// constant-time via the MAC verifier. Secrets may carry the provider's
/// `whsec_` prefix around a base64 key; raw secrets are used as-is.
#[must_use]
pub fn verify_webhook_signature(
    secret: &SecretString,
    msg_id: &str,
    timestamp: &str,
    body: &str,
    signature_header: &str,
) -> bool {
    let raw = secret.expose_secret();
    let key = raw.strip_prefix("whsec_").map_or_else(
        || raw.as_bytes().to_vec(),
        |encoded| {
            BASE64
                .decode(encoded)
                .unwrap_or_else(|_| raw.as_bytes().to_vec())
        },
    );

    let Ok(mac) = HmacSha256::new_from_slice(&key) else {
        return false;
    };

    let signed_content = format!("{msg_id}.{timestamp}.{body}");

    signature_header
        .split_whitespace()
        .filter_map(|candidate| candidate.strip_prefix("v1,"))
        .filter_map(|encoded| BASE64.decode(encoded).ok())
        .any(|signature| {
            let mut mac = mac.clone();
            mac.update(signed_content.as_bytes());
            mac.verify_slice(&signature).is_ok()
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sign(secret: &[u8], content: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(secret).unwrap();
        mac.update(content.as_bytes());
        BASE64.encode(mac.finalize().into_bytes())
    }

    #[test]
    fn test_claims_display_name_fallback_chain() {
        let claims: SessionClaims = serde_json::from_value(serde_json::json!({
            "userId": "usr_1",
            "firstName": "Laura",
            "username": "laura90"
        }))
        .unwrap();
        assert_eq!(claims.display_name(), "Laura");

        let claims: SessionClaims = serde_json::from_value(serde_json::json!({
            "userId": "usr_2",
            "username": "laura90"
        }))
        .unwrap();
        assert_eq!(claims.display_name(), "laura90");

        let claims: SessionClaims =
            serde_json::from_value(serde_json::json!({ "userId": "usr_3" })).unwrap();
        assert_eq!(claims.display_name(), "Customer");
    }

    #[test]
    fn test_claims_is_admin_reads_public_metadata() {
        let claims: SessionClaims = serde_json::from_value(serde_json::json!({
            "userId": "usr_1",
            "publicMetadata": { "role": "admin" }
        }))
        .unwrap();
        assert!(claims.is_admin());

        let claims: SessionClaims = serde_json::from_value(serde_json::json!({
            "userId": "usr_2",
            "publicMetadata": { "role": "support" }
        }))
        .unwrap();
        assert!(!claims.is_admin());

        let claims: SessionClaims =
            serde_json::from_value(serde_json::json!({ "userId": "usr_3" })).unwrap();
        assert!(!claims.is_admin());
    }

    #[test]
    fn test_rejected_token_detection() {
        let err = IdentityError::Api {
            status: 401,
            message: "expired".to_string(),
        };
        assert!(err.is_rejected_token());

        let err = IdentityError::Api {
            status: 503,
            message: "down".to_string(),
        };
        assert!(!err.is_rejected_token());
    }

    #[test]
    fn test_webhook_signature_accepts_valid() {
        let secret = SecretString::from("wk_r4nd0m_s3cr3t_value_91");
        let body = r#"{"type":"user.created"}"#;
        let signature = sign(b"wk_r4nd0m_s3cr3t_value_91", &format!("msg_1.1700000000.{body}"));

        assert!(verify_webhook_signature(
            &secret,
            "msg_1",
            "1700000000",
            body,
            &format!("v1,{signature}"),
        ));
    }

    #[test]
    fn test_webhook_signature_checks_all_candidates() {
        let secret = SecretString::from("wk_r4nd0m_s3cr3t_value_91");
        let body = "{}";
        let good = sign(b"wk_r4nd0m_s3cr3t_value_91", &format!("msg_2.1700000001.{body}"));

        let header = format!("v1,AAAA v1,{good}");
        assert!(verify_webhook_signature(
            &secret,
            "msg_2",
            "1700000001",
            body,
            &header,
        ));
    }

    #[test]
    fn test_webhook_signature_rejects_tampered_body() {
        let secret = SecretString::from("wk_r4nd0m_s3cr3t_value_91");
        let signature = sign(
            b"wk_r4nd0m_s3cr3t_value_91",
            "msg_3.1700000002.{\"total\":10}",
        );

        assert!(!verify_webhook_signature(
            &secret,
            "msg_3",
            "1700000002",
            "{\"total\":99}",
            &format!("v1,{signature}"),
        ));
    }

    #[test]
    fn test_webhook_signature_decodes_whsec_prefixed_secret() {
        let key = b"0123456789abcdef0123456789abcdef";
        let secret = SecretString::from(format!("whsec_{}", BASE64.encode(key)));
        let body = r#"{"type":"user.created"}"#;
        let signature = sign(key, &format!("msg_4.1700000003.{body}"));

        assert!(verify_webhook_signature(
            &secret,
            "msg_4",
            "1700000003",
            body,
            &format!("v1,{signature}"),
        ));
    }
}
