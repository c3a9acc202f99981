//! Identity-provider webhook.
//!
//! The provider notifies us of identity lifecycle events. Only
//! `user.created` is acted on: it pre-creates the local user row so a
//! customer who registers but never opens the shop again still shows up
//! in the admin's client count.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::{Json, body::Bytes};
use serde::{Deserialize, Serialize};

use essenza_core::Email;

use crate::db::UserRepository;
use crate::error::{AppError, Result};
use crate::services::verify_webhook_signature;
use crate::state::AppState;

/// Identity webhook envelope; payload fields vary per event type.
#[derive(Debug, Deserialize)]
struct WebhookEvent {
    #[serde(rename = "type")]
    event_type: String,
    #[serde(default)]
    data: WebhookUserData,
}

#[derive(Debug, Default, Deserialize)]
struct WebhookUserData {
    #[serde(default)]
    email_addresses: Vec<WebhookEmail>,
    first_name: Option<String>,
    username: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WebhookEmail {
    email_address: String,
}

/// Webhook acknowledgment.
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub status: &'static str,
}

/// POST /api/webhooks/identity
///
/// When `IDENTITY_WEBHOOK_SECRET` is configured, the svix-style signature
/// headers are verified before the body is parsed; without the secret the
/// payload is accepted unsigned.
///
/// # Errors
///
/// 401 for bad signatures, 400 for undecodable payloads or a
/// `user.created` event without an email address.
pub async fn identity(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookResponse>> {
    let body = std::str::from_utf8(&body)
        .map_err(|_| AppError::BadRequest("invalid payload".to_string()))?;

    if let Some(secret) = &state.config().identity.webhook_secret {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .ok_or_else(|| AppError::Unauthorized("missing signature headers".to_string()))
        };

        let msg_id = header("webhook-id")?;
        let timestamp = header("webhook-timestamp")?;
        let signature = header("webhook-signature")?;

        if !verify_webhook_signature(secret, msg_id, timestamp, body, signature) {
            return Err(AppError::Unauthorized("invalid signature".to_string()));
        }
    }

    let event: WebhookEvent = serde_json::from_str(body)
        .map_err(|_| AppError::BadRequest("invalid payload".to_string()))?;

    // Other event types are acknowledged without action.
    if event.event_type == "user.created" {
        let raw_email = event
            .data
            .email_addresses
            .first()
            .map(|entry| entry.email_address.as_str())
            .ok_or_else(|| AppError::BadRequest("no email provided".to_string()))?;
        let email = Email::parse(raw_email)
            .map_err(|e| AppError::BadRequest(format!("invalid email: {e}")))?;

        let name = event
            .data
            .first_name
            .as_deref()
            .or(event.data.username.as_deref())
            .unwrap_or("Customer");

        let created = UserRepository::new(state.pool())
            .create_if_email_absent(&email, name)
            .await?;

        match created {
            Some(user) => tracing::info!(user_id = %user.id, "user created from webhook"),
            None => tracing::debug!("webhook user already exists"),
        }
    }

    Ok(Json(WebhookResponse { status: "ok" }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_event_parses_user_created_payload() {
        let event: WebhookEvent = serde_json::from_value(serde_json::json!({
            "type": "user.created",
            "data": {
                "email_addresses": [{"email_address": "ana@example.com"}],
                "first_name": "Ana"
            }
        }))
        .unwrap();
        assert_eq!(event.event_type, "user.created");
        assert_eq!(
            event.data.email_addresses[0].email_address,
            "ana@example.com"
        );
    }

    #[test]
    fn test_event_tolerates_unknown_types_without_data() {
        let event: WebhookEvent =
            serde_json::from_value(serde_json::json!({ "type": "session.removed" })).unwrap();
        assert_eq!(event.event_type, "session.removed");
        assert!(event.data.email_addresses.is_empty());
    }
}
