//! User model.
//!
//! Users mirror identities owned by the external identity provider. The
//! local row exists so orders and the cart snapshot have something to hang
//! off; `external_id` links back to the provider's subject.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use essenza_core::{Email, UserId, UserRole};

/// A shop user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Database ID.
    pub id: UserId,
    /// Identity-provider subject; `None` for rows created from a guest
    /// email before the customer ever signed in.
    pub external_id: Option<String>,
    /// Email address (unique).
    pub email: Email,
    /// Display name.
    pub name: String,
    /// Role mirrored from the identity provider at login.
    pub role: UserRole,
    /// Raw cart snapshot (untrusted JSON, normalized on read).
    #[serde(skip)]
    pub cart: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
