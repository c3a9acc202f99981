//! Session-related types.

use serde::{Deserialize, Serialize};

use essenza_core::{Email, UserId};

/// Session-stored admin identity.
///
/// The admin check happens once at session creation; holders of this value
/// are trusted for the session's lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentAdmin {
    /// Admin's database ID.
    pub id: UserId,
    /// Admin's email address.
    pub email: Email,
    /// Display name.
    pub name: String,
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current logged-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";
}
