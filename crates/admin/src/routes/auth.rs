//! Session routes: identity-provider token exchange, gated on the admin role.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use essenza_core::{Email, UserId, UserRole};

use crate::db::UserRepository;
use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{RequireAdmin, clear_current_admin, set_current_admin};
use crate::models::CurrentAdmin;
use crate::state::AppState;

/// Request to exchange a provider session token for a cookie session.
#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    /// Session token issued to the SPA by the identity provider.
    pub token: String,
}

/// The logged-in admin, as returned by every session endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub id: UserId,
    pub email: Email,
    pub name: String,
}

impl From<CurrentAdmin> for SessionResponse {
    fn from(admin: CurrentAdmin) -> Self {
        Self {
            id: admin.id,
            email: admin.email,
            name: admin.name,
        }
    }
}

/// POST /api/auth/session
///
/// Verify the token, reject identities without the admin role, mirror the
/// role onto the local user row, and store the identity in the session.
///
/// # Errors
///
/// 401 for rejected tokens, 403 when the identity is not an admin, 502
/// when the provider itself fails.
pub async fn create_session(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<CreateSessionRequest>,
) -> Result<Json<SessionResponse>> {
    let claims = state.identity().verify_session(&req.token).await?;

    if !claims.is_admin() {
        return Err(AppError::Forbidden("admin access required".to_string()));
    }

    let email = claims
        .email
        .as_deref()
        .ok_or_else(|| AppError::BadRequest("identity has no email".to_string()))
        .and_then(|raw| {
            Email::parse(raw).map_err(|e| AppError::BadRequest(format!("invalid email: {e}")))
        })?;

    let users = UserRepository::new(state.pool());
    let user = users
        .get_or_create(&claims.external_id, &email, claims.display_name())
        .await?;

    // Keep the local role in sync with what the provider just attested.
    if user.role != UserRole::Admin {
        users.set_role(user.id, UserRole::Admin).await?;
    }

    let current = CurrentAdmin {
        id: user.id,
        email: user.email,
        name: user.name,
    };

    set_current_admin(&session, &current)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;
    set_sentry_user(&current.id, Some(current.email.as_str()));

    tracing::info!(user_id = %current.id, "admin session established");

    Ok(Json(SessionResponse::from(current)))
}

/// GET /api/auth/session
///
/// # Errors
///
/// 401 when no admin session is established.
pub async fn current_session(
    RequireAdmin(admin): RequireAdmin,
) -> Result<Json<SessionResponse>> {
    Ok(Json(SessionResponse::from(admin)))
}

/// Generic `{"ok": true}` acknowledgment.
#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

/// DELETE /api/auth/session
///
/// # Errors
///
/// 500 if the session store fails.
pub async fn destroy_session(session: Session) -> Result<Json<OkResponse>> {
    clear_current_admin(&session)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;
    clear_sentry_user();

    Ok(Json(OkResponse { ok: true }))
}
