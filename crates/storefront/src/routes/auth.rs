//! Session routes: identity-provider token exchange.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use essenza_core::{Email, UserRole};

use crate::db::UserRepository;
use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{OptionalAuth, clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::state::AppState;

/// Request to exchange a provider session token for a cookie session.
#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    /// Session token issued to the SPA by the identity provider.
    pub token: String,
}

/// The logged-in user, as returned by every session endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub id: essenza_core::UserId,
    pub email: Email,
    pub name: String,
    pub role: UserRole,
}

impl From<CurrentUser> for SessionResponse {
    fn from(user: CurrentUser) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
        }
    }
}

/// POST /api/auth/session
///
/// Verify the token with the identity provider, get-or-create the local
/// user mirror, and store the identity in the cookie session.
///
/// # Errors
///
/// 401 for rejected tokens; 502 when the provider itself fails.
pub async fn create_session(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<CreateSessionRequest>,
) -> Result<Json<SessionResponse>> {
    let claims = state.identity().verify_session(&req.token).await?;

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

    let current = CurrentUser {
        id: user.id,
        email: user.email,
        name: user.name,
        role: user.role,
    };

    set_current_user(&session, &current)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;
    set_sentry_user(&current.id, Some(current.email.as_str()));

    tracing::info!(user_id = %current.id, "session established");

    Ok(Json(SessionResponse::from(current)))
}

/// GET /api/auth/session
///
/// # Errors
///
/// 401 when no session is established.
pub async fn current_session(
    OptionalAuth(user): OptionalAuth,
) -> Result<Json<SessionResponse>> {
    user.map(|u| Json(SessionResponse::from(u)))
        .ok_or_else(|| AppError::Unauthorized("not authenticated".to_string()))
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
    clear_current_user(&session)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;
    clear_sentry_user();

    Ok(Json(OkResponse { ok: true }))
}
