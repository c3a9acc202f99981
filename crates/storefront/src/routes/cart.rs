//! Cart snapshot routes.
//!
//! The cart lives client-side; signed-in users mirror it here so it
//! follows them across devices. The server stores whatever JSON arrives
//! and normalizes on the way out, so a malformed snapshot can never break
//! the cart page.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use essenza_core::{CartItem, normalize_cart_items};

use crate::db::UserRepository;
use crate::error::Result;
use crate::middleware::{OptionalAuth, RequireAuth};
use crate::routes::auth::OkResponse;
use crate::state::AppState;

/// Cart contents response.
#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub items: Vec<CartItem>,
}

/// Request to overwrite the cart snapshot.
#[derive(Debug, Deserialize)]
pub struct SaveCartRequest {
    /// Raw items; anything malformed is silently dropped.
    pub items: Value,
}

/// GET /api/cart
///
/// Anonymous visitors get an empty cart, not an error.
///
/// # Errors
///
/// 500 if the snapshot cannot be read.
pub async fn show(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
) -> Result<Json<CartResponse>> {
    let Some(user) = user else {
        return Ok(Json(CartResponse { items: Vec::new() }));
    };

    let snapshot = UserRepository::new(state.pool()).get_cart(user.id).await?;

    Ok(Json(CartResponse {
        items: normalize_cart_items(&snapshot),
    }))
}

/// POST /api/cart
///
/// Overwrites the stored snapshot. Saving an empty cart is valid.
///
/// # Errors
///
/// 401 when not logged in; 500 if the write fails.
pub async fn save(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<SaveCartRequest>,
) -> Result<Json<OkResponse>> {
    let items = normalize_cart_items(&req.items);
    UserRepository::new(state.pool())
        .set_cart(user.id, &items)
        .await?;

    Ok(Json(OkResponse { ok: true }))
}
