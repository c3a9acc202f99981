//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                   - Liveness check
//! GET    /health/ready             - Readiness check (database)
//!
//! # Auth (identity-provider token exchange)
//! POST   /api/auth/session         - Exchange a provider token for a cookie session
//! GET    /api/auth/session         - Current user
//! DELETE /api/auth/session         - Logout
//!
//! # Catalog
//! GET    /api/products             - Active products, newest first
//!
//! # Cart
//! GET    /api/cart                 - Cart snapshot (empty for anonymous visitors)
//! POST   /api/cart                 - Overwrite cart snapshot (requires auth)
//!
//! # Orders
//! POST   /api/orders               - Checkout (requires auth)
//! GET    /api/orders               - Order history with items
//! POST   /api/orders/{id}/cancel   - Cancel a PENDING order
//!
//! # Webhooks
//! POST   /api/webhooks/identity    - Identity-provider events (user.created)
//! ```

pub mod auth;
pub mod cart;
pub mod orders;
pub mod products;
pub mod webhooks;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new().route(
        "/session",
        post(auth::create_session)
            .get(auth::current_session)
            .delete(auth::destroy_session),
    )
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new().route("/", get(products::list))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new().route("/", get(cart::show).post(cart::save))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(orders::checkout).get(orders::list))
        .route("/{id}/cancel", post(orders::cancel))
}

/// Create the webhook routes router.
pub fn webhook_routes() -> Router<AppState> {
    Router::new().route("/identity", post(webhooks::identity))
}

/// Create the combined router with all routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/auth", auth_routes())
        .nest("/api/products", product_routes())
        .nest("/api/cart", cart_routes())
        .nest("/api/orders", order_routes())
        .nest("/api/webhooks", webhook_routes())
}
