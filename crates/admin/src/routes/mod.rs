//! HTTP route handlers for the back-office.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                   - Liveness check
//! GET    /health/ready             - Readiness check (database)
//!
//! # Auth (identity-provider token exchange, admin role required)
//! POST   /api/auth/session         - Exchange a provider token for a cookie session
//! GET    /api/auth/session         - Current admin
//! DELETE /api/auth/session         - Logout
//!
//! # Stats
//! GET    /api/dashboard            - Headline numbers
//! GET    /api/sales                - Order-volume breakdown
//! GET    /api/reports              - Profit report over PAID orders
//!
//! # Catalog
//! GET    /api/products             - All products, inactive included
//! POST   /api/products             - Create a product
//! PUT    /api/products/{id}        - Partial update
//!
//! # Orders
//! GET    /api/orders               - All orders, hydrated
//! PUT    /api/orders/{id}          - Set order status
//! ```

pub mod auth;
pub mod orders;
pub mod products;
pub mod stats;

use axum::{
    Router,
    routing::{get, post, put},
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

/// Create the stats routes (dashboard, sales, reports).
pub fn stats_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(stats::dashboard))
        .route("/sales", get(stats::sales))
        .route("/reports", get(stats::reports))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::list).post(products::create))
        .route("/{id}", put(products::update))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::list))
        .route("/{id}", put(orders::update_status))
}

/// Create the combined router with all routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/auth", auth_routes())
        .nest("/api", stats_routes())
        .nest("/api/products", product_routes())
        .nest("/api/orders", order_routes())
}
