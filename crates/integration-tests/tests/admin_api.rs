//! Integration tests for the admin API.
//!
//! These tests require:
//! - A running, migrated `PostgreSQL` database
//! - The admin server running (cargo run -p essenza-admin)
//!
//! Run with: cargo test -p essenza-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::json;
use uuid::Uuid;

use essenza_integration_tests::{admin_base_url, client};

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_health() {
    let base_url = admin_base_url();
    let resp = client()
        .get(format!("{base_url}/health"))
        .send()
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::OK);
}

// ============================================================================
// Everything behind the session
// ============================================================================

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_stats_endpoints_require_auth() {
    let base_url = admin_base_url();
    let http = client();

    for path in ["/api/dashboard", "/api/sales", "/api/reports"] {
        let resp = http
            .get(format!("{base_url}{path}"))
            .send()
            .await
            .expect("request failed");

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{path}");
    }
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_catalog_writes_require_auth() {
    let base_url = admin_base_url();
    let http = client();

    let resp = http
        .get(format!("{base_url}/api/products"))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = http
        .post(format!("{base_url}/api/products"))
        .json(&json!({
            "name": format!("test-{}", Uuid::new_v4()),
            "brand": "NATURA",
            "price": "10.00"
        }))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_order_updates_require_auth() {
    let base_url = admin_base_url();
    let resp = client()
        .put(format!("{base_url}/api/orders/1"))
        .json(&json!({"status": "PAID"}))
        .send()
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Auth
// ============================================================================

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_invalid_provider_token_is_rejected() {
    let base_url = admin_base_url();
    let resp = client()
        .post(format!("{base_url}/api/auth/session"))
        .json(&json!({"token": "definitely-not-a-real-token"}))
        .send()
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
