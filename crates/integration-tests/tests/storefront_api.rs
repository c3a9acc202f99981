//! Integration tests for the storefront API.
//!
//! These tests require:
//! - A running, migrated `PostgreSQL` database
//! - The storefront server running (cargo run -p essenza-storefront)
//!
//! Run with: cargo test -p essenza-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use essenza_integration_tests::{client, storefront_base_url};

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_health() {
    let base_url = storefront_base_url();
    let resp = client()
        .get(format!("{base_url}/health"))
        .send()
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.expect("body"), "ok");
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_readiness() {
    let base_url = storefront_base_url();
    let resp = client()
        .get(format!("{base_url}/health/ready"))
        .send()
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::OK);
}

// ============================================================================
// Catalog
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_products_are_public_and_shaped() {
    let base_url = storefront_base_url();
    let resp = client()
        .get(format!("{base_url}/api/products"))
        .send()
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::OK);

    let products: Value = resp.json().await.expect("json body");
    let products = products.as_array().expect("array of products");

    for product in products {
        assert!(product["id"].is_number());
        assert!(product["name"].is_string());
        // Money fields serialize as strings
        assert!(product["price"].is_string());
        assert_eq!(product["isActive"], true);
    }
}

// ============================================================================
// Anonymous access
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_anonymous_cart_is_empty() {
    let base_url = storefront_base_url();
    let resp = client()
        .get(format!("{base_url}/api/cart"))
        .send()
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("json body");
    assert_eq!(body, json!({"items": []}));
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_anonymous_orders_are_empty() {
    let base_url = storefront_base_url();
    let resp = client()
        .get(format!("{base_url}/api/orders"))
        .send()
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("json body");
    assert_eq!(body, json!([]));
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_cart_write_requires_auth() {
    let base_url = storefront_base_url();
    let resp = client()
        .post(format!("{base_url}/api/cart"))
        .json(&json!({"items": [{"productId": 1, "quantity": 1}]}))
        .send()
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_checkout_requires_auth() {
    let base_url = storefront_base_url();
    let resp = client()
        .post(format!("{base_url}/api/orders"))
        .json(&json!({
            "cartItems": [{"productId": 1, "quantity": 1}],
            "department": "Antioquia",
            "city": "Medellín",
            "addressLine1": "Calle 10 #43-12",
            "phone1": "3000000000",
            "paymentMethod": "CASH"
        }))
        .send()
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_session_endpoint_without_cookie() {
    let base_url = storefront_base_url();
    let resp = client()
        .get(format!("{base_url}/api/auth/session"))
        .send()
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_invalid_provider_token_is_rejected() {
    let base_url = storefront_base_url();
    let resp = client()
        .post(format!("{base_url}/api/auth/session"))
        .json(&json!({"token": "definitely-not-a-real-token"}))
        .send()
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Webhooks
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront server with IDENTITY_WEBHOOK_SECRET set"]
async fn test_unsigned_webhook_is_rejected() {
    let base_url = storefront_base_url();
    let resp = client()
        .post(format!("{base_url}/api/webhooks/identity"))
        .json(&json!({
            "type": "user.created",
            "data": {"email_addresses": [{"email_address": "eve@example.com"}]}
        }))
        .send()
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
