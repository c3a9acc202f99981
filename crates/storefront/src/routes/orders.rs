//! Checkout and order-tracking routes.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use essenza_core::{CartItem, OrderId, PaymentMethod};

use crate::db::{CancelError, CheckoutError, NewShippingAddress, OrderRepository};
use crate::error::{AppError, Result};
use crate::middleware::{OptionalAuth, RequireAuth};
use crate::models::OrderWithItems;
use crate::routes::auth::OkResponse;
use crate::state::AppState;

/// Checkout form payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    #[serde(default)]
    pub cart_items: Vec<CartItem>,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub postal_code: Option<String>,
    #[serde(default)]
    pub phone1: String,
    pub phone2: Option<String>,
    pub payment_method: Option<PaymentMethod>,
    pub note: Option<String>,
}

impl CheckoutRequest {
    /// Validate before touching the database.
    fn validate(&self) -> std::result::Result<PaymentMethod, AppError> {
        if self.cart_items.is_empty() {
            return Err(AppError::BadRequest("cart is empty".to_string()));
        }

        // A zero or negative quantity would sail through the stock check
        // and decrement stock in the wrong direction.
        if self.cart_items.iter().any(|item| item.quantity <= 0) {
            return Err(AppError::BadRequest(
                "item quantities must be positive".to_string(),
            ));
        }

        let required = [
            &self.department,
            &self.city,
            &self.address_line1,
            &self.phone1,
        ];
        if required.iter().any(|field| field.trim().is_empty()) {
            return Err(AppError::BadRequest("missing required fields".to_string()));
        }

        self.payment_method
            .ok_or_else(|| AppError::BadRequest("missing required fields".to_string()))
    }
}

/// Successful checkout acknowledgment.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub message: &'static str,
    pub order_id: OrderId,
}

/// POST /api/orders
///
/// The order-creation transaction. Item prices are frozen here; later
/// catalog edits never change what this order is worth.
///
/// # Errors
///
/// 401 unauthenticated, 400 for validation failures and unknown products,
/// 409 when stock cannot cover an item.
pub async fn checkout(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>> {
    let payment_method = req.validate()?;

    let address = NewShippingAddress {
        department: req.department,
        city: req.city,
        address_line1: req.address_line1,
        address_line2: req.address_line2,
        postal_code: req.postal_code,
        phone1: req.phone1,
        phone2: req.phone2,
        notes: req.note,
    };

    let order_id = OrderRepository::new(state.pool())
        .create_order(user.id, &req.cart_items, &address, payment_method)
        .await
        .map_err(|e| match e {
            CheckoutError::UnknownProduct => AppError::BadRequest(e.to_string()),
            CheckoutError::InsufficientStock { .. } => AppError::Conflict(e.to_string()),
            CheckoutError::Repository(e) => AppError::Database(e),
        })?;

    tracing::info!(user_id = %user.id, order_id = %order_id, "order created");

    Ok(Json(CheckoutResponse {
        message: "order created",
        order_id,
    }))
}

/// GET /api/orders
///
/// The caller's order history, newest first. Anonymous visitors get an
/// empty list, matching the cart endpoint.
///
/// # Errors
///
/// 500 if the query fails.
pub async fn list(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
) -> Result<Json<Vec<OrderWithItems>>> {
    let Some(user) = user else {
        return Ok(Json(Vec::new()));
    };

    let orders = OrderRepository::new(state.pool())
        .list_for_user(user.id)
        .await?;

    Ok(Json(orders))
}

/// POST /api/orders/{id}/cancel
///
/// # Errors
///
/// 401 unauthenticated, 404 for missing or foreign orders, 400 once the
/// order has left the PENDING state.
pub async fn cancel(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(order_id): Path<i32>,
) -> Result<Json<OkResponse>> {
    OrderRepository::new(state.pool())
        .cancel_for_user(OrderId::new(order_id), user.id)
        .await
        .map_err(|e| match e {
            CancelError::NotFound => AppError::NotFound(e.to_string()),
            CancelError::NotPending => AppError::BadRequest(e.to_string()),
            CancelError::Repository(e) => AppError::Database(e),
        })?;

    tracing::info!(user_id = %user.id, order_id, "order canceled");

    Ok(Json(OkResponse { ok: true }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use essenza_core::ProductId;

    fn valid_request() -> CheckoutRequest {
        CheckoutRequest {
            cart_items: vec![CartItem::new(ProductId::new(1), 2)],
            department: "Antioquia".to_string(),
            city: "Medellin".to_string(),
            address_line1: "Cra 43 #5-10".to_string(),
            address_line2: None,
            postal_code: None,
            phone1: "3001234567".to_string(),
            phone2: None,
            payment_method: Some(PaymentMethod::Cash),
            note: None,
        }
    }

    #[test]
    fn test_validate_accepts_complete_request() {
        assert_eq!(valid_request().validate().unwrap(), PaymentMethod::Cash);
    }

    #[test]
    fn test_validate_rejects_empty_cart() {
        let mut req = valid_request();
        req.cart_items.clear();
        let err = req.validate().unwrap_err();
        assert_eq!(err.to_string(), "Bad request: cart is empty");
    }

    #[test]
    fn test_validate_rejects_non_positive_quantities() {
        for quantity in [0, -5] {
            let mut req = valid_request();
            req.cart_items = vec![CartItem::new(ProductId::new(1), quantity)];
            let err = req.validate().unwrap_err();
            assert_eq!(err.to_string(), "Bad request: item quantities must be positive");
        }
    }

    #[test]
    fn test_validate_rejects_blank_required_fields() {
        for field in ["department", "city", "address_line1", "phone1"] {
            let mut req = valid_request();
            match field {
                "department" => req.department = "  ".to_string(),
                "city" => req.city = String::new(),
                "address_line1" => req.address_line1 = String::new(),
                _ => req.phone1 = String::new(),
            }
            let err = req.validate().unwrap_err();
            assert_eq!(err.to_string(), "Bad request: missing required fields");
        }
    }

    #[test]
    fn test_validate_rejects_missing_payment_method() {
        let mut req = valid_request();
        req.payment_method = None;
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_checkout_request_parses_camel_case() {
        let req: CheckoutRequest = serde_json::from_value(serde_json::json!({
            "cartItems": [{"productId": 1, "quantity": 2}],
            "department": "Antioquia",
            "city": "Medellin",
            "addressLine1": "Cra 43 #5-10",
            "phone1": "3001234567",
            "paymentMethod": "CARD"
        }))
        .unwrap();
        assert_eq!(req.payment_method, Some(PaymentMethod::Card));
        assert_eq!(req.cart_items.len(), 1);
    }
}
