//! Order management routes.

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::Value;

use essenza_core::{OrderId, OrderStatus};

use crate::db::{OrderRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::{AdminOrder, Order};
use crate::state::AppState;

/// GET /api/orders
///
/// Every order, newest first, with the owning user, its items, and the
/// shipping address.
///
/// # Errors
///
/// 500 on database failure.
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<AdminOrder>>> {
    let orders = OrderRepository::new(state.pool()).list_all().await?;
    Ok(Json(orders))
}

/// PUT /api/orders/{id}
///
/// Set an order's status. Any transition is allowed; moving into PAID
/// stamps `paid_at` when it was not already set.
///
/// The body is inspected by hand so a missing `status` key reads as a 400
/// while an unknown status value reads as a 422.
///
/// # Errors
///
/// 400 for a missing status, 404 for a missing order, 422 for an unknown
/// status value.
pub async fn update_status(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<Value>,
) -> Result<Json<Order>> {
    let status = match body.get("status") {
        None | Some(Value::Null) => {
            return Err(AppError::BadRequest("missing status".to_string()));
        }
        Some(value) => serde_json::from_value::<OrderStatus>(value.clone())
            .map_err(|_| AppError::Unprocessable("unknown status".to_string()))?,
    };

    let order = OrderRepository::new(state.pool())
        .update_status(OrderId::new(id), status)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("order not found".to_string()),
            other => AppError::Database(other),
        })?;

    tracing::info!(order_id = %order.id, status = %order.status, "order status updated");

    Ok(Json(order))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_status_values_parse_as_screaming_snake() {
        let status: OrderStatus = serde_json::from_value(serde_json::json!("SHIPPED")).unwrap();
        assert_eq!(status, OrderStatus::Shipped);
    }

    #[test]
    fn test_unknown_status_value_is_rejected() {
        let result = serde_json::from_value::<OrderStatus>(serde_json::json!("REFUNDED"));
        assert!(result.is_err());
    }
}
