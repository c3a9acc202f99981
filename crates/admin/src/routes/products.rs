//! Catalog management routes.

use axum::{
    Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;
use serde::Deserialize;

use essenza_core::{Brand, Gender, ProductId};

use crate::db::{NewProduct, ProductPatch, ProductRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::Product;
use crate::state::AppState;

/// Request body for creating a product.
///
/// Money fields accept either JSON numbers or strings. Typed enum fields
/// reject unknown values with a 422 at deserialization time.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub brand: Brand,
    pub cost_price: Option<Decimal>,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub gender: Option<Gender>,
    pub stock: Option<i32>,
}

/// Request body for a partial product update. Absent fields keep their
/// current value; `id`, `createdAt`, and `updatedAt` are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub brand: Option<Brand>,
    pub cost_price: Option<Decimal>,
    pub price: Option<Decimal>,
    pub image_url: Option<String>,
    pub gender: Option<Gender>,
    pub stock: Option<i32>,
    pub is_active: Option<bool>,
}

/// GET /api/products
///
/// Every product, inactive ones included, newest first.
///
/// # Errors
///
/// 500 on database failure.
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>> {
    let products = ProductRepository::new(state.pool()).list_all().await?;
    Ok(Json(products))
}

/// POST /api/products
///
/// # Errors
///
/// 422 for malformed bodies; 500 on database failure.
pub async fn create(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(req): Json<CreateProductRequest>,
) -> Result<Json<Product>> {
    let product = ProductRepository::new(state.pool())
        .create(&NewProduct {
            name: req.name,
            description: req.description,
            brand: req.brand,
            cost_price: req.cost_price.unwrap_or(Decimal::ZERO),
            price: req.price,
            image_url: req.image_url,
            gender: req.gender,
            stock: req.stock.unwrap_or(0),
        })
        .await?;

    tracing::info!(product_id = %product.id, "product created");

    Ok(Json(product))
}

/// PUT /api/products/{id}
///
/// # Errors
///
/// 404 when the product doesn't exist; 422 for malformed bodies.
pub async fn update(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<UpdateProductRequest>,
) -> Result<Json<Product>> {
    let patch = ProductPatch {
        name: req.name,
        description: req.description,
        brand: req.brand,
        cost_price: req.cost_price,
        price: req.price,
        image_url: req.image_url,
        gender: req.gender,
        stock: req.stock,
        is_active: req.is_active,
    };

    let product = ProductRepository::new(state.pool())
        .update(ProductId::new(id), &patch)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("product not found".to_string()),
            other => AppError::Database(other),
        })?;

    Ok(Json(product))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_accepts_string_and_number_money() {
        let req: CreateProductRequest = serde_json::from_value(serde_json::json!({
            "name": "Essencial Oud",
            "brand": "NATURA",
            "costPrice": "45.50",
            "price": 79.90
        }))
        .unwrap();

        assert_eq!(req.cost_price.unwrap(), "45.50".parse().unwrap());
        assert_eq!(req.price, "79.9".parse().unwrap());
        assert_eq!(req.description, "");
        assert!(req.stock.is_none());
    }

    #[test]
    fn test_create_request_rejects_unknown_brand() {
        let result = serde_json::from_value::<CreateProductRequest>(serde_json::json!({
            "name": "Essencial Oud",
            "brand": "ACME",
            "price": "79.90"
        }));

        assert!(result.is_err());
    }

    #[test]
    fn test_update_request_ignores_read_only_fields() {
        let req: UpdateProductRequest = serde_json::from_value(serde_json::json!({
            "id": 99,
            "createdAt": "2026-01-01T00:00:00Z",
            "isActive": false
        }))
        .unwrap();

        assert_eq!(req.is_active, Some(false));
        assert!(req.name.is_none());
    }
}
