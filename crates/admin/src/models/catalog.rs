//! Product catalog model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use essenza_core::{Brand, Gender, ProductId};

/// A catalog product as the back-office sees it.
///
/// Unlike the storefront, admins see inactive products and the cost price.
/// Money fields serialize as strings (`"79.90"`).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub brand: Brand,
    #[serde(with = "rust_decimal::serde::str")]
    pub cost_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    pub image_url: Option<String>,
    pub gender: Option<Gender>,
    pub stock: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
