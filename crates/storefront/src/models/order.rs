//! Order, order item, and shipping address models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use essenza_core::{AddressId, OrderId, OrderItemId, OrderStatus, PaymentMethod, ProductId, UserId};

use super::Product;

/// An order as the owning customer sees it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub status: OrderStatus,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_amount: Decimal,
    pub payment_method: PaymentMethod,
    pub note: Option<String>,
    pub shipping_address_id: Option<AddressId>,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A line item with its unit price frozen at checkout time.
///
/// The embedded product reflects the catalog as it is NOW; `price` reflects
/// the catalog as it was when the order was placed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: i32,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    pub product: Product,
}

/// An order together with its items, as returned by the tracking endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// A shipping address captured at checkout.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub id: AddressId,
    pub department: String,
    pub city: String,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub postal_code: Option<String>,
    pub phone1: String,
    pub phone2: Option<String>,
    pub notes: Option<String>,
}
