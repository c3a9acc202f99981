//! Order models for the back-office listing and status updates.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use essenza_core::{
    AddressId, Email, OrderId, OrderItemId, OrderStatus, PaymentMethod, ProductId, UserId,
};

use super::Product;

/// An order row, as returned by the status-update endpoint.
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

/// The owning customer, embedded in the admin order listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderUser {
    pub id: UserId,
    pub name: String,
    pub email: Email,
}

/// A line item with its checkout-time unit price and the current product.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminOrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: i32,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    pub product: Product,
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

/// A fully hydrated order for the admin listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminOrder {
    #[serde(flatten)]
    pub order: Order,
    pub user: OrderUser,
    pub items: Vec<AdminOrderItem>,
    pub shipping_address: Option<ShippingAddress>,
}
