//! Aggregate stats returned by the dashboard, sales, and report endpoints.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use essenza_core::OrderId;

/// Headline numbers for the admin landing page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Products with stock on hand. Counts `stock > 0`, not `is_active`.
    pub active_products: i64,
    pub pending_orders: i64,
    pub total_clients: i64,
    /// Sum of `total_amount` over every order regardless of status.
    #[serde(with = "rust_decimal::serde::str")]
    pub total_sales: Decimal,
}

/// Order-volume breakdown for the sales page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesStats {
    #[serde(with = "rust_decimal::serde::str")]
    pub total_revenue: Decimal,
    pub total_orders: i64,
    pub today_orders: i64,
    pub month_orders: i64,
    /// Orders in `PAID` status.
    pub completed: i64,
    pub pending: i64,
    pub canceled: i64,
}

/// One line of a per-order profit breakdown.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReportItem {
    pub name: String,
    pub quantity: i32,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
}

/// Profit breakdown for a single paid order.
///
/// `cost` uses the product's CURRENT cost price; unlike the sale price it
/// is not snapshotted at checkout, so historical reports shift when cost
/// prices are edited.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OrderReport {
    pub order_id: OrderId,
    #[serde(with = "rust_decimal::serde::str")]
    pub revenue: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub cost: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub profit: Decimal,
    pub created_at: DateTime<Utc>,
    /// Falls back to `updated_at` for orders paid before `paid_at` existed.
    pub paid_at: DateTime<Utc>,
    pub items: Vec<ReportItem>,
}

/// The full profit report: grand totals plus per-order breakdowns.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfitReport {
    #[serde(with = "rust_decimal::serde::str")]
    pub total_revenue: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_cost: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_profit: Decimal,
    pub orders: Vec<OrderReport>,
}
