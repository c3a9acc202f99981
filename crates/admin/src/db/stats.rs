//! Aggregate queries behind the dashboard, sales, and report endpoints.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use essenza_core::OrderId;

use super::RepositoryError;
use crate::models::{DashboardStats, OrderReport, ProfitReport, ReportItem, SalesStats};

#[derive(Debug, sqlx::FromRow)]
struct DashboardRow {
    active_products: i64,
    pending_orders: i64,
    total_clients: i64,
    total_sales: Decimal,
}

#[derive(Debug, sqlx::FromRow)]
struct SalesRow {
    total_revenue: Decimal,
    total_orders: i64,
    today_orders: i64,
    month_orders: i64,
    completed: i64,
    pending: i64,
    canceled: i64,
}

/// One paid order line, flattened: order fields repeat per item.
#[derive(Debug, sqlx::FromRow)]
struct ReportRow {
    order_id: i32,
    created_at: DateTime<Utc>,
    paid_at: DateTime<Utc>,
    name: String,
    quantity: i32,
    price: Decimal,
    cost_price: Decimal,
}

/// Repository for cross-table aggregate reads.
pub struct StatsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StatsRepository<'a> {
    /// Create a new stats repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Headline numbers for the admin landing page.
    ///
    /// `active_products` counts stock on hand rather than the `is_active`
    /// flag; `total_sales` sums every order regardless of status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn dashboard(&self) -> Result<DashboardStats, RepositoryError> {
        let row = sqlx::query_as::<_, DashboardRow>(
            "SELECT
                 (SELECT COUNT(*) FROM shop.products WHERE stock > 0) AS active_products,
                 (SELECT COUNT(*) FROM shop.orders WHERE status = 'PENDING') AS pending_orders,
                 (SELECT COUNT(*) FROM shop.users) AS total_clients,
                 (SELECT COALESCE(SUM(total_amount), 0) FROM shop.orders) AS total_sales",
        )
        .fetch_one(self.pool)
        .await?;

        Ok(DashboardStats {
            active_products: row.active_products,
            pending_orders: row.pending_orders,
            total_clients: row.total_clients,
            total_sales: row.total_sales,
        })
    }

    /// Order-volume breakdown for the sales page.
    ///
    /// "Today" and "this month" are the database clock's calendar
    /// boundaries, not rolling windows.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn sales(&self) -> Result<SalesStats, RepositoryError> {
        let row = sqlx::query_as::<_, SalesRow>(
            "SELECT
                 COALESCE(SUM(total_amount), 0) AS total_revenue,
                 COUNT(*) AS total_orders,
                 COUNT(*) FILTER (WHERE created_at >= date_trunc('day', now()))
                     AS today_orders,
                 COUNT(*) FILTER (WHERE created_at >= date_trunc('month', now()))
                     AS month_orders,
                 COUNT(*) FILTER (WHERE status = 'PAID') AS completed,
                 COUNT(*) FILTER (WHERE status = 'PENDING') AS pending,
                 COUNT(*) FILTER (WHERE status = 'CANCELED') AS canceled
             FROM shop.orders",
        )
        .fetch_one(self.pool)
        .await?;

        Ok(SalesStats {
            total_revenue: row.total_revenue,
            total_orders: row.total_orders,
            today_orders: row.today_orders,
            month_orders: row.month_orders,
            completed: row.completed,
            pending: row.pending,
            canceled: row.canceled,
        })
    }

    /// Per-order profit breakdown over PAID orders, newest `updated_at`
    /// first, plus grand totals.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn profit_report(&self) -> Result<ProfitReport, RepositoryError> {
        let rows = sqlx::query_as::<_, ReportRow>(
            "SELECT o.id AS order_id, o.created_at,
                    COALESCE(o.paid_at, o.updated_at) AS paid_at,
                    p.name, i.quantity, i.price, p.cost_price
             FROM shop.orders o
             JOIN shop.order_items i ON i.order_id = o.id
             JOIN shop.products p ON p.id = i.product_id
             WHERE o.status = 'PAID'
             ORDER BY o.updated_at DESC, o.id, i.id",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(build_report(rows))
    }
}

/// Fold flattened order lines into per-order breakdowns and grand totals.
///
/// Rows must arrive grouped by order (the query orders them); revenue uses
/// the checkout-time item price while cost uses the current cost price.
fn build_report(rows: Vec<ReportRow>) -> ProfitReport {
    let mut orders: Vec<OrderReport> = Vec::new();
    let mut total_revenue = Decimal::ZERO;
    let mut total_cost = Decimal::ZERO;

    for row in rows {
        let revenue = row.price * Decimal::from(row.quantity);
        let cost = row.cost_price * Decimal::from(row.quantity);
        total_revenue += revenue;
        total_cost += cost;

        let item = ReportItem {
            name: row.name,
            quantity: row.quantity,
            price: row.price,
        };

        match orders.last_mut() {
            Some(current) if current.order_id == OrderId::new(row.order_id) => {
                current.revenue += revenue;
                current.cost += cost;
                current.profit = current.revenue - current.cost;
                current.items.push(item);
            }
            _ => orders.push(OrderReport {
                order_id: OrderId::new(row.order_id),
                revenue,
                cost,
                profit: revenue - cost,
                created_at: row.created_at,
                paid_at: row.paid_at,
                items: vec![item],
            }),
        }
    }

    ProfitReport {
        total_revenue,
        total_cost,
        total_profit: total_revenue - total_cost,
        orders,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn row(order_id: i32, name: &str, quantity: i32, price: &str, cost: &str) -> ReportRow {
        ReportRow {
            order_id,
            created_at: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            paid_at: DateTime::from_timestamp(1_700_003_600, 0).unwrap(),
            name: name.to_string(),
            quantity,
            price: price.parse().unwrap(),
            cost_price: cost.parse().unwrap(),
        }
    }

    #[test]
    fn test_empty_report() {
        let report = build_report(vec![]);
        assert_eq!(report.total_revenue, Decimal::ZERO);
        assert_eq!(report.total_cost, Decimal::ZERO);
        assert_eq!(report.total_profit, Decimal::ZERO);
        assert!(report.orders.is_empty());
    }

    #[test]
    fn test_groups_consecutive_rows_by_order() {
        let rows = vec![
            row(7, "Essencial Oud", 2, "79.90", "45.50"),
            row(7, "Kaiak Aero", 1, "59.90", "30.00"),
            row(3, "Essencial Oud", 1, "79.90", "45.50"),
        ];

        let report = build_report(rows);

        assert_eq!(report.orders.len(), 2);
        assert_eq!(report.orders[0].order_id, OrderId::new(7));
        assert_eq!(report.orders[0].items.len(), 2);
        // 2 * 79.90 + 59.90
        assert_eq!(report.orders[0].revenue, "219.70".parse().unwrap());
        // 2 * 45.50 + 30.00
        assert_eq!(report.orders[0].cost, "121.00".parse().unwrap());
        assert_eq!(report.orders[0].profit, "98.70".parse().unwrap());

        assert_eq!(report.orders[1].order_id, OrderId::new(3));
        assert_eq!(report.orders[1].items.len(), 1);

        assert_eq!(report.total_revenue, "299.60".parse().unwrap());
        assert_eq!(report.total_cost, "166.50".parse().unwrap());
        assert_eq!(report.total_profit, "133.10".parse().unwrap());
    }

    #[test]
    fn test_item_price_is_checkout_price_not_cost() {
        let rows = vec![row(1, "Kaiak Aero", 3, "59.90", "30.00")];
        let report = build_report(rows);

        let item = &report.orders[0].items[0];
        assert_eq!(item.name, "Kaiak Aero");
        assert_eq!(item.quantity, 3);
        assert_eq!(item.price, "59.90".parse().unwrap());
    }
}
