//! Order repository: the admin listing and status updates.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use essenza_core::{
    AddressId, Email, OrderId, OrderItemId, OrderStatus, PaymentMethod, ProductId, UserId,
};

use super::RepositoryError;
use super::products::ProductRow;
use crate::models::{AdminOrder, AdminOrderItem, Order, OrderUser, Product, ShippingAddress};

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i32,
    user_id: i32,
    status: OrderStatus,
    total_amount: Decimal,
    payment_method: PaymentMethod,
    note: Option<String>,
    shipping_address_id: Option<i32>,
    paid_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            id: OrderId::new(row.id),
            user_id: UserId::new(row.user_id),
            status: row.status,
            total_amount: row.total_amount,
            payment_method: row.payment_method,
            note: row.note,
            shipping_address_id: row.shipping_address_id.map(AddressId::new),
            paid_at: row.paid_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const ORDER_COLUMNS: &str = "id, user_id, status, total_amount, payment_method, note, \
     shipping_address_id, paid_at, created_at, updated_at";

/// An order joined with its user (`u_*`) and, when present, its shipping
/// address (`a_*`).
#[derive(Debug, sqlx::FromRow)]
struct AdminOrderRow {
    id: i32,
    user_id: i32,
    status: OrderStatus,
    total_amount: Decimal,
    payment_method: PaymentMethod,
    note: Option<String>,
    shipping_address_id: Option<i32>,
    paid_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    u_name: String,
    u_email: String,
    a_id: Option<i32>,
    a_department: Option<String>,
    a_city: Option<String>,
    a_address_line1: Option<String>,
    a_address_line2: Option<String>,
    a_postal_code: Option<String>,
    a_phone1: Option<String>,
    a_phone2: Option<String>,
    a_notes: Option<String>,
}

const ADMIN_ORDER_COLUMNS: &str = "o.id, o.user_id, o.status, o.total_amount, \
     o.payment_method, o.note, o.shipping_address_id, o.paid_at, o.created_at, o.updated_at, \
     u.name AS u_name, u.email AS u_email, \
     a.id AS a_id, a.department AS a_department, a.city AS a_city, \
     a.address_line1 AS a_address_line1, a.address_line2 AS a_address_line2, \
     a.postal_code AS a_postal_code, a.phone1 AS a_phone1, a.phone2 AS a_phone2, \
     a.notes AS a_notes";

impl TryFrom<AdminOrderRow> for AdminOrder {
    type Error = RepositoryError;

    fn try_from(row: AdminOrderRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.u_email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        let shipping_address = match (
            row.a_id,
            row.a_department,
            row.a_city,
            row.a_address_line1,
            row.a_phone1,
        ) {
            (Some(id), Some(department), Some(city), Some(address_line1), Some(phone1)) => {
                Some(ShippingAddress {
                    id: AddressId::new(id),
                    department,
                    city,
                    address_line1,
                    address_line2: row.a_address_line2,
                    postal_code: row.a_postal_code,
                    phone1,
                    phone2: row.a_phone2,
                    notes: row.a_notes,
                })
            }
            _ => None,
        };

        Ok(Self {
            order: Order {
                id: OrderId::new(row.id),
                user_id: UserId::new(row.user_id),
                status: row.status,
                total_amount: row.total_amount,
                payment_method: row.payment_method,
                note: row.note,
                shipping_address_id: row.shipping_address_id.map(AddressId::new),
                paid_at: row.paid_at,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            user: OrderUser {
                id: UserId::new(row.user_id),
                name: row.u_name,
                email,
            },
            items: Vec::new(),
            shipping_address,
        })
    }
}

/// Order items joined with their product, product columns aliased `p_*`.
#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    id: i32,
    order_id: i32,
    product_id: i32,
    quantity: i32,
    price: Decimal,
    p_id: i32,
    p_name: String,
    p_description: String,
    p_brand: essenza_core::Brand,
    p_cost_price: Decimal,
    p_price: Decimal,
    p_image_url: Option<String>,
    p_gender: Option<essenza_core::Gender>,
    p_stock: i32,
    p_is_active: bool,
    p_created_at: DateTime<Utc>,
    p_updated_at: DateTime<Utc>,
}

impl From<OrderItemRow> for AdminOrderItem {
    fn from(row: OrderItemRow) -> Self {
        Self {
            id: OrderItemId::new(row.id),
            order_id: OrderId::new(row.order_id),
            product_id: ProductId::new(row.product_id),
            quantity: row.quantity,
            price: row.price,
            product: Product::from(ProductRow {
                id: row.p_id,
                name: row.p_name,
                description: row.p_description,
                brand: row.p_brand,
                cost_price: row.p_cost_price,
                price: row.p_price,
                image_url: row.p_image_url,
                gender: row.p_gender,
                stock: row.p_stock,
                is_active: row.p_is_active,
                created_at: row.p_created_at,
                updated_at: row.p_updated_at,
            }),
        }
    }
}

const ITEM_JOIN_COLUMNS: &str = "i.id, i.order_id, i.product_id, i.quantity, i.price, \
     p.id AS p_id, p.name AS p_name, p.description AS p_description, p.brand AS p_brand, \
     p.cost_price AS p_cost_price, p.price AS p_price, p.image_url AS p_image_url, \
     p.gender AS p_gender, p.stock AS p_stock, p.is_active AS p_is_active, \
     p.created_at AS p_created_at, p.updated_at AS p_updated_at";

/// Repository for order operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every order, newest first, hydrated with the owning user, the
    /// shipping address, and the items with their current product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails, or
    /// `RepositoryError::DataCorruption` for an invalid stored email.
    pub async fn list_all(&self) -> Result<Vec<AdminOrder>, RepositoryError> {
        let order_rows = sqlx::query_as::<_, AdminOrderRow>(&format!(
            "SELECT {ADMIN_ORDER_COLUMNS}
             FROM shop.orders o
             JOIN shop.users u ON u.id = o.user_id
             LEFT JOIN shop.shipping_addresses a ON a.id = o.shipping_address_id
             ORDER BY o.created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        let item_rows = sqlx::query_as::<_, OrderItemRow>(&format!(
            "SELECT {ITEM_JOIN_COLUMNS}
             FROM shop.order_items i
             JOIN shop.products p ON p.id = i.product_id
             ORDER BY i.id"
        ))
        .fetch_all(self.pool)
        .await?;

        let mut items_by_order: HashMap<i32, Vec<AdminOrderItem>> = HashMap::new();
        for row in item_rows {
            items_by_order
                .entry(row.order_id)
                .or_default()
                .push(AdminOrderItem::from(row));
        }

        order_rows
            .into_iter()
            .map(|row| {
                let order_id = row.id;
                let mut order = AdminOrder::try_from(row)?;
                order.items = items_by_order.remove(&order_id).unwrap_or_default();
                Ok(order)
            })
            .collect()
    }

    /// Set an order's status and return the updated order.
    ///
    /// Any status-to-status transition is allowed. Transitioning into PAID
    /// stamps `paid_at` when it was not already set; leaving PAID keeps it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    pub async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "UPDATE shop.orders SET
                 status = $2,
                 paid_at = CASE
                     WHEN $2 = 'PAID'::shop.order_status AND paid_at IS NULL THEN now()
                     ELSE paid_at
                 END
             WHERE id = $1
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(id.as_i32())
        .bind(status)
        .fetch_optional(self.pool)
        .await?;

        row.map(Order::from).ok_or(RepositoryError::NotFound)
    }
}
