//! Order repository: the checkout transaction, order tracking, and
//! customer cancellation.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use thiserror::Error;

use essenza_core::{
    AddressId, CartItem, OrderId, OrderItemId, OrderStatus, PaymentMethod, ProductId, UserId,
};

use super::RepositoryError;
use super::products::{PRODUCT_COLUMNS, ProductRow};
use crate::models::{Order, OrderItem, OrderWithItems, Product};

/// Why a checkout was rejected.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// At least one requested product id does not exist.
    #[error("one or more products do not exist")]
    UnknownProduct,

    /// A product cannot cover the requested quantity.
    #[error("insufficient stock for {name}")]
    InsufficientStock {
        /// Name of the product that ran short.
        name: String,
    },

    /// Underlying repository failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<sqlx::Error> for CheckoutError {
    fn from(e: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(e))
    }
}

/// Why a cancellation was rejected.
#[derive(Debug, Error)]
pub enum CancelError {
    /// Order missing, or not owned by the caller.
    #[error("order not found")]
    NotFound,

    /// Order has already left the PENDING state.
    #[error("only pending orders can be canceled")]
    NotPending,

    /// Underlying repository failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<sqlx::Error> for CancelError {
    fn from(e: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(e))
    }
}

/// Shipping details captured from the checkout form.
#[derive(Debug, Clone)]
pub struct NewShippingAddress {
    pub department: String,
    pub city: String,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub postal_code: Option<String>,
    pub phone1: String,
    pub phone2: Option<String>,
    pub notes: Option<String>,
}

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

impl From<OrderItemRow> for OrderItem {
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

/// Minimal product view locked during checkout.
#[derive(Debug, sqlx::FromRow)]
struct CheckoutProductRow {
    id: i32,
    name: String,
    price: Decimal,
    stock: i32,
}

/// Sum requested quantities per product and check them against stock.
///
/// A cart may name the same product more than once; the stock check must
/// see the combined quantity or two half-sized entries could overdraw a
/// row that covers each alone. Returns the order total and the per-product
/// totals the decrement step applies.
fn tally_cart(
    items: &[CartItem],
    by_id: &HashMap<i32, &CheckoutProductRow>,
) -> Result<(Decimal, BTreeMap<i32, i32>), CheckoutError> {
    let mut requested: BTreeMap<i32, i32> = BTreeMap::new();
    for item in items {
        let entry = requested.entry(item.product_id.as_i32()).or_insert(0);
        *entry = entry.saturating_add(item.quantity);
    }

    let mut total = Decimal::ZERO;
    for (&product_id, &quantity) in &requested {
        let product = by_id.get(&product_id).ok_or(CheckoutError::UnknownProduct)?;
        if product.stock < quantity {
            return Err(CheckoutError::InsufficientStock {
                name: product.name.clone(),
            });
        }
        total += product.price * Decimal::from(quantity);
    }

    Ok((total, requested))
}

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

    /// Run the checkout transaction.
    ///
    /// Inside one transaction: lock the requested products, reject unknown
    /// ids and stock shortfalls, total the cart at current catalog prices,
    /// insert the shipping address, the order (PENDING), and the items with
    /// their unit prices frozen, then decrement stock.
    ///
    /// Duplicate product ids in `items` are summed before the stock check,
    /// so a cart naming the same product twice cannot overdraw its row.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::UnknownProduct`] or
    /// [`CheckoutError::InsufficientStock`] on validation failure; any
    /// database error aborts the transaction.
    pub async fn create_order(
        &self,
        user_id: UserId,
        items: &[CartItem],
        address: &NewShippingAddress,
        payment_method: PaymentMethod,
    ) -> Result<OrderId, CheckoutError> {
        let mut tx = self.pool.begin().await?;

        // Lock the distinct products so concurrent checkouts serialize on
        // the stock pre-check.
        let distinct_ids: Vec<i32> = items
            .iter()
            .map(|item| item.product_id.as_i32())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let rows = sqlx::query_as::<_, CheckoutProductRow>(
            "SELECT id, name, price, stock
             FROM shop.products
             WHERE id = ANY($1)
             FOR UPDATE",
        )
        .bind(&distinct_ids)
        .fetch_all(&mut *tx)
        .await?;

        if rows.len() != distinct_ids.len() {
            return Err(CheckoutError::UnknownProduct);
        }

        let by_id: HashMap<i32, &CheckoutProductRow> =
            rows.iter().map(|row| (row.id, row)).collect();

        let (total, requested) = tally_cart(items, &by_id)?;

        let (address_id,): (i32,) = sqlx::query_as(
            "INSERT INTO shop.shipping_addresses
                 (department, city, address_line1, address_line2,
                  postal_code, phone1, phone2, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING id",
        )
        .bind(&address.department)
        .bind(&address.city)
        .bind(&address.address_line1)
        .bind(&address.address_line2)
        .bind(&address.postal_code)
        .bind(&address.phone1)
        .bind(&address.phone2)
        .bind(&address.notes)
        .fetch_one(&mut *tx)
        .await?;

        let (order_id,): (i32,) = sqlx::query_as(
            "INSERT INTO shop.orders
                 (user_id, shipping_address_id, payment_method, total_amount)
             VALUES ($1, $2, $3, $4)
             RETURNING id",
        )
        .bind(user_id.as_i32())
        .bind(address_id)
        .bind(payment_method)
        .bind(total)
        .fetch_one(&mut *tx)
        .await?;

        let product_ids: Vec<i32> = items.iter().map(|i| i.product_id.as_i32()).collect();
        let quantities: Vec<i32> = items.iter().map(|i| i.quantity).collect();
        let prices: Vec<Decimal> = items
            .iter()
            .map(|i| by_id[&i.product_id.as_i32()].price)
            .collect();

        sqlx::query(
            "INSERT INTO shop.order_items (order_id, product_id, quantity, price)
             SELECT $1, product_id, quantity, price
             FROM UNNEST($2::int[], $3::int[], $4::numeric[])
                 AS t (product_id, quantity, price)",
        )
        .bind(order_id)
        .bind(&product_ids)
        .bind(&quantities)
        .bind(&prices)
        .execute(&mut *tx)
        .await?;

        for (product_id, quantity) in requested {
            sqlx::query("UPDATE shop.products SET stock = stock - $2 WHERE id = $1")
                .bind(product_id)
                .bind(quantity)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(OrderId::new(order_id))
    }

    /// List a user's orders, newest first, each with its items and the
    /// current product embedded.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<OrderWithItems>, RepositoryError> {
        let orders = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS}
             FROM shop.orders
             WHERE user_id = $1
             ORDER BY created_at DESC"
        ))
        .bind(user_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        let item_rows = sqlx::query_as::<_, OrderItemRow>(&format!(
            "SELECT {ITEM_JOIN_COLUMNS}
             FROM shop.order_items i
             JOIN shop.products p ON p.id = i.product_id
             JOIN shop.orders o ON o.id = i.order_id
             WHERE o.user_id = $1
             ORDER BY i.id"
        ))
        .bind(user_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        let mut items_by_order: HashMap<i32, Vec<OrderItem>> = HashMap::new();
        for row in item_rows {
            items_by_order
                .entry(row.order_id)
                .or_default()
                .push(OrderItem::from(row));
        }

        Ok(orders
            .into_iter()
            .map(|row| {
                let items = items_by_order.remove(&row.id).unwrap_or_default();
                OrderWithItems {
                    order: Order::from(row),
                    items,
                }
            })
            .collect())
    }

    /// Cancel one of the caller's PENDING orders.
    ///
    /// Ownership is part of the lookup: a foreign order id behaves exactly
    /// like a missing one.
    ///
    /// # Errors
    ///
    /// Returns [`CancelError::NotFound`] or [`CancelError::NotPending`] on
    /// rejection; database failures abort the transaction.
    pub async fn cancel_for_user(
        &self,
        order_id: OrderId,
        user_id: UserId,
    ) -> Result<(), CancelError> {
        let mut tx = self.pool.begin().await?;

        let status: Option<(OrderStatus,)> = sqlx::query_as(
            "SELECT status FROM shop.orders
             WHERE id = $1 AND user_id = $2
             FOR UPDATE",
        )
        .bind(order_id.as_i32())
        .bind(user_id.as_i32())
        .fetch_optional(&mut *tx)
        .await?;

        let (status,) = status.ok_or(CancelError::NotFound)?;
        if !status.can_cancel() {
            return Err(CancelError::NotPending);
        }

        sqlx::query("UPDATE shop.orders SET status = $2 WHERE id = $1")
            .bind(order_id.as_i32())
            .bind(OrderStatus::Canceled)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(id: i32, name: &str, price: &str, stock: i32) -> CheckoutProductRow {
        CheckoutProductRow {
            id,
            name: name.to_string(),
            price: price.parse().unwrap(),
            stock,
        }
    }

    fn index(rows: &[CheckoutProductRow]) -> HashMap<i32, &CheckoutProductRow> {
        rows.iter().map(|row| (row.id, row)).collect()
    }

    #[test]
    fn test_tally_cart_totals_at_catalog_prices() {
        let rows = vec![
            product(1, "Kaiak", "89.90", 10),
            product(2, "Essencial", "120.00", 4),
        ];
        let items = vec![
            CartItem::new(ProductId::new(1), 2),
            CartItem::new(ProductId::new(2), 1),
        ];

        let (total, requested) = tally_cart(&items, &index(&rows)).unwrap();

        assert_eq!(total, "299.80".parse::<Decimal>().unwrap());
        assert_eq!(requested.get(&1), Some(&2));
        assert_eq!(requested.get(&2), Some(&1));
    }

    #[test]
    fn test_tally_cart_sums_duplicate_product_entries() {
        // Two entries for the same product must be checked against their
        // combined quantity, not one at a time.
        let rows = vec![product(1, "Kaiak", "89.90", 5)];
        let items = vec![
            CartItem::new(ProductId::new(1), 3),
            CartItem::new(ProductId::new(1), 3),
        ];

        let err = tally_cart(&items, &index(&rows)).unwrap_err();
        assert!(matches!(err, CheckoutError::InsufficientStock { name } if name == "Kaiak"));
    }

    #[test]
    fn test_tally_cart_accepts_duplicates_within_stock() {
        let rows = vec![product(1, "Kaiak", "89.90", 5)];
        let items = vec![
            CartItem::new(ProductId::new(1), 2),
            CartItem::new(ProductId::new(1), 3),
        ];

        let (total, requested) = tally_cart(&items, &index(&rows)).unwrap();

        assert_eq!(requested.get(&1), Some(&5));
        assert_eq!(total, "449.50".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_tally_cart_rejects_unknown_product() {
        let rows = vec![product(1, "Kaiak", "89.90", 5)];
        let items = vec![CartItem::new(ProductId::new(7), 1)];

        let err = tally_cart(&items, &index(&rows)).unwrap_err();
        assert!(matches!(err, CheckoutError::UnknownProduct));
    }
}
