//! Product repository: catalog CRUD for the back-office.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use essenza_core::{Brand, Gender, ProductId};

use super::RepositoryError;
use crate::models::Product;

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ProductRow {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub brand: Brand,
    pub cost_price: Decimal,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub gender: Option<Gender>,
    pub stock: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            name: row.name,
            description: row.description,
            brand: row.brand,
            cost_price: row.cost_price,
            price: row.price,
            image_url: row.image_url,
            gender: row.gender,
            stock: row.stock,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub(crate) const PRODUCT_COLUMNS: &str = "id, name, description, brand, cost_price, price, \
     image_url, gender, stock, is_active, created_at, updated_at";

/// A fully specified new product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub brand: Brand,
    pub cost_price: Decimal,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub gender: Option<Gender>,
    pub stock: i32,
}

/// A partial product update. `None` fields keep their current value.
///
/// `image_url` and `gender` can be set but not unset through a patch; the
/// update treats NULL as "unchanged".
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
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

/// Repository for catalog writes and the admin listing.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every product, inactive ones included, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS}
             FROM shop.products
             ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Create a product. New products start active.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(&self, product: &NewProduct) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "INSERT INTO shop.products
                 (name, description, brand, cost_price, price, image_url, gender, stock)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.brand)
        .bind(product.cost_price)
        .bind(product.price)
        .bind(&product.image_url)
        .bind(product.gender)
        .bind(product.stock)
        .fetch_one(self.pool)
        .await?;

        Ok(Product::from(row))
    }

    /// Apply a partial update and return the updated product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    pub async fn update(
        &self,
        id: ProductId,
        patch: &ProductPatch,
    ) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "UPDATE shop.products SET
                 name        = COALESCE($2, name),
                 description = COALESCE($3, description),
                 brand       = COALESCE($4, brand),
                 cost_price  = COALESCE($5, cost_price),
                 price       = COALESCE($6, price),
                 image_url   = COALESCE($7, image_url),
                 gender      = COALESCE($8, gender),
                 stock       = COALESCE($9, stock),
                 is_active   = COALESCE($10, is_active)
             WHERE id = $1
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id.as_i32())
        .bind(&patch.name)
        .bind(&patch.description)
        .bind(patch.brand)
        .bind(patch.cost_price)
        .bind(patch.price)
        .bind(&patch.image_url)
        .bind(patch.gender)
        .bind(patch.stock)
        .bind(patch.is_active)
        .fetch_optional(self.pool)
        .await?;

        row.map(Product::from).ok_or(RepositoryError::NotFound)
    }
}
