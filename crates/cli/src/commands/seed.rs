//! Seed command: demo catalog and admin pre-registration.
//!
//! Idempotent by name: a demo product is only inserted when no product
//! with that name exists yet, so re-running the command never duplicates
//! the catalog.

use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use thiserror::Error;

use essenza_core::{Brand, Email, Gender, UserRole};

use super::migrate::{MigrationError, database_url};

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Env(#[from] MigrationError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid email: {0}")]
    InvalidEmail(String),
}

struct DemoProduct {
    name: &'static str,
    description: &'static str,
    brand: Brand,
    gender: Option<Gender>,
    price: &'static str,
    cost_price: &'static str,
    stock: i32,
}

const DEMO_PRODUCTS: &[DemoProduct] = &[
    DemoProduct {
        name: "Essencial Oud",
        description: "Woody eau de parfum with oud and brazilian priprioca",
        brand: Brand::Natura,
        gender: Some(Gender::Men),
        price: "79.90",
        cost_price: "45.50",
        stock: 12,
    },
    DemoProduct {
        name: "Kaiak Aero",
        description: "Fresh aquatic fragrance for everyday wear",
        brand: Brand::Natura,
        gender: Some(Gender::Men),
        price: "59.90",
        cost_price: "30.00",
        stock: 20,
    },
    DemoProduct {
        name: "Luna Radiante",
        description: "Floral amber with jasmine and vanilla",
        brand: Brand::Natura,
        gender: Some(Gender::Women),
        price: "69.90",
        cost_price: "38.00",
        stock: 15,
    },
    DemoProduct {
        name: "Ccori Rosé",
        description: "Delicate rose and peach eau de parfum",
        brand: Brand::Yanbal,
        gender: Some(Gender::Women),
        price: "64.90",
        cost_price: "34.00",
        stock: 18,
    },
    DemoProduct {
        name: "Gaia",
        description: "Green floral with bergamot and white musk",
        brand: Brand::Yanbal,
        gender: Some(Gender::Women),
        price: "72.50",
        cost_price: "40.00",
        stock: 10,
    },
    DemoProduct {
        name: "Solo Para Ti",
        description: "Soft oriental with tonka bean and sandalwood",
        brand: Brand::Yanbal,
        gender: Some(Gender::Unisex),
        price: "58.00",
        cost_price: "29.00",
        stock: 25,
    },
    DemoProduct {
        name: "Essencial Exclusivo",
        description: "Intense floral built around brazilian jasmine",
        brand: Brand::Natura,
        gender: Some(Gender::Women),
        price: "89.90",
        cost_price: "52.00",
        stock: 8,
    },
    DemoProduct {
        name: "Temerario",
        description: "Spicy leather scent with cardamom and vetiver",
        brand: Brand::Yanbal,
        gender: Some(Gender::Men),
        price: "61.50",
        cost_price: "31.50",
        stock: 14,
    },
];

/// Seed demo products and optionally pre-register an admin account.
///
/// # Errors
///
/// Returns `SeedError` if the database URL is missing, a query fails, or
/// the admin email is malformed.
pub async fn run(demo_products: usize, admin_email: Option<&str>) -> Result<(), SeedError> {
    dotenvy::dotenv().ok();

    let database_url = database_url()?;
    let pool = PgPool::connect(database_url.expose_secret()).await?;

    let mut inserted = 0_usize;
    for product in DEMO_PRODUCTS.iter().take(demo_products) {
        // Prices in this table are literals; a parse failure is unreachable
        let price: Decimal = product.price.parse().unwrap_or(Decimal::ZERO);
        let cost_price: Decimal = product.cost_price.parse().unwrap_or(Decimal::ZERO);

        let result = sqlx::query(
            "INSERT INTO shop.products (name, description, brand, gender, price, cost_price, stock)
             SELECT $1, $2, $3, $4, $5, $6, $7
             WHERE NOT EXISTS (SELECT 1 FROM shop.products WHERE name = $1)",
        )
        .bind(product.name)
        .bind(product.description)
        .bind(product.brand)
        .bind(product.gender)
        .bind(price)
        .bind(cost_price)
        .bind(product.stock)
        .execute(&pool)
        .await?;

        inserted += usize::try_from(result.rows_affected()).unwrap_or(0);
    }

    tracing::info!(
        requested = demo_products.min(DEMO_PRODUCTS.len()),
        inserted,
        "Demo catalog seeded"
    );

    if let Some(raw) = admin_email {
        let email = Email::parse(raw).map_err(|e| SeedError::InvalidEmail(e.to_string()))?;

        sqlx::query(
            "INSERT INTO shop.users (email, name, role)
             VALUES ($1, 'Administrator', $2)
             ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role",
        )
        .bind(email.as_str())
        .bind(UserRole::Admin)
        .execute(&pool)
        .await?;

        tracing::info!(email = %email, "Admin account registered");
    }

    Ok(())
}
