//! Product catalog model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use essenza_core::{Brand, Gender, ProductId};

/// A catalog product.
///
/// Money fields serialize as strings (`"79.90"`) so clients never see
/// floating-point artifacts. `price` is what the customer pays; `cost_price`
/// feeds the admin profit report and is not snapshotted onto orders.
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

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> Product {
        Product {
            id: ProductId::new(1),
            name: "Essencial Oud".to_string(),
            description: "Woody eau de parfum".to_string(),
            brand: Brand::Natura,
            cost_price: Decimal::new(4550, 2),
            price: Decimal::new(7990, 2),
            image_url: None,
            gender: Some(Gender::Men),
            stock: 12,
            is_active: true,
            created_at: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            updated_at: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        }
    }

    #[test]
    fn test_product_json_uses_camel_case_and_string_money() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["costPrice"], "45.50");
        assert_eq!(json["price"], "79.90");
        assert_eq!(json["imageUrl"], serde_json::Value::Null);
        assert_eq!(json["isActive"], true);
        assert_eq!(json["gender"], "MEN");
    }
}
