//! Cart item type and normalization.
//!
//! The cart lives client-side and is mirrored to the server for signed-in
//! users as a raw JSON document, so the server treats incoming carts as
//! untrusted: [`normalize_cart_items`] keeps well-formed entries and
//! silently drops everything else rather than rejecting the whole payload.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::id::ProductId;

/// A single cart line: a product reference and a desired quantity.
///
/// Carts carry no prices. Prices are resolved from the catalog at checkout
/// and frozen onto the order items there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: ProductId,
    pub quantity: i32,
}

impl CartItem {
    /// Create a cart item.
    #[must_use]
    pub const fn new(product_id: ProductId, quantity: i32) -> Self {
        Self {
            product_id,
            quantity,
        }
    }
}

/// Sanitize a raw JSON cart into well-formed items.
///
/// Anything that is not an array yields an empty cart. Within the array,
/// an entry survives only if both `productId` and `quantity` are integers
/// that fit in `i32` and are strictly positive; malformed entries are
/// dropped without error.
///
/// # Examples
///
/// ```
/// use essenza_core::{CartItem, ProductId, normalize_cart_items};
/// use serde_json::json;
///
/// let raw = json!([
///     {"productId": 3, "quantity": 2},
///     {"productId": 0, "quantity": 1},
///     "junk",
/// ]);
/// assert_eq!(
///     normalize_cart_items(&raw),
///     vec![CartItem::new(ProductId::new(3), 2)]
/// );
/// ```
#[must_use]
pub fn normalize_cart_items(raw: &Value) -> Vec<CartItem> {
    let Some(entries) = raw.as_array() else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| {
            let product_id = positive_i32(entry.get("productId")?)?;
            let quantity = positive_i32(entry.get("quantity")?)?;
            Some(CartItem::new(ProductId::new(product_id), quantity))
        })
        .collect()
}

fn positive_i32(value: &Value) -> Option<i32> {
    let n = i32::try_from(value.as_i64()?).ok()?;
    (n > 0).then_some(n)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_keeps_valid_items() {
        let raw = json!([
            {"productId": 1, "quantity": 2},
            {"productId": 7, "quantity": 1},
        ]);
        assert_eq!(
            normalize_cart_items(&raw),
            vec![
                CartItem::new(ProductId::new(1), 2),
                CartItem::new(ProductId::new(7), 1),
            ]
        );
    }

    #[test]
    fn test_normalize_non_array_yields_empty_cart() {
        assert!(normalize_cart_items(&json!(null)).is_empty());
        assert!(normalize_cart_items(&json!("cart")).is_empty());
        assert!(normalize_cart_items(&json!({"productId": 1})).is_empty());
    }

    #[test]
    fn test_normalize_drops_malformed_entries() {
        let raw = json!([
            {"productId": 1, "quantity": 2},
            {"productId": "2", "quantity": 1},
            {"productId": 3},
            {"quantity": 4},
            {"productId": 5.5, "quantity": 1},
            42,
            null,
        ]);
        assert_eq!(
            normalize_cart_items(&raw),
            vec![CartItem::new(ProductId::new(1), 2)]
        );
    }

    #[test]
    fn test_normalize_drops_non_positive_values() {
        let raw = json!([
            {"productId": 1, "quantity": 0},
            {"productId": 2, "quantity": -3},
            {"productId": 0, "quantity": 1},
            {"productId": -1, "quantity": 1},
        ]);
        assert!(normalize_cart_items(&raw).is_empty());
    }

    #[test]
    fn test_normalize_drops_values_outside_i32() {
        let raw = json!([
            {"productId": 4_294_967_296_i64, "quantity": 1},
            {"productId": 2, "quantity": 9_000_000_000_i64},
        ]);
        assert!(normalize_cart_items(&raw).is_empty());
    }

    #[test]
    fn test_cart_item_wire_format_is_camel_case() {
        let item = CartItem::new(ProductId::new(9), 3);
        assert_eq!(
            serde_json::to_value(item).unwrap(),
            json!({"productId": 9, "quantity": 3})
        );
    }

    #[test]
    fn test_duplicate_product_ids_are_preserved() {
        let raw = json!([
            {"productId": 1, "quantity": 1},
            {"productId": 1, "quantity": 2},
        ]);
        assert_eq!(normalize_cart_items(&raw).len(), 2);
    }
}
