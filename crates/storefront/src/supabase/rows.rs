//! Wire rows returned by the PostgREST `products` endpoint.
//!
//! Kept separate from the domain types in [`super::types`] so the wire shape
//! can follow the table schema exactly; conversion lives in
//! [`super::conversions`].

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use uuid::Uuid;

/// One row of the `products` table, as PostgREST serializes it.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    #[serde(deserialize_with = "decimal_from_number")]
    pub price: Decimal,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// `numeric` columns arrive as JSON numbers. Round-trip through the shortest
/// float text form so two-fraction-digit prices convert exactly.
fn decimal_from_number<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    raw.to_string()
        .parse::<Decimal>()
        .map_err(serde::de::Error::custom)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_row_deserializes_numeric_price_exactly() {
        let row: ProductRow = serde_json::from_value(json!({
            "id": "6d9f1c8a-4f2b-4a2e-9a51-0a3f4a1c2b3d",
            "name": "Running Shoes",
            "description": "Lightweight trainers",
            "price": 199.99,
            "image_url": "https://cdn.example.com/shoes.jpg",
            "category": "Footwear",
            "stock": 12,
            "created_at": "2026-01-05T10:00:00Z",
            "updated_at": "2026-01-05T10:00:00Z"
        }))
        .unwrap();

        assert_eq!(row.price, Decimal::new(19999, 2));
        assert_eq!(row.stock, 12);
    }

    #[test]
    fn test_row_accepts_null_optionals() {
        let row: ProductRow = serde_json::from_value(json!({
            "id": "6d9f1c8a-4f2b-4a2e-9a51-0a3f4a1c2b3d",
            "name": "Yoga Mat",
            "description": null,
            "price": 49.99,
            "image_url": null,
            "category": null,
            "stock": 0,
            "created_at": "2026-01-05T10:00:00Z",
            "updated_at": "2026-01-06T08:30:00Z"
        }))
        .unwrap();

        assert!(row.description.is_none());
        assert!(row.image_url.is_none());
        assert!(row.category.is_none());
    }

    #[test]
    fn test_row_accepts_integer_price() {
        let row: ProductRow = serde_json::from_value(json!({
            "id": "6d9f1c8a-4f2b-4a2e-9a51-0a3f4a1c2b3d",
            "name": "Gift Card",
            "description": null,
            "price": 25,
            "image_url": null,
            "category": null,
            "stock": 100,
            "created_at": "2026-01-05T10:00:00Z",
            "updated_at": "2026-01-05T10:00:00Z"
        }))
        .unwrap();

        assert_eq!(row.price, Decimal::new(25, 0));
    }
}
