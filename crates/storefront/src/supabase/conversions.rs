//! Row-to-domain conversion functions.

use copperleaf_core::{Price, ProductId};

use super::rows::ProductRow;
use super::types::Product;

pub fn convert_product(row: ProductRow) -> Product {
    Product {
        id: ProductId::new(row.id),
        name: row.name,
        description: row.description,
        price: Price::new(row.price),
        image_url: row.image_url,
        category: row.category,
        // The schema keeps stock non-negative; anything else maps to "none left"
        stock: u32::try_from(row.stock).unwrap_or(0),
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}
