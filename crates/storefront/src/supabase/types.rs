//! Domain types for the Copperleaf catalog.
//!
//! These types provide a clean, ergonomic API separate from the raw PostgREST
//! wire rows. Every value is a snapshot taken at fetch time; the client never
//! mutates a product, and a snapshot may go stale relative to the store.

use chrono::{DateTime, Utc};
use copperleaf_core::{Price, ProductId};
use serde::{Deserialize, Serialize};

/// Image shown when a product row has no `image_url`.
pub const PLACEHOLDER_IMAGE_URL: &str = "/static/img/product-placeholder.svg";

/// A product in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Plain text description.
    pub description: Option<String>,
    /// Unit price.
    pub price: Price,
    /// Image URL.
    pub image_url: Option<String>,
    /// Category facet value; products without one do not appear in facets.
    pub category: Option<String>,
    /// Units available.
    pub stock: u32,
    /// Creation timestamp (store-maintained).
    pub created_at: DateTime<Utc>,
    /// Last update timestamp (store-maintained).
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Whether the add-to-cart control should be enabled for this product.
    ///
    /// The cart store itself does not check stock; callers gate the control
    /// with this at the UI boundary.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Image URL to render, falling back to the placeholder.
    #[must_use]
    pub fn image_or_placeholder(&self) -> &str {
        self.image_url.as_deref().unwrap_or(PLACEHOLDER_IMAGE_URL)
    }
}
