//! Catalog browsing: load-once product state, category facets, filtering.
//!
//! Filtering is a pure function of (products, search text, category) so the
//! hosting UI can recompute it on every input change and unit tests need no
//! UI harness. [`Catalog`] wraps the loaded list together with the derived
//! facet set and the loading flag.

use std::collections::BTreeSet;

use copperleaf_core::ProductId;

use crate::supabase::types::Product;
use crate::supabase::{SupabaseClient, SupabaseError};

/// Category selection for the product list.
///
/// The UI's category selector carries a reserved `"all"` value; everything
/// else selects one exact category.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// No category narrowing.
    #[default]
    All,
    /// Only products whose category equals this value exactly.
    Only(String),
}

impl CategoryFilter {
    /// Map the selector's route/query parameter to a filter.
    #[must_use]
    pub fn from_param(param: &str) -> Self {
        if param == "all" {
            Self::All
        } else {
            Self::Only(param.to_string())
        }
    }

    /// Whether `product` passes this filter. Comparison is exact and
    /// case-sensitive; a product without a category only passes [`Self::All`].
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Self::All => true,
            Self::Only(category) => product.category.as_deref() == Some(category.as_str()),
        }
    }
}

/// Select the products matching `search` and `category`, preserving order.
///
/// A non-empty `search` matches as a case-insensitive substring of the name
/// OR the description; a product with no description can still pass via its
/// name. Inputs are never mutated.
#[must_use]
pub fn filter_products<'a>(
    products: &'a [Product],
    search: &str,
    category: &CategoryFilter,
) -> Vec<&'a Product> {
    let needle = search.to_lowercase();
    products
        .iter()
        .filter(|p| matches_search(p, &needle) && category.matches(p))
        .collect()
}

fn matches_search(product: &Product, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }

    product.name.to_lowercase().contains(needle)
        || product
            .description
            .as_ref()
            .is_some_and(|d| d.to_lowercase().contains(needle))
}

/// Distinct non-empty category values across `products`, sorted.
///
/// Products without a category contribute nothing.
#[must_use]
pub fn distinct_categories(products: &[Product]) -> Vec<String> {
    let set: BTreeSet<&str> = products
        .iter()
        .filter_map(|p| p.category.as_deref())
        .filter(|c| !c.is_empty())
        .collect();

    set.into_iter().map(str::to_owned).collect()
}

/// Loaded catalog state for the product list view.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    categories: Vec<String>,
    loading: bool,
}

impl Catalog {
    /// Create an empty, not-loading catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The loaded products, newest first (the fetch order).
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// The derived category facets.
    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Whether a fetch is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Replace the catalog with a fresh fetch of the full product list.
    ///
    /// On success the product list and the facet set are replaced together;
    /// on failure both keep their previous values and the error is returned
    /// to the caller once. The loading flag clears on both paths. Dropping
    /// the returned future (view teardown) cancels the fetch before anything
    /// is applied.
    ///
    /// # Errors
    ///
    /// Returns the query failure, after logging it.
    pub async fn refresh(&mut self, client: &SupabaseClient) -> Result<(), SupabaseError> {
        self.loading = true;
        let outcome = client.list_products().await;
        self.apply(outcome)
    }

    fn apply(&mut self, outcome: Result<Vec<Product>, SupabaseError>) -> Result<(), SupabaseError> {
        self.loading = false;
        match outcome {
            Ok(products) => {
                self.categories = distinct_categories(&products);
                self.products = products;
                Ok(())
            }
            Err(error) => {
                tracing::warn!(error = %error, "catalog refresh failed; keeping last known products");
                Err(error)
            }
        }
    }

    /// Look up a loaded product by id.
    #[must_use]
    pub fn find(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// The loaded products narrowed by `search` and `category`.
    #[must_use]
    pub fn filtered(&self, search: &str, category: &CategoryFilter) -> Vec<&Product> {
        filter_products(&self.products, search, category)
    }
}
