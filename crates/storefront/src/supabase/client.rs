//! PostgREST client for the hosted catalog.

use std::sync::Arc;
use std::time::Duration;

use copperleaf_core::ProductId;
use moka::future::Cache;
use secrecy::ExposeSecret;
use serde::Deserialize;
use tracing::{debug, instrument};
use url::Url;

use crate::config::SupabaseConfig;

use super::cache::CacheValue;
use super::conversions::convert_product;
use super::rows::ProductRow;
use super::types::Product;
use super::{ApiError, SupabaseError};

/// How long successful reads stay cached.
const CACHE_TTL: Duration = Duration::from_secs(300); // 5 minutes
/// Cache capacity, in entries.
const CACHE_CAPACITY: u64 = 1000;
/// Cache key for the full product list.
const PRODUCTS_CACHE_KEY: &str = "products:all";
/// How much response body to keep in diagnostics.
const BODY_SNIPPET_LEN: usize = 500;

// =============================================================================
// SupabaseClient
// =============================================================================

/// Client for the Supabase PostgREST catalog surface.
///
/// Provides typed, read-only access to the `products` table. Successful
/// reads are cached for 5 minutes; a missing row and every error outcome are
/// never cached.
#[derive(Clone)]
pub struct SupabaseClient {
    inner: Arc<SupabaseClientInner>,
}

struct SupabaseClientInner {
    http: reqwest::Client,
    products_url: Url,
    anon_key: String,
    cache: Cache<String, CacheValue>,
}

impl SupabaseClient {
    /// Create a new catalog client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the project URL
    /// does not accept the REST path.
    pub fn new(config: &SupabaseConfig) -> Result<Self, SupabaseError> {
        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(CACHE_TTL)
            .build();

        let http = reqwest::Client::builder()
            .timeout(config.fetch_timeout)
            .build()?;

        let products_url = config.project_url.join("rest/v1/products")?;

        Ok(Self {
            inner: Arc::new(SupabaseClientInner {
                http,
                products_url,
                anon_key: config.anon_key.expose_secret().to_string(),
                cache,
            }),
        })
    }

    /// Base request for the `products` endpoint.
    ///
    /// Supabase expects the anon key both as the `apikey` header and as a
    /// bearer token.
    fn products_request(&self) -> reqwest::RequestBuilder {
        self.inner
            .http
            .get(self.inner.products_url.clone())
            .header("apikey", &self.inner.anon_key)
            .bearer_auth(&self.inner.anon_key)
    }

    /// Execute a catalog query and decode the row list.
    async fn fetch_rows(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<Vec<ProductRow>, SupabaseError> {
        let response = request.send().await?;
        let status = response.status();

        // Check for rate limiting
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(SupabaseError::RateLimited(retry_after));
        }

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %snippet(&body),
                "catalog request failed"
            );
            return Err(SupabaseError::Api(parse_api_error(status.as_u16(), &body)));
        }

        match serde_json::from_str::<Vec<ProductRow>>(&body) {
            Ok(rows) => Ok(rows),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %snippet(&body),
                    "failed to parse catalog response"
                );
                Err(SupabaseError::Parse(e))
            }
        }
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Get the full product list, ordered by creation time descending.
    ///
    /// The table is small by design; there is no pagination.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, SupabaseError> {
        // Check cache
        if let Some(CacheValue::Products(products)) =
            self.inner.cache.get(PRODUCTS_CACHE_KEY).await
        {
            debug!("Cache hit for product list");
            return Ok(products);
        }

        let request = self
            .products_request()
            .query(&[("select", "*"), ("order", "created_at.desc")]);

        let rows = self.fetch_rows(request).await?;
        let products: Vec<Product> = rows.into_iter().map(convert_product).collect();

        // Cache the result
        self.inner
            .cache
            .insert(
                PRODUCTS_CACHE_KEY.to_string(),
                CacheValue::Products(products.clone()),
            )
            .await;

        Ok(products)
    }

    /// Get a product by its id.
    ///
    /// A well-formed id with no matching row is `Ok(None)` - an expected
    /// outcome, distinct from a query failure.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn get_product(&self, id: ProductId) -> Result<Option<Product>, SupabaseError> {
        let cache_key = format!("product:{id}");

        // Check cache
        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(Some(*product));
        }

        let request = self
            .products_request()
            .query(&[("select", "*"), ("limit", "1")])
            .query(&[("id", format!("eq.{id}"))]);

        let rows = self.fetch_rows(request).await?;
        let product = rows.into_iter().next().map(convert_product);

        // Cache the result; a missing row is not cached
        if let Some(product) = &product {
            self.inner
                .cache
                .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
                .await;
        }

        Ok(product)
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    /// Invalidate a cached product.
    pub async fn invalidate_product(&self, id: ProductId) {
        let cache_key = format!("product:{id}");
        self.inner.cache.invalidate(&cache_key).await;
    }

    /// Invalidate all cached data.
    pub async fn invalidate_all(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }
}

// =============================================================================
// Error Body Parsing
// =============================================================================

/// PostgREST error body shape.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    code: Option<String>,
    details: Option<String>,
    hint: Option<String>,
}

fn parse_api_error(status: u16, body: &str) -> ApiError {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();

    ApiError {
        status,
        code: parsed.code,
        message: parsed.message.unwrap_or_else(|| snippet(body)),
        details: parsed.details,
        hint: parsed.hint,
    }
}

fn snippet(body: &str) -> String {
    body.chars().take(BODY_SNIPPET_LEN).collect()
}
