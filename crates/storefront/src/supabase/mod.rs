//! Supabase catalog client.
//!
//! # Architecture
//!
//! - Talks to the project's PostgREST surface directly with `reqwest` -
//!   Supabase is the source of truth, NO local sync
//! - In-memory caching via `moka` for successful reads (5 minute TTL)
//! - Wire rows are separate from domain types; conversion lives in one place
//!
//! The client is read-only: the `products` table is world-readable and the
//! storefront never mutates it. Every request carries the project anon key.
//!
//! # Example
//!
//! ```rust,ignore
//! use copperleaf_storefront::supabase::SupabaseClient;
//!
//! let client = SupabaseClient::new(&config.supabase)?;
//!
//! // Full catalog, newest first
//! let products = client.list_products().await?;
//!
//! // Detail lookup; a missing row is Ok(None), not an error
//! let product = client.get_product(id).await?;
//! ```

mod cache;
mod client;
mod conversions;
mod rows;

pub mod types;

pub use client::SupabaseClient;

use thiserror::Error;

/// Errors that can occur when querying the catalog.
///
/// A lookup that legitimately matches no row is NOT an error; it surfaces as
/// `Ok(None)` from [`SupabaseClient::get_product`].
#[derive(Debug, Error)]
pub enum SupabaseError {
    /// HTTP request failed (network/availability).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// PostgREST rejected the request.
    #[error("PostgREST error: {}", format_api_error(.0))]
    Api(ApiError),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configured project URL cannot take the REST path.
    #[error("invalid catalog URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Rate limited by the project gateway.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),
}

/// A structured error returned by the PostgREST endpoint.
#[derive(Debug, Clone)]
pub struct ApiError {
    /// HTTP status of the response.
    pub status: u16,
    /// PostgREST/PostgreSQL error code, when provided.
    pub code: Option<String>,
    /// Human-readable error message.
    pub message: String,
    /// Additional detail, when provided.
    pub details: Option<String>,
    /// Remediation hint, when provided.
    pub hint: Option<String>,
}

fn format_api_error(error: &ApiError) -> String {
    let mut out = format!("HTTP {}: {}", error.status, error.message);

    if let Some(code) = &error.code {
        out.push_str(&format!(" (code {code})"));
    }

    if let Some(hint) = &error.hint {
        out.push_str(&format!(" (hint: {hint})"));
    }

    out
}
