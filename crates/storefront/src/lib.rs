//! Copperleaf Storefront library.
//!
//! Catalog and cart layer for the public shop:
//!
//! - [`supabase`] - read-only client for the hosted `products` table
//! - [`browse`] - load-once catalog state, category facets, filtering
//! - [`cart`] - in-memory session cart with derived totals
//! - [`config`] - environment-driven configuration
//!
//! This crate is a library on purpose: routing, templating and notification
//! presentation belong to the hosting UI, which drives this layer and renders
//! its state. Nothing here persists across process restarts.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod browse;
pub mod cart;
pub mod config;
pub mod supabase;

pub use browse::{Catalog, CategoryFilter};
pub use cart::{CartLine, CartStore};
pub use config::{StorefrontConfig, SupabaseConfig};
pub use supabase::types::Product;
pub use supabase::{SupabaseClient, SupabaseError};
