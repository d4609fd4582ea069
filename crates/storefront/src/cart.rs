//! In-memory shopping cart.
//!
//! The cart is session-scoped state with a single writer surface: the four
//! mutation operations on [`CartStore`]. Consumers receive a cloned handle
//! (cheap, `Arc`-backed) by injection rather than reaching for a global; all
//! clones observe the same underlying cart. Nothing here survives the
//! process.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use copperleaf_core::{Price, ProductId};

use crate::supabase::types::Product;

/// One cart row: a product snapshot and its requested quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    /// Product snapshot taken when the line was first added.
    pub product: Product,
    /// Requested quantity, always >= 1.
    pub quantity: u32,
}

impl CartLine {
    /// Price x quantity for this line.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price * self.quantity
    }
}

/// Shared handle to the session cart.
///
/// Mutations are serialized by a single mutex and apply before the call
/// returns, so a read issued after a mutation always observes it and two
/// mutations issued in sequence apply in issuance order. None of the
/// operations can fail: absent ids are no-ops and invalid quantities are
/// normalized, never rejected.
#[derive(Debug, Clone, Default)]
pub struct CartStore {
    inner: Arc<Mutex<Vec<CartLine>>>,
}

impl CartStore {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn locked(&self) -> MutexGuard<'_, Vec<CartLine>> {
        // Cart operations are total; a poisoned lock is recovered, not propagated.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add one unit of `product`.
    ///
    /// An existing line for the same product id is incremented; otherwise a
    /// new line is appended, so iteration order is first-add order. Stock is
    /// not checked here; eligibility is gated at the UI boundary with
    /// [`Product::in_stock`].
    pub fn add(&self, product: &Product) {
        let mut lines = self.locked();
        if let Some(line) = lines.iter_mut().find(|l| l.product.id == product.id) {
            line.quantity = line.quantity.saturating_add(1);
        } else {
            lines.push(CartLine {
                product: product.clone(),
                quantity: 1,
            });
        }
    }

    /// Remove the line for `id`, if present.
    pub fn remove(&self, id: ProductId) {
        self.locked().retain(|l| l.product.id != id);
    }

    /// Set the quantity for `id`.
    ///
    /// A quantity of zero or less removes the line instead; the cart never
    /// holds a zero-quantity entry. Absent ids are a no-op. No upper clamp
    /// against stock is applied here (caller concern, like [`Self::add`]).
    pub fn set_quantity(&self, id: ProductId, quantity: i64) {
        if quantity <= 0 {
            self.remove(id);
            return;
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        if let Some(line) = self.locked().iter_mut().find(|l| l.product.id == id) {
            line.quantity = quantity;
        }
    }

    /// Empty the cart unconditionally.
    pub fn clear(&self) {
        self.locked().clear();
    }

    /// Sum of price x quantity over all lines.
    ///
    /// Recomputed from current state on every call; never cached.
    #[must_use]
    pub fn total(&self) -> Price {
        self.locked().iter().map(CartLine::line_total).sum()
    }

    /// Sum of quantities across all lines (not the number of lines).
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.locked().iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locked().len()
    }

    /// Whether the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locked().is_empty()
    }

    /// Point-in-time snapshot of the lines, in first-add order.
    #[must_use]
    pub fn lines(&self) -> Vec<CartLine> {
        self.locked().clone()
    }
}
