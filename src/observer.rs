//! Cart Observer

use crate::{cart::Cart, items::LineItem};

/// Receives notifications after the cart store changes.
///
/// This is the hook for cart badges and "added to cart" toasts: the store
/// calls it after every mutation that changed the cart's contents, once the
/// new state has been persisted and its lock released, so callbacks may read
/// or mutate the cart. No-op mutations (an out-of-range index, a
/// zero quantity) produce no callbacks.
#[cfg_attr(test, mockall::automock)]
pub trait CartObserver: Send + Sync {
    /// Called with the updated cart and its total unit count.
    fn cart_changed(&self, cart: &Cart, item_count: u64);

    /// Called when units of a product were added to the cart.
    fn item_added(&self, _item: &LineItem) {}
}

/// Observer that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl CartObserver for NoopObserver {
    fn cart_changed(&self, _cart: &Cart, _item_count: u64) {}
}
