//! Cart

use rust_decimal::Decimal;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    items::LineItem,
    products::{Product, ProductId},
};

/// Invariant violations found in a deserialized cart.
#[derive(Debug, Error, PartialEq)]
pub enum CartError {
    /// Two line items share a product id (index of the second occurrence, id).
    #[error("Item {0} duplicates product {1}")]
    DuplicateProduct(usize, ProductId),

    /// A line item has a quantity of zero.
    #[error("Item {0} has a quantity of zero")]
    ZeroQuantity(usize),

    /// A line item has a negative price.
    #[error("Item {0} has a negative price {1}")]
    NegativePrice(usize, Decimal),
}

/// The buyer's in-progress selection of products.
///
/// Holds at most one [`LineItem`] per product id, in insertion order.
/// Deserialization checks the same invariants as [`Cart::with_items`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<LineItem>", into = "Vec<LineItem>")]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cart from existing line items, checking its invariants.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] describing the first invariant violation found.
    pub fn with_items(items: impl Into<Vec<LineItem>>) -> Result<Self, CartError> {
        let cart = Cart {
            items: items.into(),
        };

        cart.validate()?;

        Ok(cart)
    }

    /// Check the uniqueness, quantity and price invariants.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] describing the first invariant violation found.
    pub fn validate(&self) -> Result<(), CartError> {
        let mut seen = FxHashSet::default();

        self.items.iter().enumerate().try_for_each(|(i, item)| {
            if item.quantity == 0 {
                return Err(CartError::ZeroQuantity(i));
            }

            if item.price.is_sign_negative() && !item.price.is_zero() {
                return Err(CartError::NegativePrice(i, item.price));
            }

            if !seen.insert(&item.id) {
                return Err(CartError::DuplicateProduct(i, item.id.clone()));
            }

            Ok(())
        })
    }

    /// Add `quantity` units of a product, merging with an existing line item
    /// for the same product id.
    ///
    /// Returns the index of the affected line item, or `None` when `quantity`
    /// is zero and nothing changed.
    pub fn add(&mut self, product: &Product, quantity: u32) -> Option<usize> {
        if quantity == 0 {
            return None;
        }

        if let Some(index) = self.position(&product.id) {
            if let Some(item) = self.items.get_mut(index) {
                item.quantity = item.quantity.saturating_add(quantity);
            }

            return Some(index);
        }

        self.items.push(LineItem::from_product(product, quantity));

        Some(self.items.len() - 1)
    }

    /// Adjust the quantity of the item at `index` by `delta`.
    ///
    /// An item whose quantity would drop to zero or below is removed. Returns
    /// `false` when `index` is out of range.
    pub fn update_quantity(&mut self, index: usize, delta: i64) -> bool {
        let Some(item) = self.items.get_mut(index) else {
            return false;
        };

        let quantity = i64::from(item.quantity).saturating_add(delta);

        if quantity <= 0 {
            self.items.remove(index);
        } else {
            item.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        }

        true
    }

    /// Remove the item at `index`, returning it if the index was in range.
    pub fn remove(&mut self, index: usize) -> Option<LineItem> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    /// Position of the line item for a product id.
    pub fn position(&self, id: &ProductId) -> Option<usize> {
        self.items.iter().position(|item| &item.id == id)
    }

    /// Get a line item by position.
    pub fn get_item(&self, index: usize) -> Option<&LineItem> {
        self.items.get(index)
    }

    /// Iterate over the line items in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &LineItem> {
        self.items.iter()
    }

    /// The line items as a slice.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Total number of units across all line items.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of `price * quantity` over all line items.
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// Number of line items (not units).
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl TryFrom<Vec<LineItem>> for Cart {
    type Error = CartError;

    fn try_from(items: Vec<LineItem>) -> Result<Self, Self::Error> {
        Cart::with_items(items)
    }
}

impl From<Cart> for Vec<LineItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
