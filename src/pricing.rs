//! Pricing

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::Cart;

/// Shipping and tax rules applied at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingPolicy {
    /// Subtotals strictly above this amount ship for free.
    pub free_shipping_threshold: Decimal,

    /// Flat shipping fee charged at or below the threshold.
    pub flat_shipping_fee: Decimal,

    /// Tax rate applied to the subtotal, as a fraction.
    pub tax_rate: Decimal,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            free_shipping_threshold: Decimal::from(2000),
            flat_shipping_fee: Decimal::from(200),
            tax_rate: Decimal::new(13, 2),
        }
    }
}

impl PricingPolicy {
    /// Shipping charged for a given subtotal.
    pub fn shipping_for(&self, subtotal: Decimal) -> Decimal {
        if subtotal > self.free_shipping_threshold {
            Decimal::ZERO
        } else {
            self.flat_shipping_fee
        }
    }

    /// Tax charged on a given subtotal.
    pub fn tax_for(&self, subtotal: Decimal) -> Decimal {
        subtotal * self.tax_rate
    }

    /// Compute the totals for a cart.
    ///
    /// Pure: reads nothing but the cart passed in.
    pub fn totals(&self, cart: &Cart) -> OrderTotals {
        let subtotal = cart.subtotal();
        let shipping = self.shipping_for(subtotal);
        let tax = self.tax_for(subtotal);

        OrderTotals {
            subtotal,
            shipping,
            tax,
            total: subtotal + shipping + tax,
        }
    }
}

/// Totals derived from a cart at the moment of computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    /// Sum of `price * quantity`
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,

    /// Shipping fee
    #[serde(with = "rust_decimal::serde::float")]
    pub shipping: Decimal,

    /// Tax on the subtotal
    #[serde(with = "rust_decimal::serde::float")]
    pub tax: Decimal,

    /// Grand total
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

/// Compute cart totals with the default storefront policy.
pub fn compute_totals(cart: &Cart) -> OrderTotals {
    PricingPolicy::default().totals(cart)
}
