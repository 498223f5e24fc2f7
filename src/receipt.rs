//! Receipt
//!
//! Plain-text rendering of a cart or a placed order: one table row per line
//! item followed by the totals summary.

use std::io;

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, iso};
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::Cart, items::LineItem, orders::Order, pricing::OrderTotals, products::Product,
};

/// Errors that can occur when writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// An amount does not fit in minor units.
    #[error("Amount {0} is out of range")]
    AmountOutOfRange(Decimal),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Format an amount in the store currency (Pakistani rupees).
///
/// # Errors
///
/// Returns [`ReceiptError::AmountOutOfRange`] if the amount cannot be
/// represented in paisa.
pub fn format_amount(amount: Decimal) -> Result<String, ReceiptError> {
    let minor = (amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        * Decimal::ONE_HUNDRED)
        .to_i64()
        .ok_or(ReceiptError::AmountOutOfRange(amount))?;

    Ok(Money::from_minor(minor, iso::PKR).to_string())
}

/// Write a cart with its totals.
///
/// # Errors
///
/// Returns an error if an amount cannot be formatted or the output fails.
pub fn write_cart(
    mut out: impl io::Write,
    cart: &Cart,
    totals: &OrderTotals,
) -> Result<(), ReceiptError> {
    if cart.is_empty() {
        writeln!(out, "Your cart is empty.")?;
        return Ok(());
    }

    write_items_table(&mut out, cart.items())?;
    write_summary(&mut out, totals)?;

    writeln!(out, "{} item(s) in cart", cart.item_count())?;

    Ok(())
}

/// Write a placed order: reference, customer, items and totals.
///
/// # Errors
///
/// Returns an error if an amount cannot be formatted or the output fails.
pub fn write_order(mut out: impl io::Write, order: &Order) -> Result<(), ReceiptError> {
    writeln!(out, "Order {} ({:?})", order.reference(), order.status)?;
    writeln!(out, "Placed: {}", order.created_at)?;
    writeln!(
        out,
        "Deliver to: {}, {}, {} ({}, {})",
        order.customer.full_name,
        order.customer.address,
        order.customer.city,
        order.customer.phone,
        order.customer.email
    )?;
    writeln!(out, "Payment: {}", order.payment_method)?;

    write_items_table(&mut out, &order.items)?;
    write_summary(&mut out, &order.totals)?;

    Ok(())
}

/// Write a product listing, one row per product.
///
/// # Errors
///
/// Returns an error if a price cannot be formatted or the output fails.
pub fn write_products<'a>(
    mut out: impl io::Write,
    products: impl IntoIterator<Item = &'a Product>,
) -> Result<(), ReceiptError> {
    let mut products = products.into_iter().peekable();

    if products.peek().is_none() {
        writeln!(out, "No products found.")?;
        return Ok(());
    }

    let mut builder = Builder::default();

    builder.push_record(["ID", "Name", "Category", "Price", "Description"]);

    for product in products {
        builder.push_record([
            product.id.to_string(),
            product.name.clone(),
            product.category.clone(),
            format_amount(product.price)?,
            product.description.clone().unwrap_or_default(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Columns::new(3..4), Alignment::right());

    writeln!(out, "{table}")?;

    Ok(())
}

fn write_items_table(out: &mut impl io::Write, items: &[LineItem]) -> Result<(), ReceiptError> {
    let mut builder = Builder::default();

    builder.push_record(["#", "Item", "Category", "Price", "Qty", "Line Total"]);

    for (index, item) in items.iter().enumerate() {
        builder.push_record([
            index.to_string(),
            item.name.clone(),
            item.category.clone(),
            format_amount(item.price)?,
            item.quantity.to_string(),
            format_amount(item.line_total())?,
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Columns::new(3..6), Alignment::right());
    table.modify(Rows::first(), Alignment::center());

    writeln!(out, "{table}")?;

    Ok(())
}

fn write_summary(out: &mut impl io::Write, totals: &OrderTotals) -> Result<(), ReceiptError> {
    let lines = [
        ("Subtotal:", format_amount(totals.subtotal)?),
        ("Shipping:", format_amount(totals.shipping)?),
        ("Tax:", format_amount(totals.tax)?),
        ("Total:", format_amount(totals.total)?),
    ];

    let label_width = lines.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    let value_width = lines.iter().map(|(_, value)| value.chars().count()).max().unwrap_or(0);

    for (label, value) in &lines {
        writeln!(out, " {label:>label_width$}  {value:>value_width$}")?;
    }

    Ok(())
}
