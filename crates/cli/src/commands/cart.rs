//! Cart commands

use std::io;

use clap::Subcommand;
use essentae::prelude::*;

use super::Context;

/// Cart actions.
#[derive(Debug, Subcommand)]
pub enum CartCommand {
    /// Show the cart with its totals
    Show,

    /// Add a catalog product to the cart
    Add {
        /// Product id
        id: String,

        /// Units to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },

    /// Change a line item's quantity by a signed amount
    Update {
        /// Line item position, as shown by `cart show`
        index: usize,

        /// Units to add (positive) or remove (negative)
        #[arg(allow_negative_numbers = true)]
        delta: i64,
    },

    /// Remove a line item
    Remove {
        /// Line item position, as shown by `cart show`
        index: usize,
    },

    /// Empty the cart
    Clear,
}

pub(super) fn run(
    ctx: &Context<'_>,
    command: &CartCommand,
    out: &mut impl io::Write,
) -> anyhow::Result<()> {
    let store = ctx.store();

    let cart = match command {
        CartCommand::Show => store.get_cart(),
        CartCommand::Add { id, quantity } => {
            store.add_product_by_id(&ctx.catalog()?, &ProductId::parse(id), *quantity)?
        }
        CartCommand::Update { index, delta } => store.update_quantity(*index, *delta)?,
        CartCommand::Remove { index } => store.remove_item(*index)?,
        CartCommand::Clear => {
            store.clear()?;
            Cart::new()
        }
    };

    write_cart(out, &cart, &store.compute_totals(&cart))?;

    Ok(())
}
