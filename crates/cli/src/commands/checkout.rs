//! Checkout command

use std::io;

use clap::Args;
use essentae::prelude::*;

use super::Context;

/// Delivery details and payment choice.
#[derive(Debug, Args)]
pub struct CheckoutArgs {
    /// Recipient's full name
    #[arg(long)]
    full_name: String,

    /// Contact email
    #[arg(long)]
    email: String,

    /// Contact phone number
    #[arg(long)]
    phone: String,

    /// Street address
    #[arg(long)]
    address: String,

    /// City
    #[arg(long)]
    city: String,

    /// Payment method (e.g. cod, card)
    #[arg(long, default_value = "cod")]
    payment_method: String,
}

impl CheckoutArgs {
    fn customer(&self) -> Customer {
        Customer {
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            address: self.address.clone(),
            city: self.city.clone(),
        }
    }
}

pub(super) fn run(
    ctx: &Context<'_>,
    args: &CheckoutArgs,
    out: &mut impl io::Write,
) -> anyhow::Result<()> {
    let order = ctx
        .recorder()
        .checkout(&args.customer(), PaymentMethodId::new(&args.payment_method))?;

    writeln!(out, "Thank you for your order!")?;
    write_order(out, &order)?;

    Ok(())
}
