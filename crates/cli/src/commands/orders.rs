//! Orders command

use std::io;

use essentae::prelude::*;

use super::Context;

pub(super) fn run(ctx: &Context<'_>, out: &mut impl io::Write) -> anyhow::Result<()> {
    let orders = ctx.recorder().orders();

    if orders.is_empty() {
        writeln!(out, "No orders yet.")?;
        return Ok(());
    }

    for (n, order) in orders.iter().enumerate() {
        if n > 0 {
            writeln!(out)?;
        }

        write_order(&mut *out, order)?;
    }

    Ok(())
}
