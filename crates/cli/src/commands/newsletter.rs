//! Newsletter command

use std::io;

use anyhow::bail;
use clap::Args;
use essentae::prelude::*;

/// Newsletter signup.
#[derive(Debug, Args)]
pub struct NewsletterArgs {
    /// Address to subscribe
    #[arg(long)]
    email: String,
}

pub(super) fn run(args: &NewsletterArgs, out: &mut impl io::Write) -> anyhow::Result<()> {
    if let Err(reason) = ContactValidator::new()?.check_email(&args.email) {
        writeln!(out, "email: {reason}")?;

        bail!(reason)
    }

    writeln!(out, "Thank you for subscribing!")?;

    Ok(())
}
