//! Contact command

use std::io;

use anyhow::bail;
use clap::Args;
use essentae::prelude::*;

/// Contact form fields.
#[derive(Debug, Args)]
pub struct ContactArgs {
    /// First name
    #[arg(long)]
    first_name: String,

    /// Last name
    #[arg(long)]
    last_name: String,

    /// Email address
    #[arg(long)]
    email: String,

    /// Phone number (+92XXXXXXXXXX or 0XXXXXXXXXX)
    #[arg(long, default_value = "")]
    phone: String,

    /// Subject
    #[arg(long)]
    subject: String,

    /// Message, 10 to 1000 characters
    #[arg(long)]
    message: String,
}

impl From<&ContactArgs> for ContactForm {
    fn from(args: &ContactArgs) -> Self {
        ContactForm {
            first_name: args.first_name.clone(),
            last_name: args.last_name.clone(),
            email: args.email.clone(),
            phone: args.phone.clone(),
            subject: args.subject.clone(),
            message: args.message.clone(),
        }
    }
}

pub(super) fn run(args: &ContactArgs, out: &mut impl io::Write) -> anyhow::Result<()> {
    let validator = ContactValidator::new()?;

    match validator.validate(&ContactForm::from(args)) {
        Ok(()) => {
            writeln!(
                out,
                "Thank you for your message! We'll get back to you soon."
            )?;

            Ok(())
        }
        Err(errors) => {
            for (field, reason) in &errors.errors {
                writeln!(out, "{field}: {reason}")?;
            }

            bail!(errors)
        }
    }
}
