//! Commands

use std::{io, sync::Arc};

use anyhow::Context as _;
use clap::Subcommand;
use essentae::prelude::*;
use tracing::info;

use crate::config::CliConfig;

mod cart;
mod checkout;
mod contact;
mod newsletter;
mod orders;
mod products;

pub(crate) use cart::CartCommand;
pub(crate) use checkout::CheckoutArgs;
pub(crate) use contact::ContactArgs;
pub(crate) use newsletter::NewsletterArgs;
pub(crate) use products::ProductsArgs;

/// Storefront commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the catalog, optionally filtered, searched and sorted
    Products(ProductsArgs),

    /// Show or change the cart
    Cart {
        /// Cart action
        #[command(subcommand)]
        command: CartCommand,
    },

    /// Place an order for the current cart
    Checkout(CheckoutArgs),

    /// List placed orders
    Orders,

    /// Validate a contact form submission
    Contact(ContactArgs),

    /// Sign up for the newsletter
    Newsletter(NewsletterArgs),
}

/// Logs the cart badge count after each change.
#[derive(Debug, Clone, Copy, Default)]
struct CountLogger;

impl CartObserver for CountLogger {
    fn cart_changed(&self, _cart: &Cart, item_count: u64) {
        info!(item_count, "cart updated");
    }

    fn item_added(&self, item: &LineItem) {
        info!(product = %item.id, name = %item.name, "added to cart");
    }
}

/// Shared state for a single command invocation.
#[derive(Debug)]
pub(crate) struct Context<'a> {
    config: &'a CliConfig,
    store: CartStore<FileStorage>,
}

impl<'a> Context<'a> {
    fn open(config: &'a CliConfig) -> anyhow::Result<Self> {
        let storage = FileStorage::open(&config.storage.data_dir).with_context(|| {
            format!(
                "failed to open data directory {}",
                config.storage.data_dir.display()
            )
        })?;

        let store = CartStore::new(Arc::new(storage)).with_observer(Arc::new(CountLogger));

        Ok(Self { config, store })
    }

    pub(crate) fn store(&self) -> &CartStore<FileStorage> {
        &self.store
    }

    pub(crate) fn recorder(&self) -> OrderRecorder<FileStorage> {
        OrderRecorder::new(self.store.clone())
    }

    pub(crate) fn catalog(&self) -> anyhow::Result<Catalog> {
        let path = &self.config.storage.catalog;

        Catalog::from_path(path)
            .with_context(|| format!("failed to load catalog {}", path.display()))
    }
}

/// Run the configured command, writing its output to stdout.
///
/// # Errors
///
/// Returns an error if storage or the catalog cannot be opened, the command
/// is rejected, or output fails.
pub(crate) fn run(config: &CliConfig) -> anyhow::Result<()> {
    let ctx = Context::open(config)?;
    let mut out = io::stdout().lock();

    match &config.command {
        Command::Products(args) => products::run(&ctx, args, &mut out),
        Command::Cart { command } => cart::run(&ctx, command, &mut out),
        Command::Checkout(args) => checkout::run(&ctx, args, &mut out),
        Command::Orders => orders::run(&ctx, &mut out),
        Command::Contact(args) => contact::run(args, &mut out),
        Command::Newsletter(args) => newsletter::run(args, &mut out),
    }
}
