//! Products command

use std::io;

use clap::Args;
use essentae::{catalog::FEATURED_COUNT, prelude::*};

use super::Context;

/// Catalog listing options.
#[derive(Debug, Args)]
pub struct ProductsArgs {
    /// Category to show (`all` for every category)
    #[arg(long, default_value = "all")]
    category: CategoryFilter,

    /// Case-insensitive search across name, description and category
    #[arg(long, default_value = "")]
    search: String,

    /// Sort order (default, price-low, price-high, name)
    #[arg(long, default_value = "default")]
    sort: SortOrder,

    /// Show the featured selection (the first N products) instead
    #[arg(long, conflicts_with_all = ["category", "search", "sort"])]
    featured: Option<Option<usize>>,
}

pub(super) fn run(
    ctx: &Context<'_>,
    args: &ProductsArgs,
    out: &mut impl io::Write,
) -> anyhow::Result<()> {
    let catalog = ctx.catalog()?;

    if let Some(count) = args.featured {
        write_products(out, catalog.featured(count.unwrap_or(FEATURED_COUNT)))?;

        return Ok(());
    }

    let query = ProductQuery {
        category: args.category.clone(),
        search: args.search.clone(),
        sort: args.sort,
    };

    write_products(out, catalog.query(&query))?;

    Ok(())
}
