//! Essentae storefront CLI

use std::process;

use tracing::error;

use crate::config::CliConfig;

mod commands;
mod config;
mod logging;

/// Essentae CLI entry point
pub fn main() {
    // Prints help, version or the parse error and exits.
    let config = CliConfig::load().unwrap_or_else(|e| e.exit());

    if let Err(e) = logging::init(&config.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized, must use eprintln for setup errors"
        )]
        {
            eprintln!("Logging error: {e}");
        }

        process::exit(1);
    }

    if let Err(e) = commands::run(&config) {
        error!("{e:#}");

        process::exit(1);
    }
}
