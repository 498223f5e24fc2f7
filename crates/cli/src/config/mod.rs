//! Command-line configuration

use clap::Parser;

use crate::{
    commands::Command,
    config::{logging::LoggingConfig, storage::StorageConfig},
};

pub(crate) mod logging;
pub(crate) mod storage;

/// Essentae storefront command-line interface
#[derive(Debug, Parser)]
#[command(name = "essentae", about = "Essentae fragrance storefront", long_about = None)]
pub struct CliConfig {
    /// Data directory and catalog settings.
    #[command(flatten)]
    pub storage: StorageConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

impl CliConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use testresult::TestResult;

    use crate::{
        commands::{CartCommand, Command},
        config::logging::LogFormat,
    };

    use super::*;

    #[test]
    fn global_options_precede_the_command() -> TestResult {
        let config = CliConfig::try_parse_from([
            "essentae",
            "--data-dir",
            "/tmp/essentae",
            "--log-format",
            "json",
            "cart",
            "add",
            "7",
            "--quantity",
            "2",
        ])?;

        assert_eq!(config.storage.data_dir, Path::new("/tmp/essentae"));
        assert!(matches!(config.logging.log_format, LogFormat::Json));
        assert!(
            matches!(
                config.command,
                Command::Cart {
                    command: CartCommand::Add { ref id, quantity: 2 }
                } if id == "7"
            ),
            "unexpected command {:?}",
            config.command
        );

        Ok(())
    }

    #[test]
    fn negative_delta_is_accepted() -> TestResult {
        let config = CliConfig::try_parse_from(["essentae", "cart", "update", "0", "-1"])?;

        assert!(
            matches!(
                config.command,
                Command::Cart {
                    command: CartCommand::Update { index: 0, delta: -1 }
                }
            ),
            "unexpected command {:?}",
            config.command
        );

        Ok(())
    }

    #[test]
    fn newsletter_requires_an_email() {
        let missing = CliConfig::try_parse_from(["essentae", "newsletter"]);
        let given = CliConfig::try_parse_from(["essentae", "newsletter", "--email", "a@b.pk"]);

        assert!(missing.is_err(), "expected --email to be required");
        assert!(
            matches!(given.map(|config| config.command), Ok(Command::Newsletter(_))),
            "expected the newsletter command to parse"
        );
    }

    #[test]
    fn unknown_sort_order_is_rejected() {
        let result = CliConfig::try_parse_from(["essentae", "products", "--sort", "random"]);

        assert!(result.is_err(), "expected an unknown sort order to fail");
    }
}
