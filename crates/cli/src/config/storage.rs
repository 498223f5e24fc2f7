//! Storage Config

use std::path::PathBuf;

use clap::Args;

/// Where the storefront keeps its data.
#[derive(Debug, Args)]
pub struct StorageConfig {
    /// Directory holding the persisted cart and order log
    #[arg(long, env = "ESSENTAE_DATA_DIR", default_value = ".essentae", global = true)]
    pub data_dir: PathBuf,

    /// Product catalog file (JSON or YAML)
    #[arg(
        long,
        env = "ESSENTAE_CATALOG",
        default_value = "assets/data/products.json",
        global = true
    )]
    pub catalog: PathBuf,
}
