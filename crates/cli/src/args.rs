//! CLI argument definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// product-hash: compute and record catalog product content hashes
#[derive(Parser, Debug)]
#[command(name = "product-hash")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute a product's content hash without writing it
    Hash(HashArgs),

    /// Recompute a product's hash and record it on the product
    Update(UpdateArgs),

    /// Show whether a product has unpublished changes
    Status(StatusArgs),

    /// Load a JSON catalog fixture into the store
    Import(ImportArgs),

    /// Configuration management
    Config(ConfigArgs),

    /// Validate configuration and show status
    Doctor(DoctorArgs),
}

/// Store selection shared by catalog commands
#[derive(Args, Debug, Clone, Default)]
pub struct StoreArgs {
    /// Override the SQLite database path
    #[arg(long)]
    pub db_path: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct HashArgs {
    /// Product or variant id
    pub product_id: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub store: StoreArgs,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Product or variant id
    pub product_id: String,

    /// Record the hash as current only, leaving the published hash untouched
    #[arg(long)]
    pub unpublished: bool,

    /// Output the updated product as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub store: StoreArgs,
}

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Product or variant id
    pub product_id: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub store: StoreArgs,
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Fixture file: {"products": [...], "media": [...]}
    pub file: PathBuf,

    #[command(flatten)]
    pub store: StoreArgs,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Init {
        /// Path to write config file
        #[arg(long, default_value = "./product-hash.toml")]
        path: PathBuf,

        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration
    Show,
}

#[derive(Args, Debug)]
pub struct DoctorArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
