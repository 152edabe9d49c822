//! Hash command - compute a product hash without writing it

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::args::HashArgs;
use crate::catalog::Catalog;
use crate::config::AppConfig;

pub async fn execute(args: HashArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;
    let catalog = Catalog::open(&config, &args.store).await?;

    let hash = catalog
        .updater()
        .compute_hash(&args.product_id)
        .await
        .with_context(|| format!("Failed to hash product {}", args.product_id))?;

    if args.json {
        let output = serde_json::json!({
            "product_id": args.product_id,
            "hash": hash,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", hash);
    }

    Ok(())
}
