//! Update command - recompute and record a product hash

use anyhow::{Context, Result, bail};
use std::path::PathBuf;

use crate::args::UpdateArgs;
use crate::catalog::Catalog;
use crate::config::AppConfig;

pub async fn execute(args: UpdateArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;
    let catalog = Catalog::open(&config, &args.store).await?;

    if !catalog.is_persistent() {
        tracing::warn!("Memory store in use; the update will not outlive this process");
    }

    let is_published = !args.unpublished;
    let updated = catalog
        .updater()
        .hash_product(&args.product_id, is_published)
        .await
        .with_context(|| format!("Failed to update hash for product {}", args.product_id))?;

    let Some(product) = updated else {
        bail!(
            "Hash update for product {} was not written",
            args.product_id
        );
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&product)?);
    } else {
        println!("Product: {}", product.id());
        println!(
            "  currentProductHash:   {}",
            product.current_product_hash().unwrap_or("-")
        );
        println!(
            "  publishedProductHash: {}",
            product.published_product_hash().unwrap_or("-")
        );
    }

    Ok(())
}
