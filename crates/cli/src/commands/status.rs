//! Status command - report stored hashes and unpublished changes

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::args::StatusArgs;
use crate::catalog::Catalog;
use crate::config::AppConfig;

pub async fn execute(args: StatusArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;
    let catalog = Catalog::open(&config, &args.store).await?;

    let state = catalog
        .updater()
        .publish_state(&args.product_id)
        .await
        .with_context(|| format!("Failed to read product {}", args.product_id))?;

    if args.json {
        let output = serde_json::json!({
            "product_id": state.product_id,
            "current_product_hash": state.current_product_hash,
            "published_product_hash": state.published_product_hash,
            "has_unpublished_changes": state.has_unpublished_changes(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("Product: {}", state.product_id);
        println!(
            "  Current:   {}",
            state.current_product_hash.as_deref().unwrap_or("-")
        );
        println!(
            "  Published: {}",
            state.published_product_hash.as_deref().unwrap_or("-")
        );
        if state.has_unpublished_changes() {
            println!("⚠ Unpublished changes");
        } else {
            println!("✓ Up to date");
        }
    }

    Ok(())
}
