//! Import command - seed the store from a catalog fixture

use anyhow::{Context, Result};
use product_hash_adapters::fixture::CatalogFixture;
use std::path::PathBuf;

use crate::args::ImportArgs;
use crate::catalog::Catalog;
use crate::config::AppConfig;

pub async fn execute(args: ImportArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;
    let catalog = Catalog::open(&config, &args.store).await?;

    if !catalog.is_persistent() {
        tracing::warn!("Memory store in use; imported documents will not be kept");
    }

    let fixture = CatalogFixture::load(&args.file)
        .await
        .with_context(|| format!("Failed to load fixture: {}", args.file.display()))?;

    let summary = fixture
        .import_into(catalog.writer())
        .await
        .context("Import failed")?;

    match &catalog {
        Catalog::Sqlite { path, .. } => println!(
            "Imported {} products and {} media records into {}",
            summary.products,
            summary.media,
            path.display()
        ),
        Catalog::Memory(_) => println!(
            "Imported {} products and {} media records into memory",
            summary.products, summary.media
        ),
    }

    Ok(())
}
