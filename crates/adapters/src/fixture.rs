//! JSON catalog fixtures for seeding a store

use async_trait::async_trait;
use product_hash_domain::{MediaRecord, ProductDocument, StoreError};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error in {file}: {message}")]
    Parse { file: String, message: String },
    #[error("Duplicate {kind} id '{id}'")]
    DuplicateId { kind: &'static str, id: String },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Stores that can be seeded with documents
#[async_trait]
pub trait CatalogWriter: Send + Sync {
    /// Insert or replace a product/variant document by `_id`
    async fn upsert_product(&self, product: &ProductDocument) -> Result<(), StoreError>;

    /// Insert or replace a media record by `_id`
    async fn upsert_media(&self, record: &MediaRecord) -> Result<(), StoreError>;
}

/// A catalog snapshot: `{ "products": [...], "media": [...] }`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogFixture {
    #[serde(default)]
    pub products: Vec<ProductDocument>,
    #[serde(default)]
    pub media: Vec<MediaRecord>,
}

/// Counts of documents written by an import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub products: usize,
    pub media: usize,
}

impl CatalogFixture {
    /// Parse and validate a fixture file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await?;
        Self::parse(&content, &path.display().to_string())
    }

    /// Parse and validate fixture JSON; `source` names it in errors
    pub fn parse(content: &str, source: &str) -> Result<Self, FixtureError> {
        let fixture: Self = serde_json::from_str(content).map_err(|e| FixtureError::Parse {
            file: source.to_string(),
            message: e.to_string(),
        })?;
        fixture.validate()?;
        Ok(fixture)
    }

    fn validate(&self) -> Result<(), FixtureError> {
        let mut seen = HashSet::new();
        for product in &self.products {
            if !seen.insert(product.id()) {
                return Err(FixtureError::DuplicateId {
                    kind: "product",
                    id: product.id().to_string(),
                });
            }
        }

        let mut seen = HashSet::new();
        for record in &self.media {
            if !seen.insert(record.id.as_str()) {
                return Err(FixtureError::DuplicateId {
                    kind: "media",
                    id: record.id.clone(),
                });
            }
        }

        Ok(())
    }

    /// Write every document into `store`, in fixture order
    pub async fn import_into<W>(&self, store: &W) -> Result<ImportSummary, FixtureError>
    where
        W: CatalogWriter + ?Sized,
    {
        for product in &self.products {
            store.upsert_product(product).await?;
        }
        for record in &self.media {
            store.upsert_media(record).await?;
        }

        let summary = ImportSummary {
            products: self.products.len(),
            media: self.media.len(),
        };

        tracing::info!(
            products = summary.products,
            media = summary.media,
            "Imported catalog fixture"
        );

        Ok(summary)
    }
}
