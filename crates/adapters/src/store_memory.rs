//! In-memory catalog store for testing and offline mode

use async_trait::async_trait;
use product_hash_domain::{
    MediaQuery, MediaRecord, MediaStore, ProductDocument, ProductHashUpdate, ProductStore,
    StoreError,
};
use std::sync::RwLock;

use crate::fixture::CatalogWriter;

/// In-memory catalog store implementation
///
/// Documents are kept in insertion order; replacing a document keeps its slot.
pub struct InMemoryCatalogStore {
    products: RwLock<Vec<ProductDocument>>,
    media: RwLock<Vec<MediaRecord>>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self {
            products: RwLock::new(Vec::new()),
            media: RwLock::new(Vec::new()),
        }
    }
}

impl Default for InMemoryCatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

fn lock_error(e: impl std::fmt::Display) -> StoreError {
    StoreError::Database(e.to_string())
}

#[async_trait]
impl ProductStore for InMemoryCatalogStore {
    async fn find_product(&self, id: &str) -> Result<Option<ProductDocument>, StoreError> {
        let products = self.products.read().map_err(lock_error)?;
        Ok(products.iter().find(|p| p.id() == id).cloned())
    }

    async fn find_variants(&self, product_id: &str) -> Result<Vec<ProductDocument>, StoreError> {
        let products = self.products.read().map_err(lock_error)?;
        Ok(products
            .iter()
            .filter(|p| p.doc_type() == Some(ProductDocument::VARIANT_TYPE))
            .filter(|p| p.has_ancestor(product_id))
            .cloned()
            .collect())
    }

    async fn update_product_hash(
        &self,
        product_id: &str,
        update: &ProductHashUpdate,
    ) -> Result<bool, StoreError> {
        let patch = update.to_document()?;
        let mut products = self.products.write().map_err(lock_error)?;

        match products.iter_mut().find(|p| p.id() == product_id) {
            Some(product) => {
                product.merge(patch);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl MediaStore for InMemoryCatalogStore {
    async fn find_media(&self, query: &MediaQuery) -> Result<Vec<MediaRecord>, StoreError> {
        let media = self.media.read().map_err(lock_error)?;
        let mut records: Vec<_> = media.iter().filter(|m| query.matches(m)).cloned().collect();
        records.sort_by(MediaQuery::compare);
        Ok(records)
    }
}

#[async_trait]
impl CatalogWriter for InMemoryCatalogStore {
    async fn upsert_product(&self, product: &ProductDocument) -> Result<(), StoreError> {
        let mut products = self.products.write().map_err(lock_error)?;
        match products.iter_mut().find(|p| p.id() == product.id()) {
            Some(existing) => *existing = product.clone(),
            None => products.push(product.clone()),
        }
        Ok(())
    }

    async fn upsert_media(&self, record: &MediaRecord) -> Result<(), StoreError> {
        let mut media = self.media.write().map_err(lock_error)?;
        match media.iter_mut().find(|m| m.id == record.id) {
            Some(existing) => *existing = record.clone(),
            None => media.push(record.clone()),
        }
        Ok(())
    }
}
