//! Publish-state use case - recompute and record product hashes

use std::sync::Arc;

use thiserror::Error;

use crate::{
    hashing::hash_top_level_product,
    model::{ProductDocument, ProductHashUpdate, PublishState},
    ports::{CatalogCollections, Clock, ProductStore, StoreError},
};

/// Error type for product hashing
#[derive(Debug, Error)]
pub enum HashProductError {
    #[error("No top-level product found for id {0}")]
    NotFound(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Resolve the top-level product for a product or variant id.
///
/// A top-level product resolves to itself; a variant or option resolves to the
/// first entry of its `ancestors`.
pub async fn get_top_level_product<P>(
    products: &P,
    product_or_variant_id: &str,
) -> Result<ProductDocument, HashProductError>
where
    P: ProductStore + ?Sized,
{
    let not_found = || HashProductError::NotFound(product_or_variant_id.to_string());

    let product = products
        .find_product(product_or_variant_id)
        .await?
        .ok_or_else(not_found)?;

    if product.is_top_level() {
        return Ok(product);
    }

    let root_id = product.ancestors().next().ok_or_else(not_found)?;
    products
        .find_product(root_id)
        .await?
        .filter(ProductDocument::is_top_level)
        .ok_or_else(not_found)
}

/// Recomputes product hashes and writes them back to the products collection
///
/// Calls are not coordinated: two updates for the same product race and the
/// last write wins.
pub struct PublishStateUpdater<Cl: Clock + ?Sized> {
    collections: CatalogCollections,
    clock: Arc<Cl>,
}

impl<Cl: Clock + ?Sized> PublishStateUpdater<Cl> {
    pub fn new(collections: CatalogCollections, clock: Arc<Cl>) -> Self {
        Self { collections, clock }
    }

    /// Compute the current hash of a product without writing it
    pub async fn compute_hash(&self, product_id: &str) -> Result<String, HashProductError> {
        let top_level = get_top_level_product(self.collections.products.as_ref(), product_id).await?;
        Ok(hash_top_level_product(&self.collections, &top_level).await?)
    }

    /// Recompute a product's hash and record it.
    ///
    /// `currentProductHash` and `updatedAt` are always written;
    /// `publishedProductHash` only when `is_published`. Returns the top-level
    /// product merged with the update, or `None` when the store reports that
    /// nothing was written.
    pub async fn hash_product(
        &self,
        product_id: &str,
        is_published: bool,
    ) -> Result<Option<ProductDocument>, HashProductError> {
        let mut top_level =
            get_top_level_product(self.collections.products.as_ref(), product_id).await?;
        let hash = hash_top_level_product(&self.collections, &top_level).await?;

        let update = ProductHashUpdate::new(hash, is_published, self.clock.now());
        let patch = update.to_document().map_err(StoreError::from)?;

        let written = self
            .collections
            .products
            .update_product_hash(top_level.id(), &update)
            .await?;

        if !written {
            tracing::warn!(
                product_id = %top_level.id(),
                "Product hash update reported no write"
            );
            return Ok(None);
        }

        tracing::info!(
            product_id = %top_level.id(),
            hash = %update.current_product_hash,
            is_published = is_published,
            "Recorded product hash"
        );

        top_level.merge(patch);
        Ok(Some(top_level))
    }

    /// Report the stored hashes of a product's top-level document
    pub async fn publish_state(&self, product_id: &str) -> Result<PublishState, HashProductError> {
        let top_level = get_top_level_product(self.collections.products.as_ref(), product_id).await?;
        Ok(PublishState::from(&top_level))
    }
}
