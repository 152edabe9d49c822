//! Port definitions (traits) for external dependencies
//!
//! These traits define the boundaries between the domain and the document
//! stores. Adapters implement these traits to connect to real infrastructure.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use time::OffsetDateTime;

use crate::media::MediaQuery;
use crate::model::{MediaRecord, ProductDocument, ProductHashUpdate};

/// Error type for document store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(error: serde_json::Error) -> Self {
        StoreError::Serialization(error.to_string())
    }
}

/// Port for the products collection (top-level products and variants)
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Find a product or variant by id
    async fn find_product(&self, id: &str) -> Result<Option<ProductDocument>, StoreError>;

    /// Find every `type: "variant"` document whose ancestors include `product_id`,
    /// in store order
    async fn find_variants(&self, product_id: &str) -> Result<Vec<ProductDocument>, StoreError>;

    /// Apply a hash update to a product; returns whether a document was written
    async fn update_product_hash(
        &self,
        product_id: &str,
        update: &ProductHashUpdate,
    ) -> Result<bool, StoreError>;
}

/// Port for the media records collection
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Return records matching the query, in the query's sort order
    async fn find_media(&self, query: &MediaQuery) -> Result<Vec<MediaRecord>, StoreError>;
}

/// Handles to the two collections product hashing reads from
#[derive(Clone)]
pub struct CatalogCollections {
    pub products: Arc<dyn ProductStore>,
    pub media: Arc<dyn MediaStore>,
}

impl CatalogCollections {
    pub fn new(products: Arc<dyn ProductStore>, media: Arc<dyn MediaStore>) -> Self {
        Self { products, media }
    }

    /// Use one store for both collections
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: ProductStore + MediaStore + 'static,
    {
        Self {
            products: store.clone(),
            media: store,
        }
    }
}

/// Port for time/clock operations (enables deterministic testing)
pub trait Clock: Send + Sync {
    /// Get the current time
    fn now(&self) -> OffsetDateTime;
}

/// Real clock implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}
