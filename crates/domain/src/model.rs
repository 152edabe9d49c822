//! Domain models and value objects

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use time::OffsetDateTime;

/// A schemaless catalog document
pub type Document = Map<String, Value>;

/// Error raised when a raw document cannot become a catalog entity
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DocumentError {
    #[error("Document has no string `_id`")]
    MissingId,
}

/// A product or variant document from the catalog
///
/// Top-level products and their variants share one collection; they are told
/// apart by the `type` key and linked through `ancestors`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Document", into = "Document")]
pub struct ProductDocument(Document);

impl ProductDocument {
    /// `type` value carried by variants and options
    pub const VARIANT_TYPE: &'static str = "variant";

    /// Wrap a raw document, requiring a string `_id`
    pub fn new(document: Document) -> Result<Self, DocumentError> {
        match document.get("_id") {
            Some(Value::String(_)) => Ok(Self(document)),
            _ => Err(DocumentError::MissingId),
        }
    }

    pub fn id(&self) -> &str {
        self.0
            .get("_id")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    pub fn doc_type(&self) -> Option<&str> {
        self.0.get("type").and_then(Value::as_str)
    }

    /// Whether this document is the root of a variant tree
    pub fn is_top_level(&self) -> bool {
        self.doc_type() != Some(Self::VARIANT_TYPE)
    }

    pub fn is_variant(&self) -> bool {
        !self.is_top_level()
    }

    /// Ancestor ids, nearest-to-root first
    pub fn ancestors(&self) -> impl Iterator<Item = &str> {
        self.0
            .get("ancestors")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_str)
    }

    pub fn has_ancestor(&self, id: &str) -> bool {
        self.ancestors().any(|ancestor| ancestor == id)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Set a field; `_id` is immutable and silently kept
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        if key != "_id" {
            self.0.insert(key, value);
        }
    }

    pub fn fields(&self) -> &Document {
        &self.0
    }

    pub fn into_document(self) -> Document {
        self.0
    }

    pub fn current_product_hash(&self) -> Option<&str> {
        self.0.get("currentProductHash").and_then(Value::as_str)
    }

    pub fn published_product_hash(&self) -> Option<&str> {
        self.0.get("publishedProductHash").and_then(Value::as_str)
    }

    /// Shallow-merge a patch into this document
    pub fn merge(&mut self, patch: Document) {
        for (key, value) in patch {
            self.set(key, value);
        }
    }
}

impl TryFrom<Document> for ProductDocument {
    type Error = DocumentError;

    fn try_from(document: Document) -> Result<Self, Self::Error> {
        Self::new(document)
    }
}

impl From<ProductDocument> for Document {
    fn from(product: ProductDocument) -> Self {
        product.0
    }
}

/// Metadata block of a media record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaMetadata {
    /// Product the media belongs to; shop-level assets have none
    #[serde(rename = "productId", default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    /// Lifecycle tag (`archived`, `unpublished`, or an active state)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow: Option<String>,
    /// Display ordering; lower first
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
    #[serde(flatten)]
    pub extra: Document,
}

/// An uploaded media file attached to a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub metadata: MediaMetadata,
    #[serde(
        rename = "uploadedAt",
        default,
        skip_serializing_if = "Option::is_none",
        with = "time::serde::rfc3339::option"
    )]
    pub uploaded_at: Option<OffsetDateTime>,
    #[serde(flatten)]
    pub extra: Document,
}

/// The id/priority pair a media record contributes to a product hash
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaEntry {
    pub id: String,
    pub priority: Option<i64>,
}

impl From<&MediaRecord> for MediaEntry {
    fn from(record: &MediaRecord) -> Self {
        Self {
            id: record.id.clone(),
            priority: record.metadata.priority,
        }
    }
}

/// Fields written back onto a top-level product after hashing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductHashUpdate {
    #[serde(rename = "currentProductHash")]
    pub current_product_hash: String,
    #[serde(
        rename = "publishedProductHash",
        skip_serializing_if = "Option::is_none"
    )]
    pub published_product_hash: Option<String>,
    #[serde(rename = "updatedAt", with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl ProductHashUpdate {
    /// Build the update; the published hash is only set when publishing
    pub fn new(hash: String, is_published: bool, updated_at: OffsetDateTime) -> Self {
        Self {
            published_product_hash: is_published.then(|| hash.clone()),
            current_product_hash: hash,
            updated_at,
        }
    }

    /// Render as a document patch (`currentProductHash`, `updatedAt`, ...)
    pub fn to_document(&self) -> Result<Document, serde_json::Error> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(serde::ser::Error::custom(format!(
                "expected object, got {other}"
            ))),
        }
    }
}

/// Publish status of a top-level product
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishState {
    pub product_id: String,
    pub current_product_hash: Option<String>,
    pub published_product_hash: Option<String>,
}

impl PublishState {
    /// True when the catalog holds changes that have not been published
    pub fn has_unpublished_changes(&self) -> bool {
        match (&self.current_product_hash, &self.published_product_hash) {
            (Some(current), Some(published)) => current != published,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }
}

impl From<&ProductDocument> for PublishState {
    fn from(product: &ProductDocument) -> Self {
        Self {
            product_id: product.id().to_string(),
            current_product_hash: product.current_product_hash().map(str::to_string),
            published_product_hash: product.published_product_hash().map(str::to_string),
        }
    }
}
