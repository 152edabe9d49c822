//! Product content hashing
//!
//! A product hash is the SHA-256 of the canonical JSON form of a projection of
//! the product, its variants and its active media. Canonical JSON sorts object
//! keys recursively, so the digest does not depend on the key order of the
//! source documents; array order is significant.

use serde_json::{Number, Value};
use sha2::{Digest, Sha256};

use crate::media::collect_media;
use crate::model::{Document, MediaEntry, ProductDocument};
use crate::ports::{CatalogCollections, StoreError};
use crate::projection::{PRODUCT_FIELDS_TO_HASH, VARIANT_FIELDS_TO_HASH, project_fields};

/// Build the object a product hash is computed over
pub fn compose_product_for_hashing(
    product: &ProductDocument,
    variants: &[ProductDocument],
    media: &[MediaEntry],
) -> Document {
    let mut for_hashing = project_fields(product.fields(), &PRODUCT_FIELDS_TO_HASH);

    let media: Vec<Value> = media
        .iter()
        .map(|entry| {
            serde_json::json!({
                "id": entry.id,
                "priority": entry.priority,
            })
        })
        .collect();
    for_hashing.insert("media".to_string(), Value::Array(media));

    let variants: Vec<Value> = variants
        .iter()
        .map(|variant| Value::Object(project_fields(variant.fields(), &VARIANT_FIELDS_TO_HASH)))
        .collect();
    for_hashing.insert("variants".to_string(), Value::Array(variants));

    for_hashing
}

/// Hash a product projection from already-loaded documents
pub fn compute_product_hash(
    product: &ProductDocument,
    variants: &[ProductDocument],
    media: &[MediaEntry],
) -> String {
    digest_document(&compose_product_for_hashing(product, variants, media))
}

/// SHA-256 of a document's canonical JSON, as lowercase hex
pub fn digest_document(document: &Document) -> String {
    let mut canonical = String::new();
    write_canonical_object(document, &mut canonical);

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Canonical JSON of a value: compact, object keys sorted
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => write_canonical_object(map, out),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        Value::Number(number) => write_canonical_number(number, out),
        scalar => out.push_str(&scalar.to_string()),
    }
}

/// Integral floats within the exact-integer range render as integers, so
/// `20` and `20.0` share a canonical form
fn write_canonical_number(number: &Number, out: &mut String) {
    const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

    match number.as_f64() {
        Some(value)
            if number.is_f64() && value.fract() == 0.0 && value.abs() <= MAX_EXACT_INTEGER =>
        {
            out.push_str(&(value as i64).to_string());
        }
        _ => out.push_str(&number.to_string()),
    }
}

fn write_canonical_object(map: &Document, out: &mut String) {
    let mut entries: Vec<_> = map.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    out.push('{');
    for (i, (key, value)) in entries.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&Value::String(key.clone()).to_string());
        out.push(':');
        write_canonical(value, out);
    }
    out.push('}');
}

/// Read the variants and active media of a top-level product and hash them
/// together with the product
pub async fn hash_top_level_product(
    collections: &CatalogCollections,
    product: &ProductDocument,
) -> Result<String, StoreError> {
    let variants = collections.products.find_variants(product.id()).await?;
    let media = collect_media(collections.media.as_ref(), product.id()).await?;

    let hash = compute_product_hash(product, &variants, &media);

    tracing::debug!(
        product_id = %product.id(),
        variant_count = variants.len(),
        media_count = media.len(),
        hash = %hash,
        "Computed product hash"
    );

    Ok(hash)
}
