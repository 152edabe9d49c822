//! Allow-listed field projection for hashing

use serde_json::Value;

use crate::model::Document;

/// Product fields whose change requires the product to be republished
pub const PRODUCT_FIELDS_TO_HASH: [&str; 23] = [
    "_id",
    "description",
    "facebookMsg",
    "googleplusMsg",
    "handle",
    "hashtags",
    "isDeleted",
    "isVisible",
    "metaDescription",
    "metafields",
    "originCountry",
    "pageTitle",
    "parcel",
    "pinterestMsg",
    "productType",
    "publishedScope",
    "shopId",
    "supportedFulfillmentTypes",
    "template",
    "title",
    "twitterMsg",
    "type",
    "vendor",
];

/// Variant fields whose change requires the parent product to be republished
pub const VARIANT_FIELDS_TO_HASH: [&str; 19] = [
    "_id",
    "barcode",
    "compareAtPrice",
    "height",
    "index",
    "isDeleted",
    "isTaxable",
    "isVisible",
    "length",
    "metafields",
    "minOrderQuantity",
    "optionTitle",
    "originCountry",
    "price",
    "sku",
    "taxCode",
    "title",
    "weight",
    "width",
];

/// Copy exactly `fields` out of `document`.
///
/// Every listed key is present in the output; absent source fields become
/// `null`.
pub fn project_fields(document: &Document, fields: &[&str]) -> Document {
    fields
        .iter()
        .map(|field| {
            let value = document.get(*field).cloned().unwrap_or(Value::Null);
            (field.to_string(), value)
        })
        .collect()
}
