//! product-hash domain crate
//!
//! This crate contains the core domain logic following hexagonal architecture:
//! - `model`: Catalog documents and value objects
//! - `ports`: Trait definitions for the document stores (adapters)
//! - `projection`: Allow-listed field projection
//! - `media`: Active media collection
//! - `hashing`: Canonical product content hashing
//! - `usecases`: Hash recomputation and publish-state tracking

pub mod hashing;
pub mod media;
pub mod model;
pub mod ports;
pub mod projection;
pub mod usecases;

pub use hashing::compute_product_hash;
pub use media::MediaQuery;
pub use model::*;
pub use ports::*;
