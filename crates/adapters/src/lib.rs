//! product-hash adapters crate
//!
//! This crate contains infrastructure adapters implementing the domain ports:
//! - `store`: SQLite and in-memory catalog stores
//! - `fixture`: JSON catalog fixtures for seeding a store

pub mod fixture;
mod store_memory;
mod store_sqlite;

/// Re-exports for catalog store adapters
pub mod store {
    pub use crate::fixture::CatalogWriter;
    pub use crate::store_memory::InMemoryCatalogStore;
    pub use crate::store_sqlite::SqliteCatalogStore;
}
