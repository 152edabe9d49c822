//! SQLite catalog store implementation
//!
//! Documents are stored as JSON text. Product queries go through the SQLite
//! JSON1 functions; media records also carry denormalized columns for the
//! fields the active-media query filters and sorts on.

use async_trait::async_trait;
use product_hash_domain::{
    MediaQuery, MediaRecord, MediaStore, ProductDocument, ProductHashUpdate, ProductStore,
    StoreError,
};
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use std::path::Path;

use crate::fixture::CatalogWriter;

/// SQLite-backed catalog store
pub struct SqliteCatalogStore {
    pool: SqlitePool,
}

impl SqliteCatalogStore {
    /// Create a new SQLite catalog store, initializing the database if needed
    pub async fn new(db_path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let db_path = db_path.as_ref();

        // Create parent directories if needed
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StoreError::Database(format!("Failed to create directory: {}", e))
                })?;
            }
        }

        let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&db_url)
            .await
            .map_err(db_error)?;

        let store = Self { pool };
        store.run_migrations().await?;

        Ok(store)
    }

    /// Create an in-memory SQLite store (for testing)
    pub async fn in_memory() -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(db_error)?;

        let store = Self { pool };
        store.run_migrations().await?;

        Ok(store)
    }

    async fn run_migrations(&self) -> Result<(), StoreError> {
        // `seq` preserves insertion order across upserts
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS products (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                doc TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS media_records (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                product_id TEXT,
                workflow TEXT,
                priority INTEGER,
                uploaded_at_ns INTEGER,
                doc TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_media_product
            ON media_records(product_id, priority, uploaded_at_ns)
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(())
    }

    /// Round-trip a trivial query to check the connection
    pub async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(())
    }

    /// Number of `(products, media_records)` rows
    pub async fn counts(&self) -> Result<(i64, i64), StoreError> {
        let products: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await
            .map_err(db_error)?;
        let media: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM media_records")
            .fetch_one(&self.pool)
            .await
            .map_err(db_error)?;
        Ok((products.0, media.0))
    }
}

fn db_error(e: sqlx::Error) -> StoreError {
    StoreError::Database(e.to_string())
}

fn parse_product(doc: &str) -> Result<ProductDocument, StoreError> {
    Ok(serde_json::from_str(doc)?)
}

fn parse_media(doc: &str) -> Result<MediaRecord, StoreError> {
    Ok(serde_json::from_str(doc)?)
}

#[async_trait]
impl ProductStore for SqliteCatalogStore {
    async fn find_product(&self, id: &str) -> Result<Option<ProductDocument>, StoreError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT doc FROM products WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

        row.map(|(doc,)| parse_product(&doc)).transpose()
    }

    async fn find_variants(&self, product_id: &str) -> Result<Vec<ProductDocument>, StoreError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT doc FROM products
            WHERE json_extract(doc, '$.type') = ?
              AND json_type(doc, '$.ancestors') = 'array'
              AND EXISTS (
                  SELECT 1 FROM json_each(products.doc, '$.ancestors')
                  WHERE json_each.value = ?
              )
            ORDER BY seq
            "#,
        )
        .bind(ProductDocument::VARIANT_TYPE)
        .bind(product_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        rows.iter().map(|(doc,)| parse_product(doc)).collect()
    }

    async fn update_product_hash(
        &self,
        product_id: &str,
        update: &ProductHashUpdate,
    ) -> Result<bool, StoreError> {
        let patch = serde_json::to_string(&update.to_document()?)?;

        let result = sqlx::query("UPDATE products SET doc = json_patch(doc, ?) WHERE id = ?")
            .bind(&patch)
            .bind(product_id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(result.rows_affected() == 1)
    }
}

#[async_trait]
impl MediaStore for SqliteCatalogStore {
    async fn find_media(&self, query: &MediaQuery) -> Result<Vec<MediaRecord>, StoreError> {
        let placeholders = vec!["?"; query.excluded_workflows.len()].join(", ");
        let workflow_filter = if placeholders.is_empty() {
            String::new()
        } else {
            format!("AND (workflow IS NULL OR workflow NOT IN ({placeholders}))")
        };

        // NULLs sort first in ascending order, like missing fields
        let sql = format!(
            r#"
            SELECT doc FROM media_records
            WHERE product_id = ? {workflow_filter}
            ORDER BY priority ASC, uploaded_at_ns ASC, seq ASC
            "#
        );

        let mut statement = sqlx::query_as::<_, (String,)>(&sql).bind(&query.product_id);
        for workflow in &query.excluded_workflows {
            statement = statement.bind(workflow);
        }

        let rows = statement.fetch_all(&self.pool).await.map_err(db_error)?;

        rows.iter().map(|(doc,)| parse_media(doc)).collect()
    }
}

#[async_trait]
impl CatalogWriter for SqliteCatalogStore {
    async fn upsert_product(&self, product: &ProductDocument) -> Result<(), StoreError> {
        let doc = serde_json::to_string(product)?;

        sqlx::query(
            r#"
            INSERT INTO products (id, doc) VALUES (?, ?)
            ON CONFLICT(id) DO UPDATE SET doc = excluded.doc
            "#,
        )
        .bind(product.id())
        .bind(&doc)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(())
    }

    async fn upsert_media(&self, record: &MediaRecord) -> Result<(), StoreError> {
        let doc = serde_json::to_string(record)?;
        let uploaded_at_ns = record
            .uploaded_at
            .and_then(|t| i64::try_from(t.unix_timestamp_nanos()).ok());

        sqlx::query(
            r#"
            INSERT INTO media_records (id, product_id, workflow, priority, uploaded_at_ns, doc)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                product_id = excluded.product_id,
                workflow = excluded.workflow,
                priority = excluded.priority,
                uploaded_at_ns = excluded.uploaded_at_ns,
                doc = excluded.doc
            "#,
        )
        .bind(&record.id)
        .bind(&record.metadata.product_id)
        .bind(&record.metadata.workflow)
        .bind(record.metadata.priority)
        .bind(uploaded_at_ns)
        .bind(&doc)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::CatalogFixture;
    use crate::store_memory::InMemoryCatalogStore;
    use product_hash_domain::{CatalogCollections, Clock, usecases::PublishStateUpdater};
    use std::sync::Arc;
    use tempfile::TempDir;
    use time::OffsetDateTime;
    use time::macros::datetime;

    const FIXTURE: &str = r#"{
        "products": [
            { "_id": "P1", "type": "simple", "title": "Shirt", "vendor": "Acme" },
            { "_id": "V1", "type": "variant", "ancestors": ["P1"], "sku": "SH-1", "price": 20 },
            { "_id": "V2", "type": "variant", "ancestors": ["P1"], "sku": "SH-2", "isDeleted": true },
            { "_id": "P2", "type": "simple", "title": "Hat" },
            { "_id": "V3", "type": "variant", "ancestors": ["P2"], "sku": "HAT-1" }
        ],
        "media": [
            { "_id": "M3", "metadata": { "productId": "P1", "workflow": "published" } },
            { "_id": "M2", "uploadedAt": "2024-02-01T00:00:00Z",
              "metadata": { "productId": "P1", "workflow": "published", "priority": 1 } },
            { "_id": "M1", "uploadedAt": "2024-01-01T00:00:00.5Z",
              "metadata": { "productId": "P1", "workflow": "published", "priority": 1 } },
            { "_id": "M4", "metadata": { "productId": "P1", "workflow": "archived", "priority": 0 } },
            { "_id": "M5", "metadata": { "productId": "P1", "workflow": "unpublished", "priority": 0 } },
            { "_id": "M6", "metadata": { "productId": "P1", "priority": 2 } }
        ]
    }"#;

    struct FixedClock;

    impl Clock for FixedClock {
        fn now(&self) -> OffsetDateTime {
            datetime!(2024-05-01 10:00 UTC)
        }
    }

    async fn seeded() -> SqliteCatalogStore {
        let store = SqliteCatalogStore::in_memory().await.unwrap();
        CatalogFixture::parse(FIXTURE, "inline")
            .unwrap()
            .import_into(&store)
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_product_roundtrip() {
        let store = seeded().await;

        let product = store.find_product("P1").await.unwrap().unwrap();
        assert_eq!(product.get("vendor").and_then(|v| v.as_str()), Some("Acme"));

        assert!(store.find_product("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_variants_uses_ancestry() {
        let store = seeded().await;

        let ids: Vec<_> = store
            .find_variants("P1")
            .await
            .unwrap()
            .iter()
            .map(|v| v.id().to_string())
            .collect();
        assert_eq!(ids, vec!["V1", "V2"]);
    }

    #[tokio::test]
    async fn test_find_variants_requires_ancestor_array() {
        let store = seeded().await;
        let scalar = serde_json::json!({ "_id": "V9", "type": "variant", "ancestors": "P1" });
        store
            .upsert_product(&serde_json::from_value(scalar).unwrap())
            .await
            .unwrap();

        let ids: Vec<_> = store
            .find_variants("P1")
            .await
            .unwrap()
            .iter()
            .map(|v| v.id().to_string())
            .collect();
        assert_eq!(ids, vec!["V1", "V2"]);
    }

    #[tokio::test]
    async fn test_media_without_product_is_stored_and_ignored() {
        let store = seeded().await;
        let asset = serde_json::json!({ "_id": "B1", "metadata": { "shopId": "S1", "priority": 0 } });
        store
            .upsert_media(&serde_json::from_value(asset).unwrap())
            .await
            .unwrap();

        assert_eq!(store.counts().await.unwrap().1, 7);
        let ids: Vec<_> = store
            .find_media(&MediaQuery::active_for_product("P1"))
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, vec!["M3", "M1", "M2", "M6"]);
    }

    #[tokio::test]
    async fn test_find_media_matches_query_order() {
        let store = seeded().await;

        let ids: Vec<_> = store
            .find_media(&MediaQuery::active_for_product("P1"))
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, vec!["M3", "M1", "M2", "M6"]);
    }

    #[tokio::test]
    async fn test_update_reports_rows_written() {
        let store = seeded().await;
        let update = ProductHashUpdate::new("abc".to_string(), false, FixedClock.now());

        assert!(store.update_product_hash("P1", &update).await.unwrap());
        assert!(!store.update_product_hash("missing", &update).await.unwrap());

        let product = store.find_product("P1").await.unwrap().unwrap();
        assert_eq!(product.current_product_hash(), Some("abc"));
        assert!(product.published_product_hash().is_none());
        assert_eq!(product.get("title").and_then(|v| v.as_str()), Some("Shirt"));
    }

    #[tokio::test]
    async fn test_hash_matches_in_memory_store() {
        let sqlite = Arc::new(seeded().await);
        let memory = Arc::new(InMemoryCatalogStore::new());
        CatalogFixture::parse(FIXTURE, "inline")
            .unwrap()
            .import_into(memory.as_ref())
            .await
            .unwrap();

        let from_sqlite = PublishStateUpdater::new(
            CatalogCollections::from_store(sqlite),
            Arc::new(FixedClock),
        )
        .compute_hash("P1")
        .await
        .unwrap();
        let from_memory = PublishStateUpdater::new(
            CatalogCollections::from_store(memory),
            Arc::new(FixedClock),
        )
        .compute_hash("P1")
        .await
        .unwrap();

        assert_eq!(from_sqlite, from_memory);
    }

    #[tokio::test]
    async fn test_publish_persists_to_disk() {
        let dir = TempDir::new().expect("temp dir");
        let db_path = dir.path().join("nested").join("catalog.sqlite");

        let hash = {
            let store = Arc::new(SqliteCatalogStore::new(&db_path).await.unwrap());
            CatalogFixture::parse(FIXTURE, "inline")
                .unwrap()
                .import_into(store.as_ref())
                .await
                .unwrap();

            let updater =
                PublishStateUpdater::new(CatalogCollections::from_store(store), Arc::new(FixedClock));
            let merged = updater.hash_product("V1", true).await.unwrap().unwrap();
            merged.current_product_hash().unwrap().to_string()
        };

        let reopened = SqliteCatalogStore::new(&db_path).await.unwrap();
        let product = reopened.find_product("P1").await.unwrap().unwrap();
        assert_eq!(product.current_product_hash(), Some(hash.as_str()));
        assert_eq!(product.published_product_hash(), Some(hash.as_str()));
        assert_eq!(
            product.get("updatedAt").and_then(|v| v.as_str()),
            Some("2024-05-01T10:00:00Z")
        );
        assert_eq!(reopened.counts().await.unwrap(), (5, 6));
    }
}
