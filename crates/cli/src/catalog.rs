//! Catalog store construction from configuration

use anyhow::{Context, Result, bail};
use product_hash_adapters::fixture::CatalogFixture;
use product_hash_adapters::store::{CatalogWriter, InMemoryCatalogStore, SqliteCatalogStore};
use product_hash_domain::usecases::PublishStateUpdater;
use product_hash_domain::{CatalogCollections, SystemClock};
use std::path::PathBuf;
use std::sync::Arc;

use crate::args::StoreArgs;
use crate::config::AppConfig;

/// An opened catalog store
pub enum Catalog {
    Sqlite {
        store: Arc<SqliteCatalogStore>,
        path: PathBuf,
    },
    Memory(Arc<InMemoryCatalogStore>),
}

impl Catalog {
    /// Open the configured backend; `--db-path` overrides the configured path
    pub async fn open(config: &AppConfig, overrides: &StoreArgs) -> Result<Self> {
        match config.store.backend.trim() {
            "sqlite" => {
                let path = overrides
                    .db_path
                    .clone()
                    .unwrap_or_else(|| config.store.db_path.clone());
                let store = SqliteCatalogStore::new(&path)
                    .await
                    .with_context(|| format!("Failed to open SQLite store: {}", path.display()))?;

                tracing::debug!(path = %path.display(), "Opened SQLite catalog store");
                Ok(Catalog::Sqlite {
                    store: Arc::new(store),
                    path,
                })
            }
            "memory" => {
                let store = InMemoryCatalogStore::new();
                if let Some(fixture_path) = &config.store.fixture {
                    let fixture = CatalogFixture::load(fixture_path).await.with_context(|| {
                        format!("Failed to load fixture: {}", fixture_path.display())
                    })?;
                    fixture
                        .import_into(&store)
                        .await
                        .context("Failed to seed memory store")?;
                }
                Ok(Catalog::Memory(Arc::new(store)))
            }
            other => bail!("Unknown store backend: {}", other),
        }
    }

    pub fn collections(&self) -> CatalogCollections {
        match self {
            Catalog::Sqlite { store, .. } => CatalogCollections::from_store(store.clone()),
            Catalog::Memory(store) => CatalogCollections::from_store(store.clone()),
        }
    }

    pub fn writer(&self) -> &dyn CatalogWriter {
        match self {
            Catalog::Sqlite { store, .. } => store.as_ref(),
            Catalog::Memory(store) => store.as_ref(),
        }
    }

    pub fn is_persistent(&self) -> bool {
        matches!(self, Catalog::Sqlite { .. })
    }

    pub fn updater(&self) -> PublishStateUpdater<SystemClock> {
        PublishStateUpdater::new(self.collections(), Arc::new(SystemClock))
    }
}
