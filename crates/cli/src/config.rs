//! Configuration loading and management

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// `sqlite` or `memory`
    #[serde(default = "default_backend")]
    pub backend: String,

    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Catalog fixture loaded into the memory backend at startup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixture: Option<PathBuf>,
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_backend() -> String {
    "sqlite".to_string()
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./catalog.sqlite")
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            db_path: default_db_path(),
            fixture: None,
        }
    }
}

impl AppConfig {
    pub const DEFAULT_PATH: &'static str = "./product-hash.toml";

    /// Load configuration from file and environment
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        // Try default config path if none specified
        let default_path = PathBuf::from(Self::DEFAULT_PATH);
        let path = config_path.unwrap_or(&default_path);

        if path.exists() {
            builder = builder.add_source(config::File::from(path));
        } else if config_path.is_some() {
            // User specified a path that doesn't exist
            anyhow::bail!("Config file not found: {}", path.display());
        }

        // Add environment variable overrides
        builder = builder.add_source(
            config::Environment::with_prefix("PRODUCT_HASH")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Render the effective configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }

    /// Generate example configuration as TOML string
    pub fn example_toml() -> String {
        r#"# product-hash configuration

[general]
log_level = "info"

[store]
backend = "sqlite"  # sqlite, memory
db_path = "./catalog.sqlite"
# Seeds the memory backend on startup
# fixture = "./catalog.json"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn example_config_parses_to_defaults() {
        let parsed: AppConfig = toml::from_str(&AppConfig::example_toml()).expect("valid toml");
        assert_eq!(parsed.general.log_level, "info");
        assert_eq!(parsed.store.backend, "sqlite");
        assert_eq!(parsed.store.db_path, PathBuf::from("./catalog.sqlite"));
        assert!(parsed.store.fixture.is_none());
    }

    #[test]
    fn load_reads_explicit_file() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            "[store]\nbackend = \"memory\"\nfixture = \"./seed.json\"\n",
        )
        .expect("write config");

        let config = AppConfig::load(Some(path.as_path())).expect("load config");
        assert_eq!(config.store.backend, "memory");
        assert_eq!(config.store.fixture, Some(PathBuf::from("./seed.json")));
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn load_fails_for_missing_explicit_file() {
        let dir = TempDir::new().expect("temp dir");
        let missing = dir.path().join("missing.toml");
        let result = AppConfig::load(Some(missing.as_path()));
        assert!(result.is_err());
    }
}
