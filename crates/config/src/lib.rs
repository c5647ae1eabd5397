//! Layered configuration.
//!
//! Values are resolved from, in increasing priority:
//!
//! 1. built-in defaults,
//! 2. a configuration file (TOML, YAML or JSON, chosen by extension),
//! 3. environment variables prefixed `FOLIO_`, nested with `__`
//!    (`FOLIO_RECONCILE__MAX_WORKERS=4`).
//!
//! ```toml
//! [notion]
//! api_key = "secret_..."
//! database_id = "0123456789abcdef"
//!
//! [store]
//! backend = "sqlite"
//! path = "/var/lib/folio/pages.db"
//!
//! [reconcile]
//! max_workers = 8
//! interval = 60
//! ```

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use std::num::NonZero;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_PREFIX: &str = "FOLIO_";
pub const CONFIG_FILE: &str = "folio.toml";
const DATABASE_FILE: &str = "pages.db";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "folio")
}

/// The configuration file used when none is given explicitly.
pub fn default_config_file() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotionConfig {
    pub api_key: Option<String>,
    pub database_id: Option<String>,
    pub base_url: String,
    pub version: String,
}
impl Default for NotionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            database_id: None,
            base_url: "https://api.notion.com".to_string(),
            version: "2022-06-28".to_string(),
        }
    }
}
impl NotionConfig {
    /// The API key and database id, both of which must be set and non-empty.
    pub fn credentials(&self) -> Result<(&str, &str)> {
        let api_key = self.api_key.as_deref().filter(|s| !s.is_empty());
        let database_id = self.database_id.as_deref().filter(|s| !s.is_empty());
        match (api_key, database_id) {
            (Some(key), Some(db)) => Ok((key, db)),
            (None, _) => exn::bail!(ErrorKind::Missing("notion.api_key")),
            (_, None) => exn::bail!(ErrorKind::Missing("notion.database_id")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Sqlite,
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: Backend,
    pub path: PathBuf,
}
impl Default for StoreConfig {
    fn default() -> Self {
        let path = project_dirs()
            .map(|dirs| dirs.data_dir().join(DATABASE_FILE))
            .unwrap_or_else(|| PathBuf::from(DATABASE_FILE));
        Self { backend: Backend::default(), path }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    /// Upper bound on concurrently rebuilding pages.
    pub max_workers: usize,
    /// Seconds between passes in watch mode.
    pub interval: u64,
    /// Render pages but never write to or delete from the store.
    pub dry_run: bool,
}
impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            max_workers: std::thread::available_parallelism().map(NonZero::get).unwrap_or(1),
            interval: 60,
            dry_run: false,
        }
    }
}
impl ReconcileConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub notion: NotionConfig,
    pub store: StoreConfig,
    pub reconcile: ReconcileConfig,
}
impl Config {
    /// Build the layered figment without extracting it.
    ///
    /// An explicit `file` must exist; the default file is used only if present.
    pub fn figment(file: Option<&Path>) -> Result<Figment> {
        let file = match file {
            Some(path) if !path.is_file() => exn::bail!(ErrorKind::FileNotFound(path.to_path_buf())),
            Some(path) => Some(path.to_path_buf()),
            None => default_config_file().filter(|p| p.is_file()),
        };
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = file {
            tracing::debug!(path = %path.display(), "loading configuration file");
            figment = match path.extension().and_then(|e| e.to_str()) {
                Some("yaml" | "yml") => figment.merge(Yaml::file(path)),
                Some("json") => figment.merge(Json::file(path)),
                _ => figment.merge(Toml::file(path)),
            };
        }
        Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    /// Load and validate configuration.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        Self::from_figment(&Self::figment(file)?)
    }

    pub fn from_figment(figment: &Figment) -> Result<Self> {
        let config: Self = figment.extract().or_raise(|| ErrorKind::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        exn::ensure!(
            self.reconcile.max_workers >= 1,
            ErrorKind::Invalid("reconcile.max_workers must be at least 1".to_string())
        );
        exn::ensure!(
            self.reconcile.interval >= 1,
            ErrorKind::Invalid("reconcile.interval must be at least 1 second".to_string())
        );
        exn::ensure!(
            self.store.backend != Backend::Sqlite || !self.store.path.as_os_str().is_empty(),
            ErrorKind::Invalid("store.path must be set for the sqlite backend".to_string())
        );
        Ok(())
    }
}
