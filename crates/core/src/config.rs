use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub tagger: TaggerConfig,
    pub worker: WorkerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TaggerConfig {
    /// Registered provider name, e.g. "openai" or "noop".
    pub provider: String,
    pub model: String,
}

impl Default for TaggerConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-4o-mini".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Seconds between existence checks while the store is absent.
    pub store_poll_secs: u64,
    /// Seconds to sleep when no untagged image is available.
    pub idle_poll_secs: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            store_poll_secs: 5,
            idle_poll_secs: 10,
        }
    }
}

/// Catalog store location as created by the ingestion application:
/// `<platform data dir>/media-catalog/catalog.db`.
pub fn default_store_path() -> String {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("media-catalog")
        .join("catalog.db")
        .to_string_lossy()
        .into_owned()
}

pub fn load(path: Option<&str>) -> anyhow::Result<AppConfig> {
    let mut settings = config::Config::builder();
    if let Some(p) = path {
        settings = settings.add_source(config::File::with_name(p));
    } else {
        settings = settings.add_source(config::File::with_name("config/default").required(false));
    }
    let cfg = settings.build()?;
    Ok(cfg.try_deserialize()?)
}
