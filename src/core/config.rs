use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use crate::core::diagram::DiagramStyle;
use crate::core::highlight::InstantTolerance;

pub const CONFIG_FILE_NAME: &str = "flowtrail.toml";
const DATA_DIR_ENV: &str = "FLOWTRAIL_DIR";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryConfig {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub fetch: FetchConfig,

    #[serde(default)]
    pub highlight: HighlightConfig,

    #[serde(default)]
    pub labels: LabelConfig,

    #[serde(default)]
    pub diagram: DiagramStyle,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// SQLite file; relative paths resolve against the data directory.
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Upper bound for each individual history fetch.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Comment type requested from the comment store.
    #[serde(default = "default_comment_kind")]
    pub comment_kind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighlightConfig {
    /// Start times falling in the same bucket of this width count as simultaneous.
    #[serde(default = "default_same_instant_ms")]
    pub same_instant_ms: u64,
}

/// Names and status labels of the synthetic process start/end history entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    pub start_task_name: String,
    pub start_status: String,
    pub end_task_name: String,
    pub end_status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_store_path() -> PathBuf {
    PathBuf::from("history.db")
}
fn default_timeout_ms() -> u64 {
    5000
}
fn default_comment_kind() -> String {
    "comment".to_string()
}
fn default_same_instant_ms() -> u64 {
    1000
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            comment_kind: default_comment_kind(),
        }
    }
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            same_instant_ms: default_same_instant_ms(),
        }
    }
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            start_task_name: "Process started".to_string(),
            start_status: "started".to_string(),
            end_task_name: "Process completed".to_string(),
            end_status: "completed".to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 17900,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Root data directory: `$FLOWTRAIL_DIR`, else `~/.flowtrail`.
pub fn data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV)
        && !dir.trim().is_empty()
    {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".flowtrail")
}

/// A loaded config plus what was noticed while reading it.
///
/// Loading happens before the log subscriber exists, so nothing is logged
/// during `load`; call [`LoadedConfig::log_summary`] once logging is up.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: HistoryConfig,
    pub source: PathBuf,
    pub found: bool,
    pub warnings: Vec<String>,
}

impl LoadedConfig {
    pub fn log_summary(&self) {
        if self.found {
            info!(
                "Loaded config from {}: store={}, fetch_timeout={}ms, same_instant={}ms",
                self.source.display(),
                self.config.store.path.display(),
                self.config.fetch.timeout_ms,
                self.config.tolerance().as_millis()
            );
        } else {
            info!("No config at {}, using defaults.", self.source.display());
        }
        for warning in &self.warnings {
            warn!("{}", warning);
        }
    }
}

impl HistoryConfig {
    /// Load `path`, or `<data dir>/flowtrail.toml` when `path` is `None`.
    /// A missing file yields the defaults.
    pub async fn load(path: Option<&Path>) -> Result<LoadedConfig> {
        let source = match path {
            Some(p) => p.to_path_buf(),
            None => data_dir().join(CONFIG_FILE_NAME),
        };
        if !source.exists() {
            return Ok(LoadedConfig {
                config: Self::default(),
                source,
                found: false,
                warnings: Vec::new(),
            });
        }
        let content = tokio::fs::read_to_string(&source).await?;
        let mut config: HistoryConfig = toml::from_str(&content)?;
        let warnings = config.sanitize();

        Ok(LoadedConfig {
            config,
            source,
            found: true,
            warnings,
        })
    }

    /// Replace unusable zero values, returning one message per change.
    fn sanitize(&mut self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.fetch.timeout_ms == 0 {
            warnings.push(format!(
                "fetch.timeout_ms = 0 is not usable, falling back to {}ms",
                default_timeout_ms()
            ));
            self.fetch.timeout_ms = default_timeout_ms();
        }
        if self.highlight.same_instant_ms == 0 {
            warnings.push("highlight.same_instant_ms = 0 clamped to 1ms".to_string());
            self.highlight.same_instant_ms = 1;
        }
        warnings
    }

    pub fn store_path(&self) -> PathBuf {
        if self.store.path.is_absolute() {
            self.store.path.clone()
        } else {
            data_dir().join(&self.store.path)
        }
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch.timeout_ms)
    }

    pub fn tolerance(&self) -> InstantTolerance {
        InstantTolerance::from_millis(self.highlight.same_instant_ms)
    }
}
