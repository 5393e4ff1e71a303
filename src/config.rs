use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

// =============================================================================
// Fetch-related constants
// =============================================================================

/// Timeout for a single release page request in milliseconds (30 seconds)
pub const FETCH_TIMEOUT_MS: u64 = 30_000;

/// Delay between starting each upstream lookup (10ms)
pub const FETCH_STAGGER_DELAY_MS: u64 = 10;

/// Extra attempts after a transient fetch failure
pub const DEFAULT_FETCH_RETRIES: u32 = 2;

/// Pause before retrying a failed fetch in milliseconds
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1_000;

pub const USER_AGENT: &str = concat!("metabo-version-check/", env!("CARGO_PKG_VERSION"));

/// Environment variable naming the dataset directory
pub const DATA_DIR_ENV: &str = "METABO_DATA_DIR";

/// Dataset directory used when nothing else is configured
pub const DEFAULT_DATA_DIR: &str = "data";

const APP_NAME: &str = "metabo-version-check";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Checker configuration structure
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CheckerConfig {
    /// Directory holding the Parquet dataset
    pub data_dir: Option<PathBuf>,
    pub fetch: FetchConfig,
    pub upstreams: UpstreamsConfig,
    pub pipeline: PipelineConfig,
    pub log: LogConfig,
}

impl CheckerConfig {
    /// Load the configuration from a JSON file. A missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Resolve the dataset directory: command line, then `METABO_DATA_DIR`,
    /// then the config file, then `./data`.
    pub fn resolve_data_dir(&self, cli: Option<PathBuf>) -> PathBuf {
        resolve_data_dir_with_env(
            cli,
            std::env::var_os(DATA_DIR_ENV).map(PathBuf::from),
            self.data_dir.clone(),
        )
    }
}

/// Remote fetch configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct FetchConfig {
    pub timeout_ms: u64,
    pub retries: u32,
    pub retry_delay_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_ms: FETCH_TIMEOUT_MS,
            retries: DEFAULT_FETCH_RETRIES,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
        }
    }
}

/// Upstream-specific configuration
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct UpstreamsConfig {
    pub hmdb: UpstreamConfig,
    pub lipid_maps: UpstreamConfig,
}

/// Individual upstream configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct UpstreamConfig {
    pub enabled: bool,
    /// Release page URL override
    pub url: Option<String>,
}

impl UpstreamConfig {
    pub fn url_or(&self, default: &str) -> String {
        self.url.clone().unwrap_or_else(|| default.to_string())
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: None,
        }
    }
}

/// Enrichment pipeline invocation
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct PipelineConfig {
    /// Program followed by its arguments
    pub command: Vec<String>,
    pub working_dir: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            command: vec!["python".to_string(), "run_pipeline.py".to_string()],
            working_dir: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    /// Write the log file as JSON lines
    pub json: bool,
}

/// Returns the application directory for metabo-version-check.
/// Uses $XDG_DATA_HOME/metabo-version-check if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/metabo-version-check,
/// or ./metabo-version-check if neither is available.
pub fn app_dir() -> PathBuf {
    app_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the default config file.
pub fn config_path() -> PathBuf {
    app_dir().join("config.json")
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    app_dir().join("metabo-version-check.log")
}

fn app_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join(APP_NAME)
}

fn resolve_data_dir_with_env(
    cli: Option<PathBuf>,
    env: Option<PathBuf>,
    config: Option<PathBuf>,
) -> PathBuf {
    cli.or(env)
        .or(config)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}
