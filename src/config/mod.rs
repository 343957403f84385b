//! Configuration management.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! environment variables prefixed with `GET_PAPERS_LIST_` (nested keys use
//! `__`, e.g. `GET_PAPERS_LIST_PUBMED__MAX_RESULTS=20`).
//!
//! ```toml
//! [pubmed]
//! base_url = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils"
//! database = "pubmed"
//! max_results = 100
//! timeout_secs = 30
//!
//! [logging]
//! level = "info"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::models::DEFAULT_MAX_RESULTS;
use crate::sources::{PUBMED_BASE_URL, PUBMED_DATABASE};
use crate::utils::{DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};

/// Environment variable prefix
pub const ENV_PREFIX: &str = "GET_PAPERS_LIST";

/// File name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "get-papers-list.toml";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// PubMed endpoint settings
    #[serde(default)]
    pub pubmed: PubMedConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// PubMed E-utilities settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PubMedConfig {
    /// Base URL hosting `esearch.fcgi` and `efetch.fcgi`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Entrez database name
    #[serde(default = "default_database")]
    pub database: String,

    /// Default cap on search results
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for PubMedConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            database: default_database(),
            max_results: default_max_results(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_base_url() -> String {
    PUBMED_BASE_URL.to_string()
}

fn default_database() -> String {
    PUBMED_DATABASE.to_string()
}

fn default_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Level for this crate's logs when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Load configuration from an optional file plus the environment
pub fn load_config(path: Option<&Path>) -> Result<Config, config::ConfigError> {
    let mut builder = config::Config::builder();

    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}

/// Find a configuration file in the working directory or the user config dir
pub fn find_config_file() -> Option<PathBuf> {
    find_config_file_in(Path::new(""), dirs::config_dir().as_deref())
}

/// `<work_dir>/get-papers-list.toml` wins over `<config_dir>/get-papers-list/config.toml`
fn find_config_file_in(work_dir: &Path, config_dir: Option<&Path>) -> Option<PathBuf> {
    let local = work_dir.join(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }

    config_dir
        .map(|dir| dir.join("get-papers-list").join("config.toml"))
        .filter(|path| path.is_file())
}
