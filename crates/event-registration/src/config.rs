//! Configuration for the registration backend.

use anyhow::{Context, Result};
use secrecy::SecretString;
use serde::Deserialize;
use std::path::PathBuf;

/// Environment variables read as top-level settings.
const TOP_LEVEL_KEYS: [&str; 3] = ["ADMIN_USERNAME", "ADMIN_PASSWORD", "SECRET_KEY"];

/// Sections read from `SECTION__FIELD` variables.
const SECTIONS: [&str; 4] = ["SERVER", "STORAGE", "WEB", "LOG"];

/// Backend configuration.
///
/// Admin credentials and the secret key sit at the top level so they map to
/// the plain `ADMIN_USERNAME`, `ADMIN_PASSWORD` and `SECRET_KEY` variables.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Admin username
    #[serde(default)]
    pub admin_username: String,

    /// Admin password
    #[serde(default = "empty_secret")]
    pub admin_password: SecretString,

    /// Application secret key (not used for signing; kept for deployments that set it)
    #[serde(default = "default_secret_key")]
    pub secret_key: SecretString,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Registration storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Static web UI configuration
    #[serde(default)]
    pub web: WebConfig,

    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path to the registrations JSON document
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,

    /// Enable persistence (if false, registrations are in-memory only)
    #[serde(default = "default_true")]
    pub persist: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    /// Directory holding `index.html` and other static assets
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            port: default_port(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
            persist: true,
        }
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            static_dir: default_static_dir(),
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

fn empty_secret() -> SecretString {
    SecretString::new(String::new())
}

fn default_secret_key() -> SecretString {
    SecretString::new("default-secret-key".into())
}

fn default_listen_addr() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    5000
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("data/registrations.json")
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        Self::from_vars(std::env::vars())
    }

    /// Build configuration from `(name, value)` pairs.
    ///
    /// Only the admin variables and `SECTION__FIELD` variables of known
    /// sections are considered; the rest of the environment is ignored.
    fn from_vars(vars: impl IntoIterator<Item = (String, String)>) -> Result<Self> {
        let source: config::Map<String, String> =
            vars.into_iter().filter(|(key, _)| is_config_key(key)).collect();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .source(Some(source))
                    .separator("__")
                    .try_parsing(false),
            )
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

fn is_config_key(key: &str) -> bool {
    let key = key.to_ascii_uppercase();
    TOP_LEVEL_KEYS.contains(&key.as_str())
        || key
            .split_once("__")
            .is_some_and(|(section, field)| SECTIONS.contains(&section) && !field.is_empty())
}
