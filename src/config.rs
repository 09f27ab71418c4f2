use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::archive::DataPaths;
use crate::ImportError;

/// Main importer configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ImporterConfig {
    /// Directory holding recipes.json, imported.json and errors.json
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// AnyList account email (can also be set via ANYLIST_EMAIL)
    pub email: Option<String>,
    /// AnyList account password (can also be set via ANYLIST_PASSWORD)
    pub password: Option<String>,
    /// Remote service connection settings
    #[serde(default)]
    pub service: ServiceConfig,
}

/// Connection settings for the recipe service
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    /// Base URL of a gateway serving the JSON recipe API
    /// (`/auth/login`, `/recipes`, `/recipe-collections`). The default only
    /// suits a gateway running locally.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout: default_timeout(),
        }
    }
}

impl Default for ImporterConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            email: None,
            password: None,
            service: ServiceConfig::default(),
        }
    }
}

/// Account credentials used to open a service session
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl ImporterConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with ANYLIST__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: ANYLIST__SERVICE__BASE_URL
    pub fn load() -> Result<Self, ConfigError> {
        load_config(None)
    }

    /// Like [`ImporterConfig::load`], but reads the given file instead of
    /// `config.toml`. The file must exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        load_config(Some(path))
    }

    /// Resolve account credentials from the config, falling back to the
    /// ANYLIST_EMAIL / ANYLIST_PASSWORD environment variables
    pub fn credentials(&self) -> Result<Credentials, ImportError> {
        let email = non_empty(self.email.clone())
            .or_else(|| non_empty(std::env::var("ANYLIST_EMAIL").ok()))
            .ok_or(ImportError::MissingCredentials)?;
        let password = non_empty(self.password.clone())
            .or_else(|| non_empty(std::env::var("ANYLIST_PASSWORD").ok()))
            .ok_or(ImportError::MissingCredentials)?;

        Ok(Credentials { email, password })
    }

    /// Queue and archive files under `data_dir`
    pub fn paths(&self) -> DataPaths {
        DataPaths::new(&self.data_dir)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn load_config(path: Option<&Path>) -> Result<ImporterConfig, ConfigError> {
    let file = match path {
        Some(path) => File::from(path).required(true),
        // Optional config file (can be missing)
        None => File::with_name("config").required(false),
    };

    let settings = Config::builder()
        .add_source(file)
        // Use double underscore for nested: ANYLIST__SERVICE__TIMEOUT
        .add_source(
            Environment::with_prefix("ANYLIST")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
