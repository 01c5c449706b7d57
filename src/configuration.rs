use crate::endpoints::{Endpoint, EndpointTable, Operation};
use crate::token_cache::CachePolicy;
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tracing::debug;

pub const DEFAULT_APPLICATION_ID: &str = "gmb";
pub const DEFAULT_CONFIGURATION_FILE_NAME: &str = "config.yml";
pub const CONFIGURATION_DIRECTORY_VARIABLE: &str = "GMB_CONFIG_DIR";
pub const DEFAULT_KEY_FILE: &str = "keyfile.json";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_TOKEN_SKEW_SECS: u64 = 60;
pub const MAX_TOKEN_SKEW_SECS: u64 = 3600;

#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("failed to resolve the configuration directory")]
    FailedToFindConfigurationDirectory,
    #[error("failed to load configuration data from {path:?}, because of: {cause}")]
    FailedToLoadData {
        path: PathBuf,
        cause: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("invalid value for property {name:?}: {reason}")]
    InvalidPropertyValue { name: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Configuration {
    key_file: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    token_uri: Option<String>,
    token_cache: CachePolicy,
    token_skew: u64,
    timeout: u64,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    endpoints: BTreeMap<Operation, Endpoint>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            key_file: PathBuf::from(DEFAULT_KEY_FILE),
            subject: None,
            token_uri: None,
            token_cache: CachePolicy::default(),
            token_skew: DEFAULT_TOKEN_SKEW_SECS,
            timeout: DEFAULT_TIMEOUT_SECS,
            endpoints: BTreeMap::new(),
        }
    }
}

impl Configuration {
    pub fn get_default_configuration_file_path() -> Result<PathBuf, ConfigurationError> {
        // Check for GMB_CONFIG_DIR environment variable first
        if let Ok(config_dir_str) = std::env::var(CONFIGURATION_DIRECTORY_VARIABLE) {
            let mut config_path = PathBuf::from(config_dir_str);
            config_path.push(DEFAULT_CONFIGURATION_FILE_NAME);
            return Ok(config_path);
        }

        match config_dir() {
            Some(mut default_config_file_path) => {
                default_config_file_path.push(DEFAULT_APPLICATION_ID);
                default_config_file_path.push(DEFAULT_CONFIGURATION_FILE_NAME);
                Ok(default_config_file_path)
            }
            None => Err(ConfigurationError::FailedToFindConfigurationDirectory),
        }
    }

    /// Loads the configuration from its default location, falling back to the
    /// built-in defaults when there is no configuration file.
    pub fn load_default() -> Result<Configuration, ConfigurationError> {
        let default_file_path = Configuration::get_default_configuration_file_path()?;
        Configuration::load_or_default(&default_file_path)
    }

    pub fn load_or_default(path: &Path) -> Result<Configuration, ConfigurationError> {
        debug!("Loading configuration from {:?}...", path);
        match fs::read_to_string(path) {
            Ok(contents) => Configuration::from_yaml(path, &contents),
            Err(cause) if cause.kind() == ErrorKind::NotFound => {
                debug!("Configuration file not found, using defaults");
                Ok(Configuration::default())
            }
            Err(cause) => Err(ConfigurationError::FailedToLoadData {
                path: path.to_path_buf(),
                cause: Box::new(cause),
            }),
        }
    }

    pub fn load_from_file(path: &Path) -> Result<Configuration, ConfigurationError> {
        let contents = fs::read_to_string(path).map_err(|cause| ConfigurationError::FailedToLoadData {
            path: path.to_path_buf(),
            cause: Box::new(cause),
        })?;
        Configuration::from_yaml(path, &contents)
    }

    fn from_yaml(path: &Path, contents: &str) -> Result<Configuration, ConfigurationError> {
        // an empty file is a valid, empty configuration
        if contents.trim().is_empty() {
            return Ok(Configuration::default());
        }

        let configuration: Configuration =
            serde_yaml::from_str(contents).map_err(|cause| ConfigurationError::FailedToLoadData {
                path: path.to_path_buf(),
                cause: Box::new(cause),
            })?;
        configuration.validate()?;
        Ok(configuration)
    }

    fn validate(&self) -> Result<(), ConfigurationError> {
        if self.timeout == 0 {
            return Err(ConfigurationError::InvalidPropertyValue {
                name: "timeout".to_string(),
                reason: "must be at least one second".to_string(),
            });
        }
        if self.token_skew > MAX_TOKEN_SKEW_SECS {
            return Err(ConfigurationError::InvalidPropertyValue {
                name: "token_skew".to_string(),
                reason: format!("must not exceed {} seconds", MAX_TOKEN_SKEW_SECS),
            });
        }
        if self.key_file.as_os_str().is_empty() {
            return Err(ConfigurationError::InvalidPropertyValue {
                name: "key_file".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    pub fn key_file(&self) -> &Path {
        &self.key_file
    }

    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    pub fn token_uri(&self) -> Option<&str> {
        self.token_uri.as_deref()
    }

    pub fn token_cache(&self) -> CachePolicy {
        self.token_cache
    }

    /// Seconds before expiry at which a cached token is replaced.
    pub fn token_skew(&self) -> u64 {
        self.token_skew
    }

    pub fn timeout(&self) -> u64 {
        self.timeout
    }

    /// The built-in endpoints with the configured overrides applied.
    pub fn endpoint_table(&self) -> EndpointTable {
        EndpointTable::default().with_overrides(&self.endpoints)
    }
}
