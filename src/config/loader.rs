//! Configuration store: loading, lookup and persistence of the config file.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::networks::{find_network, network_names, NetworkInfo, DEFAULT_NETWORK};
use crate::config::schema::{CliConfig, CONFIG_KEYS, KEY_NETWORK, KEY_RPC_ENDPOINT};
use crate::config::validation::{is_known_key, validate_value, ValidationError};

/// Environment variable overriding the config file location.
pub const CONFIG_PATH_ENV_VAR: &str = "REFINER_CLI_CONFIG";

const CONFIG_DIR_NAME: &str = ".refiner-cli";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Error type for configuration access.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Unknown config key '{0}' (expected one of: {keys})", keys = CONFIG_KEYS.join(", "))]
    UnknownKey(String),

    #[error("Invalid value for {0}")]
    InvalidValue(#[from] ValidationError),

    #[error("Unknown network '{0}' (expected one of: {names})", names = network_names())]
    UnknownNetwork(String),

    #[error("Config store unavailable: {0}")]
    Unavailable(String),

    #[error("Could not determine home directory; pass --config or set REFINER_CLI_CONFIG")]
    NoHomeDir,
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Read-only key lookup, the only view of configuration the stats layer needs.
pub trait ConfigSource {
    /// `Ok(None)` when the key is recognised but unset.
    fn get_config_value(&self, key: &str) -> ConfigResult<Option<String>>;
}

/// Resolve the config file path: explicit override, then env var, then home dir.
pub fn resolve_config_path(explicit: Option<&Path>) -> ConfigResult<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV_VAR) {
        return Ok(PathBuf::from(path));
    }
    dirs::home_dir()
        .map(|home| home.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
        .ok_or(ConfigError::NoHomeDir)
}

/// The configuration file, loaded once per process and passed by reference.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
    config: CliConfig,
}

impl ConfigStore {
    /// A store backed by `path` holding defaults; call [`initialize`](Self::initialize) to load.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            config: CliConfig::default(),
        }
    }

    /// Create and load in one step.
    pub fn open(path: impl Into<PathBuf>) -> ConfigResult<Self> {
        let mut store = Self::new(path);
        store.initialize()?;
        Ok(store)
    }

    /// Load the file from disk. A missing file leaves the defaults in place.
    pub fn initialize(&mut self) -> ConfigResult<()> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "No config file, using defaults");
            self.config = CliConfig::default();
            return Ok(());
        }

        let content = fs::read_to_string(&self.path).map_err(|source| ConfigError::Io {
            path: self.path.clone(),
            source,
        })?;
        self.config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: self.path.clone(),
            source,
        })?;

        tracing::debug!(path = %self.path.display(), "Config loaded");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &CliConfig {
        &self.config
    }

    /// The network named in the file.
    pub fn selected_network(&self) -> ConfigResult<&'static NetworkInfo> {
        find_network(&self.config.network)
            .ok_or_else(|| ConfigError::UnknownNetwork(self.config.network.clone()))
    }

    /// Validate and store `value` under `key` (in memory; call [`save`](Self::save)).
    pub fn set_config_value(&mut self, key: &str, value: &str) -> ConfigResult<()> {
        if !is_known_key(key) {
            return Err(ConfigError::UnknownKey(key.to_string()));
        }
        let value = value.trim();
        validate_value(key, value)?;

        if key == KEY_NETWORK {
            let network = find_network(value).ok_or_else(|| ConfigError::UnknownNetwork(value.to_string()))?;
            self.config.network = network.name.to_string();
        } else if let Some(slot) = self.config.optional_slot(key) {
            *slot = Some(value.to_string());
        }
        Ok(())
    }

    /// Remove `key` from the file. Returns whether it was set before.
    ///
    /// Unsetting `network` restores the default network.
    pub fn unset_config_value(&mut self, key: &str) -> ConfigResult<bool> {
        if !is_known_key(key) {
            return Err(ConfigError::UnknownKey(key.to_string()));
        }
        if key == KEY_NETWORK {
            let was_default = self.config.network == DEFAULT_NETWORK;
            self.config.network = DEFAULT_NETWORK.to_string();
            return Ok(!was_default);
        }
        Ok(self
            .config
            .optional_slot(key)
            .and_then(|slot| slot.take())
            .is_some())
    }

    /// Every key with its current value, in display order.
    pub fn entries(&self) -> Vec<(&'static str, Option<String>)> {
        CONFIG_KEYS
            .iter()
            .map(|key| (*key, self.get_config_value(key).ok().flatten()))
            .collect()
    }

    /// Write the config to disk, creating the parent directory if needed.
    pub fn save(&self) -> ConfigResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let content = toml::to_string_pretty(&self.config)?;
        fs::write(&self.path, content).map_err(|source| ConfigError::Io {
            path: self.path.clone(),
            source,
        })?;
        restrict_permissions(&self.path)?;

        tracing::debug!(path = %self.path.display(), "Config saved");
        Ok(())
    }
}

impl ConfigSource for ConfigStore {
    fn get_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        match key {
            KEY_NETWORK => Ok(Some(self.config.network.clone())),
            KEY_RPC_ENDPOINT => Ok(self.config.rpc_endpoint.clone().or_else(|| {
                find_network(&self.config.network).map(|n| n.rpc_url.to_string())
            })),
            _ => self
                .config
                .optional_value(key)
                .map(|value| value.cloned())
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string())),
        }
    }
}

/// Stand-in used when the config file could not be loaded.
///
/// Every lookup fails, which credential resolution treats as "not set".
#[derive(Debug, Clone)]
pub struct UnavailableConfig {
    reason: String,
}

impl UnavailableConfig {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl ConfigSource for UnavailableConfig {
    fn get_config_value(&self, _key: &str) -> ConfigResult<Option<String>> {
        Err(ConfigError::Unavailable(self.reason.clone()))
    }
}

// The file may hold a private key.
#[cfg(unix)]
fn restrict_permissions(path: &Path) -> ConfigResult<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600)).map_err(|source| {
        ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }
    })
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> ConfigResult<()> {
    Ok(())
}
