//! # extapi Configuration
//!
//! Process-wide options consumed by the extension layer, loaded from a JSON,
//! YAML or TOML file. The same [`ConfigFormat`] detection is used for
//! extension module manifests.
pub mod error;

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
#[cfg(feature = "yaml-config")]
use serde_yaml;
#[cfg(feature = "toml-config")]
use toml;

use crate::config::error::ConfigError;
use crate::kernel::constants;

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// JSON format (.json)
    Json,
    /// YAML format (.yaml, .yml) - requires "yaml-config" feature
    #[cfg(feature = "yaml-config")]
    Yaml,
    /// TOML format (.toml) - requires "toml-config" feature
    #[cfg(feature = "toml-config")]
    Toml,
}

impl ConfigFormat {
    /// Get the file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Json => "json",
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => "yaml",
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => "toml",
        }
    }

    /// Determine format from a bare file extension, case-insensitively
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Some(ConfigFormat::Json),
            #[cfg(feature = "yaml-config")]
            "yaml" | "yml" => Some(ConfigFormat::Yaml),
            #[cfg(feature = "toml-config")]
            "toml" => Some(ConfigFormat::Toml),
            _ => None,
        }
    }

    /// Determine format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Deserialize `data` in this format
    pub fn deserialize<T: DeserializeOwned>(&self, data: &str) -> Result<T, String> {
        match self {
            ConfigFormat::Json => serde_json::from_str(data).map_err(|e| e.to_string()),
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => serde_yaml::from_str(data).map_err(|e| e.to_string()),
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::from_str(data).map_err(|e| e.to_string()),
        }
    }
}

fn default_api_version() -> String {
    constants::API_VERSION.to_string()
}

fn default_load_timeout() -> u64 {
    constants::DEFAULT_EXTENSION_LOAD_TIMEOUT_SECS
}

fn default_vim_drivers() -> Vec<String> {
    vec!["openstack".to_string(), "kubernetes".to_string()]
}

/// Options of the API server that the extension layer reads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Extra extension directories, `:`-separated, searched before the built-in one
    pub api_extensions_path: Option<String>,
    /// Let resource controllers honour `limit`/`marker`
    pub allow_pagination: bool,
    /// Let resource controllers honour `sort_key`/`sort_dir`
    pub allow_sorting: bool,
    /// Core API version passed to extensions when merging attributes
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Upper bound for extension discovery
    #[serde(default = "default_load_timeout")]
    pub extension_load_timeout_secs: u64,
    /// Cap applied to `limit` when paginating; `None` leaves it unbounded
    pub pagination_max_limit: Option<usize>,
    /// VIM drivers loaded from the NFVO driver namespace
    #[serde(default = "default_vim_drivers")]
    pub vim_drivers: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_extensions_path: None,
            allow_pagination: false,
            allow_sorting: false,
            api_version: default_api_version(),
            extension_load_timeout_secs: default_load_timeout(),
            pagination_max_limit: None,
            vim_drivers: default_vim_drivers(),
        }
    }
}

impl ApiConfig {
    /// Parse a configuration document in the given format
    pub fn parse(data: &str, format: ConfigFormat) -> Result<Self, ConfigError> {
        format
            .deserialize(data)
            .map_err(|message| ConfigError::Parse {
                format: format.extension().to_string(),
                message,
            })
    }

    /// Load the configuration from a file, picking the format from its suffix
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let format = ConfigFormat::from_path(path).ok_or_else(|| ConfigError::UnsupportedFormat {
            path: path.to_path_buf(),
        })?;
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let config = Self::parse(&content, format)?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// The full extensions search path: configured directories first, then `builtin`
    pub fn extensions_path(&self, builtin: &str) -> String {
        match self.api_extensions_path.as_deref() {
            Some(extra) if !extra.is_empty() => {
                format!("{}{}{}", extra, constants::EXTENSIONS_PATH_SEPARATOR, builtin)
            }
            _ => builtin.to_string(),
        }
    }

    /// Prepend the configured path to `paths` and store the joined result, dropping empty entries
    pub fn append_api_extensions_path<S: AsRef<str>>(&mut self, paths: &[S]) {
        let current = self.api_extensions_path.clone().unwrap_or_default();
        let joined = std::iter::once(current.as_str())
            .chain(paths.iter().map(|p| p.as_ref()))
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join(&constants::EXTENSIONS_PATH_SEPARATOR.to_string());
        self.api_extensions_path = Some(joined);
    }

    /// Discovery bound as a `Duration`
    pub fn extension_load_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.extension_load_timeout_secs)
    }
}
