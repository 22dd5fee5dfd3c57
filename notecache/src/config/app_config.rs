use std::env;
use std::path::PathBuf;
use serde::{Deserialize, Serialize};
use crate::lib_constants::{DEFAULT_CHANGE_BUFFER_SIZE, DEFAULT_DATA_DIR_FALLBACK};

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct AppConfig {
    #[serde(default = "app_config_default_data_directory")]
    pub data_directory: PathBuf,

    #[serde(default)]
    pub storage: StorageBackend,

    /// How many change notifications a slow observer may fall behind before
    /// it has to resync.
    #[serde(default = "app_config_default_change_buffer_size")]
    pub change_buffer_size: usize,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    File,
    Memory,
}

pub fn app_config_default_data_directory() -> PathBuf {
    env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map(|home| PathBuf::from(home).join(".local/share/notecache"))
        .unwrap_or_else(|| DEFAULT_DATA_DIR_FALLBACK.into())
}

pub fn app_config_default_change_buffer_size() -> usize {
    DEFAULT_CHANGE_BUFFER_SIZE
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            data_directory: app_config_default_data_directory(),
            storage: StorageBackend::default(),
            change_buffer_size: DEFAULT_CHANGE_BUFFER_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_config_defaults_match() {
        assert_eq!(
            AppConfig::default(),
            toml::from_str("").unwrap(),
        )
    }

    #[test]
    fn storage_backend_is_lowercase() {
        let config: AppConfig = toml::from_str(r#"storage = "memory""#).unwrap();
        assert_eq!(config.storage, StorageBackend::Memory);
        assert!(toml::from_str::<AppConfig>(r#"storage = "Memory""#).is_err());
    }
}
