use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::model::config::AppConfig;

/// Config file name looked up in the working directory
pub const CONFIG_FILE: &str = "fixbook.toml";

/// Error type for reading the config file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Read the config at `path`. A missing file yields the defaults.
///
/// A relative `storage.data_file` is resolved against the directory that
/// holds the config file.
pub fn read_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            let mut config = AppConfig::default();
            resolve_data_file(&mut config, path);
            return Ok(config);
        }
        Err(e) => {
            return Err(ConfigError::ReadError {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };
    let mut config: AppConfig = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;
    resolve_data_file(&mut config, path);
    Ok(config)
}

fn resolve_data_file(config: &mut AppConfig, config_path: &Path) {
    if config.storage.data_file.is_relative() {
        if let Some(dir) = config_path.parent() {
            config.storage.data_file = dir.join(&config.storage.data_file);
        }
    }
}
