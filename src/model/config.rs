use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration from fixbook.toml
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub history: HistoryConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Where the issue collection is saved. Relative paths resolve against
    /// the directory holding the config file.
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
    /// Save after every committing command
    #[serde(default = "default_true")]
    pub autosave: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            data_file: default_data_file(),
            autosave: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Undo steps kept in memory; 0 means unbounded
    #[serde(default = "default_undo_limit")]
    pub undo_limit: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        HistoryConfig {
            undo_limit: default_undo_limit(),
        }
    }
}

impl HistoryConfig {
    pub fn undo_limit(&self) -> Option<usize> {
        (self.undo_limit > 0).then_some(self.undo_limit)
    }
}

fn default_data_file() -> PathBuf {
    PathBuf::from("issues.json")
}

fn default_true() -> bool {
    true
}

fn default_undo_limit() -> usize {
    500
}
