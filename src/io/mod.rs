pub mod config_io;
pub mod storage;

pub use config_io::{CONFIG_FILE, ConfigError, read_config};
pub use storage::{StorageError, load_issues, save_issues};
