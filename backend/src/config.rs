use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const CONFIG_FILE_PATH: &str = "valve-panel.toml";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct BackendConfig {
    /// Text file every activity log entry is appended to.
    pub log_file: PathBuf,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self { log_file: PathBuf::from("valve-log.txt") }
    }
}

/// Reads the optional config file. A missing or unreadable file falls back to
/// defaults; the server never refuses to start over it.
pub fn load_config(path: impl AsRef<Path>) -> BackendConfig {
    let path = path.as_ref();
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(_) => return BackendConfig::default(),
    };
    match toml::from_str::<BackendConfig>(&content) {
        Ok(config) => config,
        Err(error) => {
            log::warn!("Failed to parse {}: {error}; using defaults", path.display());
            BackendConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_config(dir.path().join("none.toml")), BackendConfig::default());
    }

    #[test]
    fn reads_log_file_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_PATH);
        fs::write(&path, "log_file = \"/var/log/valves.txt\"\n").unwrap();
        assert_eq!(load_config(&path).log_file, PathBuf::from("/var/log/valves.txt"));
    }

    #[test]
    fn malformed_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_PATH);
        fs::write(&path, "log_file = [").unwrap();
        assert_eq!(load_config(&path), BackendConfig::default());
    }
}
