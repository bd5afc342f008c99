use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::AppConfig;

/// Get the config file path, respecting XDG_CONFIG_HOME
pub fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| dirs_home().join(".config"));
    config_dir.join("getdone").join("config.toml")
}

/// Default data directory for the local tier, respecting XDG_DATA_HOME
pub fn default_data_dir() -> PathBuf {
    let data_dir = std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| dirs_home().join(".local").join("share"));
    data_dir.join("getdone")
}

/// Get the user's home directory
fn dirs_home() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/"))
}

/// Read the config from a specific path.
/// If the file doesn't exist, returns defaults.
/// If the file is corrupted, backs it up as .bak and returns defaults.
pub fn read_config_from(path: &Path) -> AppConfig {
    if !path.exists() {
        return AppConfig::default();
    }

    match fs::read_to_string(path) {
        Ok(content) => match toml::from_str::<AppConfig>(&content) {
            Ok(config) => config,
            Err(e) => {
                // Corrupted: back up and start fresh
                let bak = path.with_extension("toml.bak");
                let _ = fs::copy(path, &bak);
                log::warn!(
                    "could not parse {} (backed up as {}): {}",
                    path.display(),
                    bak.display(),
                    e
                );
                AppConfig::default()
            }
        },
        Err(_) => AppConfig::default(),
    }
}

/// Read the config from the default location.
pub fn read_config() -> AppConfig {
    read_config_from(&config_path())
}

/// Write the config to a specific path.
pub fn write_config_to(path: &Path, config: &AppConfig) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content =
        toml::to_string_pretty(config).map_err(|e| std::io::Error::other(e.to_string()))?;
    fs::write(path, content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use crate::model::config::StorageMode;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = read_config_from(&dir.path().join("config.toml"));
        assert_eq!(config.storage.mode, StorageMode::Local);
    }

    #[test]
    fn write_and_read_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("getdone").join("config.toml");
        let mut config = AppConfig::default();
        config.storage.mode = StorageMode::Remote;
        config.storage.bridge_dir = Some("/mnt/kv".into());
        write_config_to(&path, &config).unwrap();
        let loaded = read_config_from(&path);
        assert_eq!(loaded.storage.mode, StorageMode::Remote);
        assert_eq!(loaded.storage.bridge_dir, Some(PathBuf::from("/mnt/kv")));
    }

    #[test]
    fn corrupt_file_is_backed_up_and_reset() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "mode = [[[not toml").unwrap();
        let config = read_config_from(&path);
        assert_eq!(config.storage.mode, StorageMode::Local);
        assert!(path.with_extension("toml.bak").exists());
    }
}
