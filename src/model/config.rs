use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration from config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// Which persistence tier backs the domain store. A construction-time choice,
/// not switchable at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageMode {
    /// Whole-collection blobs through the persistence gateway
    #[default]
    Local,
    /// Per-record upsert/delete through a remote record store
    Remote,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub mode: StorageMode,
    /// Where the local tier keeps its key files (default: XDG data dir)
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    /// Host storage bridge directory. When set, the gateway prefers it over
    /// the local tier on every call.
    #[serde(default)]
    pub bridge_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Default: see crate::model::project::DEFAULT_COLOR
    #[serde(default = "default_accent")]
    pub accent_color: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            accent_color: default_accent(),
        }
    }
}

fn default_accent() -> String {
    crate::model::project::DEFAULT_COLOR.to_string()
}
