use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::NamedTempFile;

use crate::host::{BridgeError, StorageBridge, StorageResult};

/// Write a file atomically via a temp file in the same directory
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// The browser-local-storage analogue: one file per key under a root
/// directory. Missing file means absent key.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        LocalStore { root: root.into() }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    pub fn get(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.key_path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn set(&self, key: &str, value: &str) -> io::Result<()> {
        fs::create_dir_all(&self.root)?;
        atomic_write(&self.key_path(key), value.as_bytes())
    }
}

/// A host storage bridge backed by a host-provided directory, the
/// `window.storage` analogue. Present only when the host configures a
/// bridge directory; a missing directory surfaces as a bridge error, which
/// the gateway turns into a fallback.
#[derive(Debug, Clone)]
pub struct DirBridge {
    root: PathBuf,
}

impl DirBridge {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirBridge { root: root.into() }
    }
}

#[async_trait]
impl StorageBridge for DirBridge {
    async fn get(&self, key: &str) -> Result<Option<StorageResult>, BridgeError> {
        if !self.root.is_dir() {
            return Err(BridgeError::Unavailable(format!(
                "bridge dir {} does not exist",
                self.root.display()
            )));
        }
        match fs::read_to_string(self.root.join(key)) {
            Ok(value) => Ok(Some(StorageResult {
                value: Some(value),
                key: Some(key.to_string()),
            })),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(BridgeError::Io(e)),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<StorageResult, BridgeError> {
        if !self.root.is_dir() {
            return Err(BridgeError::Unavailable(format!(
                "bridge dir {} does not exist",
                self.root.display()
            )));
        }
        atomic_write(&self.root.join(key), value.as_bytes())?;
        Ok(StorageResult {
            value: Some(value.to_string()),
            key: Some(key.to_string()),
        })
    }
}
