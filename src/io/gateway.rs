use std::sync::Arc;

use crate::host::{StorageBridge, StorageResult};
use crate::io::local::LocalStore;

/// Logical key for the serialized task collection
pub const TASKS_KEY: &str = "things-tasks";
/// Logical key for the serialized project collection
pub const PROJECTS_KEY: &str = "things-projects";
/// Logical key for the persisted view context
pub const STATE_KEY: &str = "things-state";

/// Two-tier "get/set a named blob" store: a host-provided bridge when
/// present, a local file-per-key store otherwise.
///
/// The bridge is probed on every call, and any bridge error falls back to the
/// local tier for that call only: one fallback attempt, no retries, no
/// persistent mode switch. Failures from both tiers degrade to `None`;
/// nothing here ever returns an error to the caller.
#[derive(Clone)]
pub struct Gateway {
    bridge: Option<Arc<dyn StorageBridge>>,
    local: LocalStore,
}

impl Gateway {
    pub fn new(bridge: Option<Arc<dyn StorageBridge>>, local: LocalStore) -> Self {
        Gateway { bridge, local }
    }

    /// Local-tier-only gateway (no host bridge configured)
    pub fn local_only(local: LocalStore) -> Self {
        Gateway {
            bridge: None,
            local,
        }
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        if let Some(bridge) = &self.bridge {
            match bridge.get(key).await {
                Ok(result) => return result.and_then(|r| r.value),
                Err(e) => {
                    log::debug!("bridge get '{}' failed, using local tier: {}", key, e);
                }
            }
        }
        match self.local.get(key) {
            Ok(value) => value,
            Err(e) => {
                log::error!("local get '{}' failed: {}", key, e);
                None
            }
        }
    }

    pub async fn set(&self, key: &str, value: &str) -> Option<StorageResult> {
        if let Some(bridge) = &self.bridge {
            match bridge.set(key, value).await {
                Ok(result) => return Some(result),
                Err(e) => {
                    log::debug!("bridge set '{}' failed, using local tier: {}", key, e);
                }
            }
        }
        match self.local.set(key, value) {
            Ok(()) => Some(StorageResult {
                value: Some(value.to_string()),
                key: Some(key.to_string()),
            }),
            Err(e) => {
                log::error!("local set '{}' failed: {}", key, e);
                None
            }
        }
    }
}
