//! Capability boundaries provided by the hosting environment.
//!
//! Each external collaborator (host storage bridge, session/auth, notification
//! display, install prompt) is a trait injected at construction, so the rest
//! of the crate never probes for capabilities ad hoc and tests can substitute
//! fakes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

// ---------------------------------------------------------------------------
// Host storage bridge
// ---------------------------------------------------------------------------

/// Result shape returned by the host storage bridge
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

/// Error from a storage bridge call. The gateway treats any error as "this
/// tier is unavailable for this call" and falls back.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("bridge io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("bridge unavailable: {0}")]
    Unavailable(String),
}

/// Optional host-provided key-value store, preferred over the local tier
/// when present.
#[async_trait]
pub trait StorageBridge: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<StorageResult>, BridgeError>;
    async fn set(&self, key: &str, value: &str) -> Result<StorageResult, BridgeError>;
}

// ---------------------------------------------------------------------------
// Session / auth
// ---------------------------------------------------------------------------

/// An authenticated user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Sign-in material accepted by the session boundary
#[derive(Debug, Clone)]
pub enum Credentials {
    Password { email: String, password: String },
    /// Opaque token from an OAuth provider; the exchange is the host's concern
    OAuth { provider: String, token: String },
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("auth backend error: {0}")]
    Backend(String),
}

/// Supplies the current user identity (or none) and raises change events on
/// sign-in/sign-out. All owner-scoped store operations key on this.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    fn current_user(&self) -> Option<User>;
    /// Receives the user-or-none value on every sign-in/sign-out
    fn subscribe(&self) -> watch::Receiver<Option<User>>;
    async fn sign_up(&self, email: &str, password: &str) -> Result<User, SessionError>;
    async fn sign_in(&self, credentials: Credentials) -> Result<User, SessionError>;
    async fn sign_out(&self);
}

/// Reference session provider holding the user in process memory. Accepts any
/// credentials; a production deployment injects a real auth host instead.
pub struct StaticSession {
    tx: watch::Sender<Option<User>>,
}

impl StaticSession {
    pub fn new(user: Option<User>) -> Self {
        let (tx, _) = watch::channel(user);
        StaticSession { tx }
    }

    pub fn signed_in(user_id: &str) -> Self {
        Self::new(Some(User {
            id: user_id.to_string(),
            email: None,
        }))
    }
}

#[async_trait]
impl SessionProvider for StaticSession {
    fn current_user(&self) -> Option<User> {
        self.tx.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Option<User>> {
        self.tx.subscribe()
    }

    async fn sign_up(&self, email: &str, _password: &str) -> Result<User, SessionError> {
        let user = User {
            id: format!("user-{}", chrono::Utc::now().timestamp_millis()),
            email: Some(email.to_string()),
        };
        self.tx.send_replace(Some(user.clone()));
        Ok(user)
    }

    async fn sign_in(&self, credentials: Credentials) -> Result<User, SessionError> {
        let user = match credentials {
            Credentials::Password { email, .. } => User {
                id: email.clone(),
                email: Some(email),
            },
            Credentials::OAuth { provider, .. } => User {
                id: provider,
                email: None,
            },
        };
        self.tx.send_replace(Some(user.clone()));
        Ok(user)
    }

    async fn sign_out(&self) {
        self.tx.send_replace(None);
    }
}

// ---------------------------------------------------------------------------
// Notification display
// ---------------------------------------------------------------------------

/// Options passed through to the host's notification surface
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationOptions {
    pub body: String,
    pub icon: Option<String>,
    /// Re-displaying with the same tag replaces any still-pending
    /// notification instead of duplicating it
    pub tag: String,
}

/// Notification-capable host interface. Callers are expected to have already
/// obtained whatever runtime permission the host requires; display is
/// fire-and-forget and best-effort.
#[async_trait]
pub trait NotificationHost: Send + Sync {
    async fn request_display(&self, title: &str, options: NotificationOptions);
}

// ---------------------------------------------------------------------------
// Install prompt
// ---------------------------------------------------------------------------

/// Outcome of the host's install prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    Accepted,
    Dismissed,
}

/// A deferred "can install" prompt handed over by the host. `prompt()`
/// triggers the host dialog; `user_choice()` resolves with the outcome.
#[async_trait]
pub trait InstallPrompt: Send + Sync {
    async fn prompt(&self);
    async fn user_choice(&self) -> InstallOutcome;
}
