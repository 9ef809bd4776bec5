//! Session/identity context shared by the resource client, the access guard
//! and every screen controller.
//!
//! The bearer token is the only cross-view mutable state. It is read before
//! every outbound request and dropped (memory and store) on any 401.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::config::ClientConfig;
use crate::models::{Role, User};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Credential store IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Credential store is corrupt: {0}")]
    Json(#[from] serde_json::Error),
}

// ═══════════════════════════════════════════════════════════
// AuthToken
// ═══════════════════════════════════════════════════════════

/// Bearer token, zeroed on drop. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq, Zeroize, Serialize, Deserialize)]
#[zeroize(drop)]
#[serde(transparent)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub(crate) fn expose(&self) -> &str {
        &self.0
    }

    /// `Authorization` header value.
    pub(crate) fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AuthToken(<redacted>)")
    }
}

/// What survives a restart: the token and the last known user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredCredentials {
    pub token: AuthToken,
    pub user: User,
}

// ═══════════════════════════════════════════════════════════
// Credential stores
// ═══════════════════════════════════════════════════════════

pub trait CredentialStore: Send + Sync {
    fn load(&self) -> Result<Option<StoredCredentials>, StoreError>;
    fn save(&self, credentials: &StoredCredentials) -> Result<(), StoreError>;
    fn clear(&self) -> Result<(), StoreError>;
}

/// JSON file, owner-only on unix.
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Option<StoredCredentials>, StoreError> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, credentials: &StoredCredentials) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let bytes = serde_json::to_vec(credentials)?;
        std::fs::write(&self.path, bytes)?;
        set_owner_only(&self.path)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(unix)]
fn set_owner_only(path: &Path) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn set_owner_only(_path: &Path) -> Result<(), StoreError> {
    Ok(())
}

/// Process-lifetime store.
#[derive(Default)]
pub struct MemoryCredentialStore {
    inner: Mutex<Option<StoredCredentials>>,
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Result<Option<StoredCredentials>, StoreError> {
        Ok(self.inner.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }

    fn save(&self, credentials: &StoredCredentials) -> Result<(), StoreError> {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner) = Some(credentials.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════
// SessionState
// ═══════════════════════════════════════════════════════════

/// Guard input: who is signed in, and whether that is still being resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub user: Option<User>,
    pub loading: bool,
}

impl SessionSnapshot {
    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().and_then(|u| u.role)
    }
}

pub struct SessionState {
    user: RwLock<Option<User>>,
    token: RwLock<Option<AuthToken>>,
    loading: RwLock<bool>,
    store: Box<dyn CredentialStore>,
}

impl SessionState {
    /// Open a session over `store`, picking up any persisted credentials.
    /// A corrupt store is cleared and the session starts signed out.
    pub fn new(store: Box<dyn CredentialStore>) -> Self {
        let stored = match store.load() {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!(error = %e, "Stored credentials unreadable, starting signed out");
                if let Err(e) = store.clear() {
                    tracing::warn!(error = %e, "Failed to clear credential store");
                }
                None
            }
        };
        let (token, user) = match stored {
            Some(StoredCredentials { token, user }) => (Some(token), Some(user)),
            None => (None, None),
        };
        Self {
            user: RwLock::new(user),
            token: RwLock::new(token),
            loading: RwLock::new(false),
            store,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryCredentialStore::default()))
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        match &config.session_file {
            Some(path) => Self::new(Box::new(FileCredentialStore::new(path))),
            None => Self::in_memory(),
        }
    }

    // ── Read path ───────────────────────────────────────────

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            user: self.user(),
            loading: *self.loading.read().unwrap_or_else(PoisonError::into_inner),
        }
    }

    pub fn user(&self) -> Option<User> {
        self.user.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn role(&self) -> Option<Role> {
        self.user
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .and_then(|u| u.role)
    }

    /// Current bearer token, read before every outbound request.
    pub fn token(&self) -> Option<AuthToken> {
        self.token.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.read().unwrap_or_else(PoisonError::into_inner).is_some()
    }

    // ── Write path ──────────────────────────────────────────

    pub fn begin_resolution(&self) {
        *self.loading.write().unwrap_or_else(PoisonError::into_inner) = true;
    }

    pub fn finish_resolution(&self) {
        *self.loading.write().unwrap_or_else(PoisonError::into_inner) = false;
    }

    /// Install credentials after a successful login. Persistence failures are
    /// logged; the in-memory session stays usable.
    pub fn establish(&self, token: AuthToken, user: User) {
        let credentials = StoredCredentials { token, user };
        if let Err(e) = self.store.save(&credentials) {
            tracing::warn!(error = %e, "Credentials not persisted");
        }
        tracing::info!(user_id = credentials.user.id, role = ?credentials.user.role, "Session established");
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(credentials.token.clone());
        *self.user.write().unwrap_or_else(PoisonError::into_inner) = Some(credentials.user);
    }

    /// Replace the cached user (after `GET /auth/user/`), keeping the token.
    pub fn refresh_user(&self, user: User) {
        if let Some(token) = self.token() {
            let credentials = StoredCredentials {
                token,
                user: user.clone(),
            };
            if let Err(e) = self.store.save(&credentials) {
                tracing::warn!(error = %e, "Refreshed user not persisted");
            }
        }
        *self.user.write().unwrap_or_else(PoisonError::into_inner) = Some(user);
    }

    /// Drop the token and user from memory and from the store.
    /// Returns `true` if credentials were present.
    pub fn invalidate(&self) -> bool {
        let had_token = self
            .token
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .is_some();
        let had_user = self
            .user
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .is_some();
        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "Failed to clear credential store");
        }
        had_token || had_user
    }
}
