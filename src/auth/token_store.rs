//! Bearer credential storage.
//!
//! # Responsibilities
//! - Hold at most one credential per storage scope
//! - Session-lifetime (memory) or durable (file) scopes
//!
//! # Design Decisions
//! - No expiry or refresh tracking: a credential is valid until cleared
//! - `set`/`clear` never fail; durable write errors are logged and the
//!   in-memory value stays authoritative for this process

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock, RwLockWriteGuard};

use crate::config::schema::{SessionConfig, StorageKind};

/// Opaque bearer token.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Redacted form for logs (head4…tail4).
    pub fn redacted(&self) -> String {
        let t = self.0.as_str();
        match t.chars().count() {
            0..=8 => "…".into(),
            n => {
                let head: String = t.chars().take(4).collect();
                let tail: String = t.chars().skip(n - 4).collect();
                format!("{}…{}", head, tail)
            }
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Credential").field(&self.redacted()).finish()
    }
}

/// Storage for the single active credential.
pub trait TokenStore: Send + Sync {
    fn get(&self) -> Option<Credential>;
    fn set(&self, credential: Credential);
    fn clear(&self);
}

/// Session-lifetime store.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    slot: RwLock<Option<Credential>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<Credential> {
        self.slot.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn set(&self, credential: Credential) {
        *write_slot(&self.slot) = Some(credential);
    }

    fn clear(&self) {
        *write_slot(&self.slot) = None;
    }
}

/// A panic while holding the lock must not leave a rejected credential in place.
fn write_slot(slot: &RwLock<Option<Credential>>) -> RwLockWriteGuard<'_, Option<Credential>> {
    slot.write().unwrap_or_else(|e| e.into_inner())
}

/// Durable store: a JSON object file holding the credential under `key`.
///
/// Other keys in the file are preserved.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    key: String,
    cache: RwLock<Option<Credential>>,
}

impl FileTokenStore {
    /// Open the store, loading any credential already on disk.
    pub fn open(path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        let path = path.into();
        let key = key.into();
        let cached = read_entries(&path)
            .remove(&key)
            .filter(|t| !t.is_empty())
            .map(Credential::new);

        Self {
            path,
            key,
            cache: RwLock::new(cached),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, value: Option<&Credential>) {
        let mut entries = read_entries(&self.path);
        match value {
            Some(c) => {
                entries.insert(self.key.clone(), c.as_str().to_string());
            }
            None => {
                entries.remove(&self.key);
            }
        }

        if let Err(e) = write_entries(&self.path, &entries) {
            tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "Failed to persist credential store"
            );
        }
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Option<Credential> {
        self.cache.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn set(&self, credential: Credential) {
        self.persist(Some(&credential));
        *write_slot(&self.cache) = Some(credential);
    }

    fn clear(&self) {
        self.persist(None);
        *write_slot(&self.cache) = None;
    }
}

fn read_entries(path: &Path) -> BTreeMap<String, String> {
    match fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "Ignoring unreadable credential store");
            BTreeMap::new()
        }),
        Err(_) => BTreeMap::new(),
    }
}

fn write_entries(path: &Path, entries: &BTreeMap<String, String>) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(entries).map_err(std::io::Error::other)?;
    fs::write(path, content)
}

/// Build the store selected by the session configuration.
pub fn from_config(config: &SessionConfig) -> Arc<dyn TokenStore> {
    match (config.storage, config.path.as_deref()) {
        (StorageKind::File, Some(path)) => Arc::new(FileTokenStore::open(path, config.key.clone())),
        _ => Arc::new(MemoryTokenStore::new()),
    }
}
