// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Key-value storage backends.
//!
//! One capability trait, three implementations: the OS credential store for
//! confidential data, a plain file directory as the non-confidential
//! fallback (the analog of browser localStorage on web builds), and an
//! in-memory map for tests.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::AppError;

/// Fixed keys for the non-confidential local blobs.
pub mod keys {
    pub const SETTINGS: &str = "peptalk_settings";
    pub const CURRENT_QUOTE: &str = "peptalk_current_quote";
    pub const QUOTE_HISTORY: &str = "peptalk_quote_history";
}

/// Atomic get/set/remove of opaque string blobs under string keys.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, AppError>;
    fn set(&self, key: &str, value: &str) -> Result<(), AppError>;
    fn remove(&self, key: &str) -> Result<(), AppError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), AppError> {
        (**self).remove(key)
    }
}

/// In-memory store for tests.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), AppError> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

/// One file per key under a data directory.
///
/// NOT confidential: anything with filesystem access can read it. Used for
/// the non-secret blobs, and as the token fallback only where no credential
/// store exists (the localStorage situation on web).
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, AppError> {
        let root = root.into();
        fs::create_dir_all(&root)
            .map_err(|e| AppError::Storage(format!("Failed to create {}: {}", root.display(), e)))?;
        Ok(Self { root })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Storage(format!("Failed to read {}: {}", key, e))),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        // Write-then-rename keeps a crashed write from corrupting the blob.
        let path = self.path_for(key);
        let tmp = self.root.join(format!("{}.json.tmp", key));
        fs::write(&tmp, value)
            .and_then(|_| fs::rename(&tmp, &path))
            .map_err(|e| AppError::Storage(format!("Failed to write {}: {}", key, e)))
    }

    fn remove(&self, key: &str) -> Result<(), AppError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Storage(format!(
                "Failed to remove {}: {}",
                key, e
            ))),
        }
    }
}

/// OS credential store (Keychain, Secret Service, Credential Manager).
pub struct KeyringStore {
    service: String,
}

impl KeyringStore {
    pub fn new() -> Self {
        Self {
            service: "peptalk-buddy".to_string(),
        }
    }

    fn entry(&self, key: &str) -> Result<keyring::Entry, AppError> {
        keyring::Entry::new(&self.service, key)
            .map_err(|e| AppError::Storage(format!("Keyring entry failed: {}", e)))
    }

    /// Whether the credential store is actually usable on this machine.
    pub fn available(&self) -> bool {
        match self.entry("availability_probe") {
            Ok(entry) => !matches!(
                entry.get_password(),
                Err(keyring::Error::PlatformFailure(_))
                    | Err(keyring::Error::NoStorageAccess(_))
            ),
            Err(_) => false,
        }
    }
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for KeyringStore {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        match self.entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(AppError::Storage(format!("Keyring read failed: {}", e))),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.entry(key)?
            .set_password(value)
            .map_err(|e| AppError::Storage(format!("Keyring write failed: {}", e)))
    }

    fn remove(&self, key: &str) -> Result<(), AppError> {
        match self.entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(AppError::Storage(format!("Keyring delete failed: {}", e))),
        }
    }
}

/// Pick the confidential backend at startup: the credential store when it
/// works, otherwise a file fallback under `fallback_dir`.
pub fn secure_store(fallback_dir: &Path) -> Result<Box<dyn KeyValueStore>, AppError> {
    let keyring = KeyringStore::new();
    if keyring.available() {
        return Ok(Box::new(keyring));
    }

    tracing::warn!(
        dir = %fallback_dir.display(),
        "No usable credential store; falling back to file storage (not confidential)"
    );
    Ok(Box::new(FileStore::new(fallback_dir)?))
}
