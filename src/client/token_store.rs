// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Calendar token persistence, one bundle per provider.
//!
//! Backed by the confidential store selected at startup (see
//! [`crate::client::storage::secure_store`]); on platforms without a
//! credential store the file fallback applies and is not confidential.

use crate::client::storage::KeyValueStore;
use crate::error::AppError;
use crate::models::{CalendarProvider, CalendarTokenBundle};

pub struct CalendarTokenStore<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> CalendarTokenStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The stored bundle for a provider.
    ///
    /// A missing, unreadable, or corrupt record all read as "not connected";
    /// the user reconnects instead of seeing a crash.
    pub fn get(&self, provider: CalendarProvider) -> Option<CalendarTokenBundle> {
        let raw = match self.store.get(provider.storage_key()) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                tracing::warn!(provider = %provider, error = %err, "Failed to read tokens");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(bundle) => Some(bundle),
            Err(err) => {
                tracing::warn!(provider = %provider, error = %err, "Corrupt token bundle");
                None
            }
        }
    }

    /// Store a bundle; write failures propagate so the caller can offer a
    /// retry/reconnect.
    pub fn set(
        &self,
        provider: CalendarProvider,
        bundle: &CalendarTokenBundle,
    ) -> Result<(), AppError> {
        let raw = serde_json::to_string(bundle)
            .map_err(|e| AppError::Storage(format!("Token serialization failed: {}", e)))?;
        self.store.set(provider.storage_key(), &raw)
    }

    /// Remove a provider's bundle. Disconnect always succeeds from the
    /// user's perspective; failures are only logged.
    pub fn clear(&self, provider: CalendarProvider) {
        if let Err(err) = self.store.remove(provider.storage_key()) {
            tracing::warn!(provider = %provider, error = %err, "Failed to clear tokens");
        }
    }
}
