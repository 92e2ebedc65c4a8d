// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Settings persistence over a key-value backend.

use validator::Validate;

use crate::client::storage::{keys, KeyValueStore};
use crate::error::AppError;
use crate::models::Settings;

/// Reads and writes the settings blob under `peptalk_settings`.
pub struct SettingsStore<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> SettingsStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Load settings, creating defaults on first run.
    ///
    /// A missing or corrupt blob is never an error: the user just sees
    /// default settings and the next save repairs the record.
    pub fn load(&self) -> Settings {
        let raw = match self.store.get(keys::SETTINGS) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Settings::default(),
            Err(err) => {
                tracing::warn!(error = %err, "Failed to read settings, using defaults");
                return Settings::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(settings) => settings,
            Err(err) => {
                tracing::warn!(error = %err, "Corrupt settings blob, using defaults");
                Settings::default()
            }
        }
    }

    /// Validate and persist a settings record.
    pub fn save(&self, settings: &Settings) -> Result<(), AppError> {
        settings
            .validate()
            .map_err(|e| AppError::BadRequest(format!("Invalid settings: {}", e)))?;

        let raw = serde_json::to_string(settings)
            .map_err(|e| AppError::Storage(format!("Settings serialization failed: {}", e)))?;
        self.store.set(keys::SETTINGS, &raw)
    }

    /// Read-modify-write helper; returns the saved record.
    pub fn update(&self, f: impl FnOnce(&mut Settings)) -> Result<Settings, AppError> {
        let mut settings = self.load();
        f(&mut settings);
        self.save(&settings)?;
        Ok(settings)
    }
}
