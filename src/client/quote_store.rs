// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Current-quote slot and bounded quote history.

use crate::client::storage::{keys, KeyValueStore};
use crate::error::AppError;
use crate::models::Quote;

/// History keeps the 50 most recent quotes, newest first.
pub const HISTORY_CAPACITY: usize = 50;

pub struct QuoteStore<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> QuoteStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The quote currently on the home screen, if any.
    pub fn current(&self) -> Option<Quote> {
        let raw = self.store.get(keys::CURRENT_QUOTE).ok()??;
        match serde_json::from_str(&raw) {
            Ok(quote) => Some(quote),
            Err(err) => {
                tracing::warn!(error = %err, "Corrupt current-quote blob");
                None
            }
        }
    }

    pub fn set_current(&self, quote: &Quote) -> Result<(), AppError> {
        let raw = serde_json::to_string(quote)
            .map_err(|e| AppError::Storage(format!("Quote serialization failed: {}", e)))?;
        self.store.set(keys::CURRENT_QUOTE, &raw)
    }

    /// Quote history, newest first. Corrupt or missing history reads as
    /// empty.
    pub fn history(&self) -> Vec<Quote> {
        let raw = match self.store.get(keys::QUOTE_HISTORY) {
            Ok(Some(raw)) => raw,
            _ => return Vec::new(),
        };
        match serde_json::from_str(&raw) {
            Ok(history) => history,
            Err(err) => {
                tracing::warn!(error = %err, "Corrupt quote-history blob");
                Vec::new()
            }
        }
    }

    /// Prepend a quote to history, evicting beyond [`HISTORY_CAPACITY`].
    pub fn add_to_history(&self, quote: &Quote) -> Result<(), AppError> {
        let mut history = self.history();
        history.insert(0, quote.clone());
        history.truncate(HISTORY_CAPACITY);

        let raw = serde_json::to_string(&history)
            .map_err(|e| AppError::Storage(format!("History serialization failed: {}", e)))?;
        self.store.set(keys::QUOTE_HISTORY, &raw)
    }

    /// Make a freshly fetched quote both current and part of history.
    pub fn record(&self, quote: &Quote) -> Result<(), AppError> {
        self.set_current(quote)?;
        self.add_to_history(quote)
    }
}
