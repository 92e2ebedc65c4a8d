// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Quote model.

use serde::{Deserialize, Serialize};

#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// A motivational quote. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/lib/generated/")
)]
pub struct Quote {
    pub text: String,
    pub author: String,
    /// When the quote was fetched (epoch milliseconds)
    pub timestamp: i64,
}

impl Quote {
    pub fn new(text: impl Into<String>, author: impl Into<String>, timestamp: i64) -> Self {
        Self {
            text: text.into(),
            author: author.into(),
            timestamp,
        }
    }
}

/// Quote row in the hosted `quotes` table (per-user history).
///
/// Unlike the local blobs, the hosted schema uses snake_case columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRecord {
    pub id: String,
    pub user_id: String,
    pub text: String,
    pub author: String,
    pub is_favorite: bool,
    pub created_at: String,
}
