// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Calendar provider token bundle, as handed back by the OAuth relay.

use serde::{Deserialize, Serialize};
use std::fmt;

#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Calendar providers the app can link. Only Google has a full OAuth flow;
/// Apple is modeled but not wired up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalendarProvider {
    Google,
    Apple,
}

impl CalendarProvider {
    /// Key for this provider's bundle in the confidential store.
    pub fn storage_key(&self) -> &'static str {
        match self {
            CalendarProvider::Google => "google_calendar_tokens",
            CalendarProvider::Apple => "apple_calendar_tokens",
        }
    }
}

impl fmt::Display for CalendarProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalendarProvider::Google => write!(f, "google"),
            CalendarProvider::Apple => write!(f, "apple"),
        }
    }
}

/// Result of the relay's one-calendar verification call, bundled into the
/// success payload as a confidence signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/lib/generated/")
)]
pub struct CalendarAccessTest {
    pub calendar_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_text: Option<String>,
}

/// Token bundle for one calendar provider.
///
/// Written once per successful OAuth flow, overwritten on reconnect,
/// removed on disconnect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/lib/generated/")
)]
pub struct CalendarTokenBundle {
    pub access_token: String,
    /// Empty string when the provider withheld it (repeat consent)
    pub refresh_token: String,
    /// Access token expiry (epoch milliseconds)
    pub expires_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test: Option<CalendarAccessTest>,
}

impl CalendarTokenBundle {
    /// Whether the access token has expired as of `now_ms`.
    pub fn is_expired(&self, now_ms: i64) -> bool {
        now_ms >= self.expires_at
    }
}
