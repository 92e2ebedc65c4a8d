// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Terminal step of the OAuth flow on the device: consume the relay's
//! redirect, store the tokens, mark the provider connected.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use url::Url;

use crate::client::settings_store::SettingsStore;
use crate::client::storage::KeyValueStore;
use crate::client::token_store::CalendarTokenStore;
use crate::error::AppError;
use crate::models::{CalendarProvider, CalendarTokenBundle};

/// Query parameters carried on the `…/oauth/google-callback` deep link.
#[derive(Debug, Default, Clone)]
pub struct CallbackParams {
    pub status: Option<String>,
    pub payload: Option<String>,
    pub error: Option<String>,
}

impl CallbackParams {
    /// Parse the parameters out of a full deep-link URL.
    pub fn from_deep_link(link: &str) -> Result<Self, AppError> {
        let url = Url::parse(link)
            .map_err(|_| AppError::BadRequest(format!("Invalid deep link: {}", link)))?;

        let mut params = Self::default();
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "status" => params.status = Some(value.into_owned()),
                "payload" => params.payload = Some(value.into_owned()),
                "error" => params.error = Some(value.into_owned()),
                _ => {}
            }
        }
        Ok(params)
    }
}

/// Where the callback screen lands. `Failed` is terminal and user-visible;
/// the shell navigates away from `Connected` on its own schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackOutcome {
    Connected,
    Failed { message: String },
}

/// Consumes Google callback redirects for the settings screen.
pub struct GoogleCallbackHandler<T: KeyValueStore, S: KeyValueStore> {
    tokens: CalendarTokenStore<T>,
    settings: SettingsStore<S>,
}

impl<T: KeyValueStore, S: KeyValueStore> GoogleCallbackHandler<T, S> {
    pub fn new(tokens: CalendarTokenStore<T>, settings: SettingsStore<S>) -> Self {
        Self { tokens, settings }
    }

    /// Process one callback delivery.
    ///
    /// Tokens are stored and the provider marked connected only on the full
    /// success path; every failure leaves settings and the token store
    /// untouched. An abandoned browser flow simply never calls this.
    pub fn handle(&self, params: &CallbackParams) -> CallbackOutcome {
        if params.error.is_some() || params.status.as_deref() == Some("error") {
            let message = params
                .error
                .clone()
                .unwrap_or_else(|| "Google Calendar connection failed.".to_string());
            return CallbackOutcome::Failed { message };
        }

        let Some(payload) = &params.payload else {
            return CallbackOutcome::Failed {
                message: "Missing Google Calendar payload.".to_string(),
            };
        };

        let bundle = match decode_payload(payload) {
            Ok(bundle) => bundle,
            Err(err) => {
                return CallbackOutcome::Failed {
                    message: err.to_string(),
                }
            }
        };

        if let Err(err) = self.tokens.set(CalendarProvider::Google, &bundle) {
            return CallbackOutcome::Failed {
                message: format!("Failed to store Google Calendar tokens: {}", err),
            };
        }

        if let Err(err) = self
            .settings
            .update(|s| s.google_calendar_connected = true)
        {
            return CallbackOutcome::Failed {
                message: format!("Failed to update settings: {}", err),
            };
        }

        tracing::info!("Google Calendar connected");
        CallbackOutcome::Connected
    }
}

fn decode_payload(payload: &str) -> Result<CalendarTokenBundle, AppError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|_| AppError::BadRequest("Payload is not valid base64url".to_string()))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| AppError::BadRequest(format!("Payload parse failed: {}", e)))
}
