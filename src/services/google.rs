// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Google OAuth and Calendar API client.
//!
//! Handles:
//! - Authorization URL construction
//! - Authorization-code exchange at the token endpoint
//! - The one-calendar verification call after a successful exchange
//!
//! Both outbound calls share a 10 s timeout and are never retried; a failed
//! exchange surfaces immediately instead of hanging the user's browser tab.

use std::time::Duration;

use serde::Deserialize;

use crate::error::AppError;
use crate::models::CalendarAccessTest;

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_CALENDAR_LIST_URL: &str =
    "https://www.googleapis.com/calendar/v3/users/me/calendarList";

/// Read-only calendar access is all the reminder feature needs.
pub const GOOGLE_SCOPE: &str = "https://www.googleapis.com/auth/calendar.readonly";

const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);

/// Google OAuth/Calendar client.
#[derive(Clone)]
pub struct GoogleCalendarClient {
    http: reqwest::Client,
    auth_url: String,
    token_url: String,
    calendar_list_url: String,
    client_id: String,
    client_secret: String,
}

impl GoogleCalendarClient {
    /// Create a new client with OAuth credentials.
    pub fn new(client_id: String, client_secret: String) -> Self {
        let http = reqwest::Client::builder()
            .timeout(UPSTREAM_TIMEOUT)
            .build()
            .expect("failed to build HTTP client");

        Self {
            http,
            auth_url: GOOGLE_AUTH_URL.to_string(),
            token_url: GOOGLE_TOKEN_URL.to_string(),
            calendar_list_url: GOOGLE_CALENDAR_LIST_URL.to_string(),
            client_id,
            client_secret,
        }
    }

    /// Point all endpoints at a different base URL (tests).
    pub fn with_base_url(mut self, base: &str) -> Self {
        let base = base.trim_end_matches('/');
        self.auth_url = format!("{}/o/oauth2/v2/auth", base);
        self.token_url = format!("{}/token", base);
        self.calendar_list_url = format!("{}/calendar/v3/users/me/calendarList", base);
        self
    }

    /// Build the authorization URL the user's browser is sent to.
    ///
    /// `access_type=offline` + `prompt=consent` ask Google for a refresh
    /// token; on repeat consent it may still be withheld.
    pub fn build_auth_url(&self, redirect_uri: &str, state: &str) -> String {
        format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&access_type=offline&prompt=consent&state={}",
            self.auth_url,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(redirect_uri),
            urlencoding::encode(GOOGLE_SCOPE),
            state
        )
    }

    /// Exchange an authorization code for an access/refresh token pair.
    pub async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<GoogleTokenResponse, AppError> {
        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("code", code),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("redirect_uri", redirect_uri),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| AppError::GoogleApi(format!("Token exchange request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::GoogleApi(format!(
                "Token exchange failed: HTTP {}: {}",
                status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::GoogleApi(format!("Token response parse error: {}", e)))
    }

    /// List up to one calendar with the fresh access token.
    ///
    /// Purely a confidence signal for the success payload; an unreadable
    /// item list still counts as reachable (count 0), but a non-2xx status
    /// fails the whole flow.
    pub async fn test_calendar_access(
        &self,
        access_token: &str,
    ) -> Result<CalendarAccessTest, AppError> {
        let url = format!("{}?maxResults=1", self.calendar_list_url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::GoogleApi(format!("Calendar list request failed: {}", e)))?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(AppError::GoogleApi(format!(
                "Calendar list test failed: HTTP {}: {}",
                status, body
            )));
        }

        let calendar_count = serde_json::from_str::<CalendarListResponse>(&body)
            .map(|list| list.items.len() as u32)
            .unwrap_or(0);

        Ok(CalendarAccessTest {
            calendar_count,
            response_text: Some(body),
        })
    }
}

/// Token endpoint response.
///
/// `refresh_token` is optional: Google withholds it when the user has
/// already consented and the request did not force a new grant.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleTokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub expires_in: i64,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
}

#[derive(Deserialize)]
struct CalendarListResponse {
    #[serde(default)]
    items: Vec<serde_json::Value>,
}
