// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Supabase REST client for the hosted user records.
//!
//! Talks straight to the PostgREST endpoint with the service role key
//! (bypasses row-level security). An unconfigured deployment degrades to
//! warned no-ops so the relay keeps running without the remote database.

use chrono::{SecondsFormat, Utc};

use crate::db::tables;
use crate::error::AppError;
use crate::models::{NewUser, Quote, QuoteRecord, Settings, User, UserRole, UserSettingsRecord};

/// Supabase database client.
#[derive(Clone)]
pub struct SupabaseDb {
    http: reqwest::Client,
    /// None when SUPABASE_URL / service role key are absent (offline mode).
    endpoint: Option<Endpoint>,
    owner_open_id: String,
}

#[derive(Clone)]
struct Endpoint {
    base_url: String,
    service_role_key: String,
}

impl SupabaseDb {
    /// Create a client; empty URL or key yields a warned offline handle.
    pub fn new(base_url: &str, service_role_key: &str, owner_open_id: &str) -> Self {
        let endpoint = if base_url.is_empty() || service_role_key.is_empty() {
            tracing::warn!("Supabase is not configured, user records are disabled");
            None
        } else {
            Some(Endpoint {
                base_url: base_url.trim_end_matches('/').to_string(),
                service_role_key: service_role_key.to_string(),
            })
        };

        Self {
            http: reqwest::Client::new(),
            endpoint,
            owner_open_id: owner_open_id.to_string(),
        }
    }

    /// Create an offline client for testing.
    pub fn new_mock() -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: None,
            owner_open_id: String::new(),
        }
    }

    pub fn configured(&self) -> bool {
        self.endpoint.is_some()
    }

    fn rest_url(&self, endpoint: &Endpoint, table: &str) -> String {
        format!("{}/rest/v1/{}", endpoint.base_url, table)
    }

    /// Create or merge a user row keyed by openId.
    ///
    /// The owner openId is promoted to the admin role unless the caller set
    /// a role explicitly. `lastSignedIn` defaults to now.
    pub async fn upsert_user(&self, user: &NewUser) -> Result<(), AppError> {
        if user.open_id.is_empty() {
            return Err(AppError::BadRequest(
                "user openId is required for upsert".to_string(),
            ));
        }

        let Some(endpoint) = &self.endpoint else {
            tracing::warn!("Cannot upsert user: database not available");
            return Ok(());
        };

        let role = user.role.unwrap_or({
            if !self.owner_open_id.is_empty() && user.open_id == self.owner_open_id {
                UserRole::Admin
            } else {
                UserRole::User
            }
        });
        let now = rfc3339_now();
        let last_signed_in = user.last_signed_in.clone().unwrap_or_else(rfc3339_now);

        let payload = serde_json::json!({
            "openId": user.open_id,
            "name": user.name,
            "email": user.email,
            "loginMethod": user.login_method,
            "role": role,
            "lastSignedIn": last_signed_in,
            "updatedAt": now,
        });

        let url = format!(
            "{}?on_conflict=openId",
            self.rest_url(endpoint, tables::USERS)
        );
        let response = self
            .http
            .post(&url)
            .header("apikey", &endpoint.service_role_key)
            .bearer_auth(&endpoint.service_role_key)
            .header("Prefer", "resolution=merge-duplicates")
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::Database(format!("Supabase upsert request failed: {}", e)))?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Database(format!(
                "Supabase upsert failed: {}",
                body
            )));
        }

        Ok(())
    }

    /// Look up a user row by openId.
    ///
    /// A failed lookup is logged and reported as absent rather than raised;
    /// nothing user-visible depends on this read succeeding.
    pub async fn get_user_by_open_id(&self, open_id: &str) -> Result<Option<User>, AppError> {
        let Some(endpoint) = &self.endpoint else {
            tracing::warn!("Cannot get user: database not available");
            return Ok(None);
        };

        let url = format!(
            "{}?openId=eq.{}&limit=1",
            self.rest_url(endpoint, tables::USERS),
            urlencoding::encode(open_id)
        );

        let response = self
            .http
            .get(&url)
            .header("apikey", &endpoint.service_role_key)
            .bearer_auth(&endpoint.service_role_key)
            .send()
            .await
            .map_err(|e| AppError::Database(format!("Supabase get request failed: {}", e)))?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(error = %body, "Supabase get user failed");
            return Ok(None);
        }

        let mut rows: Vec<User> = response
            .json()
            .await
            .map_err(|e| AppError::Database(format!("Supabase response parse error: {}", e)))?;

        if rows.is_empty() {
            Ok(None)
        } else {
            Ok(Some(rows.remove(0)))
        }
    }

    /// Append one fetched quote to the user's hosted history.
    pub async fn save_quote(&self, user_id: &str, quote: &Quote) -> Result<(), AppError> {
        let Some(endpoint) = &self.endpoint else {
            tracing::warn!("Cannot save quote: database not available");
            return Ok(());
        };

        let payload = serde_json::json!({
            "user_id": user_id,
            "text": quote.text,
            "author": quote.author,
        });

        let response = self
            .http
            .post(self.rest_url(endpoint, tables::QUOTES))
            .header("apikey", &endpoint.service_role_key)
            .bearer_auth(&endpoint.service_role_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::Database(format!("Supabase quote insert failed: {}", e)))?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Database(format!(
                "Supabase quote insert failed: {}",
                body
            )));
        }

        Ok(())
    }

    /// The user's hosted quote history, newest first.
    ///
    /// Like the local history, a failed read degrades to empty rather than
    /// blocking the quote screen.
    pub async fn get_quote_history(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<QuoteRecord>, AppError> {
        let Some(endpoint) = &self.endpoint else {
            tracing::warn!("Cannot get quote history: database not available");
            return Ok(Vec::new());
        };

        let url = format!(
            "{}?user_id=eq.{}&order=created_at.desc&limit={}",
            self.rest_url(endpoint, tables::QUOTES),
            urlencoding::encode(user_id),
            limit
        );

        let response = self
            .http
            .get(&url)
            .header("apikey", &endpoint.service_role_key)
            .bearer_auth(&endpoint.service_role_key)
            .send()
            .await
            .map_err(|e| AppError::Database(format!("Supabase history request failed: {}", e)))?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(error = %body, "Supabase quote history read failed");
            return Ok(Vec::new());
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Database(format!("Supabase response parse error: {}", e)))
    }

    /// Flip the favorite flag on one hosted quote.
    pub async fn set_quote_favorite(
        &self,
        quote_id: &str,
        is_favorite: bool,
    ) -> Result<(), AppError> {
        let Some(endpoint) = &self.endpoint else {
            tracing::warn!("Cannot update quote: database not available");
            return Ok(());
        };

        let url = format!(
            "{}?id=eq.{}",
            self.rest_url(endpoint, tables::QUOTES),
            urlencoding::encode(quote_id)
        );

        let response = self
            .http
            .patch(&url)
            .header("apikey", &endpoint.service_role_key)
            .bearer_auth(&endpoint.service_role_key)
            .json(&serde_json::json!({ "is_favorite": is_favorite }))
            .send()
            .await
            .map_err(|e| AppError::Database(format!("Supabase quote update failed: {}", e)))?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Database(format!(
                "Supabase quote update failed: {}",
                body
            )));
        }

        Ok(())
    }

    /// The user's hosted settings row, if one exists.
    pub async fn get_user_settings(
        &self,
        user_id: &str,
    ) -> Result<Option<UserSettingsRecord>, AppError> {
        let Some(endpoint) = &self.endpoint else {
            tracing::warn!("Cannot get settings: database not available");
            return Ok(None);
        };

        let url = format!(
            "{}?user_id=eq.{}&limit=1",
            self.rest_url(endpoint, tables::USER_SETTINGS),
            urlencoding::encode(user_id)
        );

        let response = self
            .http
            .get(&url)
            .header("apikey", &endpoint.service_role_key)
            .bearer_auth(&endpoint.service_role_key)
            .send()
            .await
            .map_err(|e| AppError::Database(format!("Supabase settings request failed: {}", e)))?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(error = %body, "Supabase settings read failed");
            return Ok(None);
        }

        let mut rows: Vec<UserSettingsRecord> = response
            .json()
            .await
            .map_err(|e| AppError::Database(format!("Supabase response parse error: {}", e)))?;

        if rows.is_empty() {
            Ok(None)
        } else {
            Ok(Some(rows.remove(0)))
        }
    }

    /// Create or merge the user's hosted settings row, keyed by user_id.
    ///
    /// `saved_custom_times` stays device-local; the hosted row only mirrors
    /// the active preferences.
    pub async fn upsert_user_settings(
        &self,
        user_id: &str,
        settings: &Settings,
    ) -> Result<(), AppError> {
        let Some(endpoint) = &self.endpoint else {
            tracing::warn!("Cannot upsert settings: database not available");
            return Ok(());
        };

        let payload = serde_json::json!({
            "user_id": user_id,
            "notification_frequency": settings.notification_frequency,
            "custom_times": settings.custom_times,
            "calendar_integration_enabled": settings.calendar_integration_enabled,
            "google_calendar_connected": settings.google_calendar_connected,
            "apple_calendar_connected": settings.apple_calendar_connected,
            "notifications_enabled": settings.notifications_enabled,
            "updated_at": rfc3339_now(),
        });

        let url = format!(
            "{}?on_conflict=user_id",
            self.rest_url(endpoint, tables::USER_SETTINGS)
        );
        let response = self
            .http
            .post(&url)
            .header("apikey", &endpoint.service_role_key)
            .bearer_auth(&endpoint.service_role_key)
            .header("Prefer", "resolution=merge-duplicates")
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::Database(format!("Supabase settings upsert failed: {}", e)))?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Database(format!(
                "Supabase settings upsert failed: {}",
                body
            )));
        }

        Ok(())
    }
}

fn rfc3339_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
