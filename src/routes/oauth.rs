// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Google Calendar OAuth relay routes.
//!
//! The relay is stateless between the two legs of the authorization-code
//! grant: everything the callback needs (most importantly the app deep link
//! to return control to) rides through the provider inside the signed
//! `state` parameter.

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::sync::Arc;
use url::Url;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::CalendarTokenBundle;
use crate::AppState;

// Type alias for HMAC-SHA256
type HmacSha256 = Hmac<Sha256>;

/// States older than this are rejected on the callback leg. There is no
/// server-side nonce registry (the relay stays stateless), so the TTL is
/// what bounds the replay window.
const STATE_MAX_AGE_MS: i64 = 10 * 60 * 1000;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/oauth/start", get(oauth_start))
        .route("/oauth/callback", get(oauth_callback))
}

/// Context round-tripped through Google inside the `state` parameter.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OAuthStatePayload {
    /// App deep link the relay must return control to
    app_redirect: String,
    /// Random single-use marker
    nonce: String,
    /// Issuance time (epoch ms)
    issued_at: i64,
}

/// Query parameters for starting the OAuth flow.
#[derive(Deserialize)]
pub struct StartParams {
    /// App deep link to redirect back to after OAuth completes.
    #[serde(rename = "appRedirect", default)]
    app_redirect: Option<String>,
}

#[derive(Serialize)]
pub struct StartResponse {
    pub url: String,
}

/// Start the OAuth flow - hand the client a Google authorization URL.
async fn oauth_start(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StartParams>,
    headers: HeaderMap,
) -> Result<Json<StartResponse>> {
    if !state.config.google_oauth_configured() {
        return Err(AppError::Configuration(
            "Google OAuth is not configured".to_string(),
        ));
    }

    let app_redirect = params
        .app_redirect
        .filter(|r| !r.is_empty())
        .ok_or_else(|| AppError::BadRequest("appRedirect is required".to_string()))?;

    // Deep links use custom schemes, so only absoluteness is checked here.
    Url::parse(&app_redirect)
        .map_err(|_| AppError::BadRequest("appRedirect must be an absolute URL".to_string()))?;

    let payload = OAuthStatePayload {
        app_redirect,
        nonce: uuid::Uuid::new_v4().to_string(),
        issued_at: now_ms(),
    };
    let oauth_state = encode_state(&payload, &state.config.oauth_state_key)?;

    let redirect_uri = callback_url(&state.config, &headers);
    let auth_url = state.google.build_auth_url(&redirect_uri, &oauth_state);

    tracing::info!(
        app_redirect = %payload.app_redirect,
        redirect_uri = %redirect_uri,
        "Starting Google Calendar OAuth flow"
    );

    Ok(Json(StartResponse { url: auth_url }))
}

/// Query parameters Google sends to the callback.
#[derive(Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// OAuth callback - exchange the code, verify calendar access, and bounce
/// back to the app deep link with an encoded result payload.
///
/// Anything that happens before the state is verified answers with a plain
/// 400: without a trustworthy `appRedirect` there is nowhere safe to
/// redirect.
async fn oauth_callback(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<CallbackParams>,
) -> Result<Response> {
    let raw_state = params
        .state
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::BadRequest("state is required".to_string()))?;

    let payload = verify_and_decode_state(&raw_state, &state.config.oauth_state_key, now_ms())
        .ok_or_else(|| AppError::BadRequest("invalid state payload".to_string()))?;

    if payload.app_redirect.is_empty() {
        return Err(AppError::BadRequest(
            "appRedirect missing in state".to_string(),
        ));
    }
    let app_redirect = payload.app_redirect;

    // The user declined on the consent screen (or Google reported another
    // error). The state already verified, so the app gets to hear about it.
    if let Some(error) = params.error {
        tracing::warn!(error = %error, "OAuth error from Google");
        return error_redirect(&app_redirect, &error);
    }

    let code = params
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::BadRequest("code is required".to_string()))?;

    let redirect_uri = callback_url(&state.config, &headers);

    tracing::info!("Exchanging authorization code for tokens");
    let tokens = match state.google.exchange_code(&code, &redirect_uri).await {
        Ok(tokens) => tokens,
        Err(err) => {
            tracing::warn!(error = %err, "Token exchange failed");
            return error_redirect(&app_redirect, &err.to_string());
        }
    };

    let test = match state.google.test_calendar_access(&tokens.access_token).await {
        Ok(test) => test,
        Err(err) => {
            tracing::warn!(error = %err, "Calendar verification call failed");
            return error_redirect(&app_redirect, &err.to_string());
        }
    };

    tracing::info!(
        calendar_count = test.calendar_count,
        "Google Calendar connected"
    );

    let bundle = CalendarTokenBundle {
        access_token: tokens.access_token,
        // Google withholds the refresh token on repeat consent; the app
        // stores an empty string rather than failing the whole flow.
        refresh_token: tokens.refresh_token.unwrap_or_default(),
        expires_at: now_ms() + tokens.expires_in * 1000,
        scope: tokens.scope,
        token_type: tokens.token_type,
        test: Some(test),
    };

    success_redirect(&app_redirect, &bundle)
}

/// Resolve the redirect URI registered with Google: fixed configuration
/// when present, otherwise derived from the incoming Host header.
fn callback_url(config: &Config, headers: &HeaderMap) -> String {
    if let Some(uri) = &config.google_redirect_uri {
        return uri.clone();
    }

    let host = headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("localhost:8080");

    let scheme = if host.contains("localhost") || host.contains("127.0.0.1") {
        "http"
    } else {
        "https"
    };

    format!("{}://{}/oauth/callback", scheme, host)
}

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Serialize, sign, and base64url-encode a state payload.
///
/// Format inside the base64 wrapper is `json|signature-hex`; the signature
/// is HMAC-SHA256 over the JSON bytes.
fn encode_state(payload: &OAuthStatePayload, key: &[u8]) -> Result<String> {
    let json = serde_json::to_string(payload)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("State serialization failed: {}", e)))?;

    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("HMAC init failed: {}", e)))?;
    mac.update(json.as_bytes());
    let signature = hex::encode(mac.finalize().into_bytes());

    Ok(URL_SAFE_NO_PAD.encode(format!("{}|{}", json, signature)))
}

/// Verify the signature and TTL on a state parameter and decode the payload.
///
/// Returns None on any failure; the caller has no trustworthy redirect
/// target in that case.
fn verify_and_decode_state(state: &str, key: &[u8], now_ms: i64) -> Option<OAuthStatePayload> {
    let bytes = URL_SAFE_NO_PAD.decode(state).ok()?;
    let state_str = String::from_utf8(bytes).ok()?;

    // The signature is pure hex, so splitting from the right is unambiguous
    // even if the JSON ever contained a pipe.
    let (json, signature_hex) = state_str.rsplit_once('|')?;

    let mut mac = HmacSha256::new_from_slice(key).ok()?;
    mac.update(json.as_bytes());
    let expected_signature = hex::encode(mac.finalize().into_bytes());

    if signature_hex != expected_signature {
        tracing::error!("OAuth state signature mismatch! Potential tampering.");
        return None;
    }

    let payload: OAuthStatePayload = serde_json::from_str(json).ok()?;

    if now_ms - payload.issued_at > STATE_MAX_AGE_MS {
        tracing::warn!("OAuth state expired");
        return None;
    }

    Some(payload)
}

/// 302 to the app deep link with `status=success&payload=<base64url json>`.
fn success_redirect(app_redirect: &str, bundle: &CalendarTokenBundle) -> Result<Response> {
    let json = serde_json::to_string(bundle)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Payload serialization failed: {}", e)))?;
    let encoded = URL_SAFE_NO_PAD.encode(json);

    let mut url = parse_app_redirect(app_redirect)?;
    url.query_pairs_mut()
        .append_pair("status", "success")
        .append_pair("payload", &encoded);

    found_redirect(url.as_str())
}

/// 302 to the app deep link with `status=error&error=<message>`.
fn error_redirect(app_redirect: &str, message: &str) -> Result<Response> {
    let mut url = parse_app_redirect(app_redirect)?;
    url.query_pairs_mut()
        .append_pair("status", "error")
        .append_pair("error", message);

    found_redirect(url.as_str())
}

/// Plain 302; the deep link must come back as a GET regardless of client.
fn found_redirect(url: &str) -> Result<Response> {
    let location = axum::http::HeaderValue::from_str(url)
        .map_err(|_| AppError::BadRequest("redirect URL contains invalid characters".to_string()))?;
    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}

fn parse_app_redirect(app_redirect: &str) -> Result<Url> {
    Url::parse(app_redirect)
        .map_err(|_| AppError::BadRequest("appRedirect in state is not a valid URL".to_string()))
}
