// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OAuth relay route tests that never leave the process.
//!
//! Everything here exercises `/oauth/start` and the callback's
//! parameter/state validation; flows that reach Google are covered by the
//! wiremock suite in `oauth_exchange_tests.rs`.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use peptalk_buddy::config::Config;
use tower::ServiceExt;

mod common;

const APP_REDIRECT: &str = "peptalkbuddy://oauth/google-callback";

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn start_auth_url(app: &axum::Router) -> String {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(format!(
                    "/oauth/start?appRedirect={}",
                    urlencoding::encode(APP_REDIRECT)
                ))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    json["url"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_start_returns_authorization_url() {
    let (app, _) = common::create_test_app();
    let auth_url = start_auth_url(&app).await;

    assert!(auth_url.starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));
    assert!(auth_url.contains("client_id=test_client_id"));
    assert!(auth_url.contains("scope=https%3A%2F%2Fwww.googleapis.com%2Fauth%2Fcalendar.readonly"));
    assert!(!common::state_param(&auth_url).is_empty());
}

#[tokio::test]
async fn test_start_requires_app_redirect() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/oauth/start")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "bad_request");
}

#[tokio::test]
async fn test_start_rejects_relative_app_redirect() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/oauth/start?appRedirect=/relative/path")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_start_without_credentials_is_configuration_error() {
    let mut config = Config::test_default();
    config.google_client_id = String::new();
    config.google_client_secret = String::new();
    let (app, _) = common::create_test_app_with_config(config);

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(format!(
                    "/oauth/start?appRedirect={}",
                    urlencoding::encode(APP_REDIRECT)
                ))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["error"], "configuration_error");
}

#[tokio::test]
async fn test_callback_requires_state() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/oauth/callback?code=abc")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_callback_rejects_garbage_state() {
    let (app, _) = common::create_test_app();

    // No redirect is attempted: there is no trustworthy appRedirect.
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/oauth/callback?code=abc&state=not-a-real-state")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "bad_request");
}

#[tokio::test]
async fn test_callback_rejects_tampered_state() {
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

    let (app, _) = common::create_test_app();
    let state = common::state_param(&start_auth_url(&app).await);

    // Flip the appRedirect inside the signed payload.
    let inner = String::from_utf8(URL_SAFE_NO_PAD.decode(&state).unwrap()).unwrap();
    let tampered = URL_SAFE_NO_PAD.encode(inner.replace("peptalkbuddy", "evil"));

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(format!("/oauth/callback?code=abc&state={}", tampered))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_callback_with_provider_error_redirects_to_app() {
    let (app, _) = common::create_test_app();
    let state = common::state_param(&start_auth_url(&app).await);

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(format!(
                    "/oauth/callback?error=access_denied&state={}",
                    state
                ))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // The state verified, so the app hears about the denial via redirect.
    assert_eq!(response.status(), StatusCode::FOUND);
    let location = response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(location.starts_with(APP_REDIRECT));
    assert!(location.contains("status=error"));
    assert!(location.contains("error=access_denied"));
}

#[tokio::test]
async fn test_callback_requires_code_when_no_error() {
    let (app, _) = common::create_test_app();
    let state = common::state_param(&start_auth_url(&app).await);

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(format!("/oauth/callback?state={}", state))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health_check() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
}
