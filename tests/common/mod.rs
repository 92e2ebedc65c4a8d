// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use peptalk_buddy::config::Config;
use peptalk_buddy::db::SupabaseDb;
use peptalk_buddy::routes::create_router;
use peptalk_buddy::services::GoogleCalendarClient;
use peptalk_buddy::AppState;
use std::sync::Arc;

/// Create a test app with fake credentials and an offline database.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with_config(Config::test_default())
}

/// Create a test app with an explicit config.
#[allow(dead_code)]
pub fn create_test_app_with_config(config: Config) -> (axum::Router, Arc<AppState>) {
    let google = GoogleCalendarClient::new(
        config.google_client_id.clone(),
        config.google_client_secret.clone(),
    );
    build(config, google)
}

/// Create a test app whose Google client talks to a mock server.
#[allow(dead_code)]
pub fn create_test_app_with_google_base(base_url: &str) -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let google = GoogleCalendarClient::new(
        config.google_client_id.clone(),
        config.google_client_secret.clone(),
    )
    .with_base_url(base_url);
    build(config, google)
}

fn build(config: Config, google: GoogleCalendarClient) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState {
        config,
        db: SupabaseDb::new_mock(),
        google,
    });
    (create_router(state.clone()), state)
}

/// Pull the `state` query parameter out of an authorization URL.
#[allow(dead_code)]
pub fn state_param(auth_url: &str) -> String {
    url::Url::parse(auth_url)
        .expect("authorization URL should parse")
        .query_pairs()
        .find(|(k, _)| k == "state")
        .map(|(_, v)| v.into_owned())
        .expect("authorization URL should carry a state parameter")
}
