// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! PepTalk Buddy OAuth relay server.
//!
//! Performs the server-side legs of the Google Calendar OAuth flow on
//! behalf of the mobile app, which cannot hold the client secret.

use peptalk_buddy::{
    config::Config, db::SupabaseDb, services::GoogleCalendarClient, AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting PepTalk Buddy relay");

    if !config.google_oauth_configured() {
        tracing::warn!("Google OAuth credentials absent; /oauth routes will answer 500");
    }

    let db = SupabaseDb::new(
        &config.supabase_url,
        &config.supabase_service_role_key,
        &config.owner_open_id,
    );

    let google = GoogleCalendarClient::new(
        config.google_client_id.clone(),
        config.google_client_secret.clone(),
    );

    let state = Arc::new(AppState { config: config.clone(), db, google });

    let app = peptalk_buddy::routes::create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("peptalk_buddy=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
