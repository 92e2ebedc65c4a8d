// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! PepTalk Buddy: motivational quotes on a schedule, with optional
//! calendar-linked reminders.
//!
//! This crate holds the backend OAuth relay (the `peptalk-buddy` binary)
//! and the companion core the mobile shell drives: notification scheduling,
//! local settings/quote persistence, and calendar token storage.

pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod scheduler;
pub mod services;

use config::Config;
use db::SupabaseDb;
use services::GoogleCalendarClient;

/// Shared relay state.
pub struct AppState {
    pub config: Config,
    pub db: SupabaseDb,
    pub google: GoogleCalendarClient,
}
