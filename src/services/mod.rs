// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - upstream API clients.

pub mod google;
pub mod quotes;

pub use google::{GoogleCalendarClient, GoogleTokenResponse};
pub use quotes::QuoteClient;
