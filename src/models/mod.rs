// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod quote;
pub mod settings;
pub mod tokens;
pub mod user;

pub use quote::{Quote, QuoteRecord};
pub use settings::{NotificationFrequency, Settings, UserSettingsRecord};
pub use tokens::{CalendarAccessTest, CalendarProvider, CalendarTokenBundle};
pub use user::{NewUser, User, UserRole};
