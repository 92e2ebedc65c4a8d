// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User settings model and mutation helpers.
//!
//! The JSON shape is camelCase because the same blob is read by the mobile
//! shell from the local key-value store.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::AppError;
use crate::scheduler;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// How often pep talk notifications fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/lib/generated/")
)]
pub enum NotificationFrequency {
    Daily,
    TwiceDaily,
    Custom,
}

/// Maximum number of notification times per day.
pub const MAX_CUSTOM_TIMES: usize = 3;

/// User preferences persisted under the `peptalk_settings` key.
///
/// `custom_times` always holds the concrete trigger times for the active
/// frequency; for `daily`/`twice_daily` it is fully determined by the
/// frequency and not independently settable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/lib/generated/")
)]
pub struct Settings {
    pub notification_frequency: NotificationFrequency,
    #[validate(length(max = 3), custom(function = validate_times))]
    pub custom_times: Vec<String>,
    /// Custom selection preserved while a preset frequency is active,
    /// restored verbatim on the next switch back to custom.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[validate(custom(function = validate_times))]
    pub saved_custom_times: Vec<String>,
    pub calendar_integration_enabled: bool,
    pub google_calendar_connected: bool,
    pub apple_calendar_connected: bool,
    pub notifications_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            notification_frequency: NotificationFrequency::Daily,
            custom_times: vec!["12:00".to_string()],
            saved_custom_times: Vec::new(),
            calendar_integration_enabled: false,
            google_calendar_connected: false,
            apple_calendar_connected: false,
            notifications_enabled: true,
        }
    }
}

fn validate_times(times: &[String]) -> Result<(), ValidationError> {
    for time in times {
        if scheduler::minutes_of_day(time).is_err() {
            return Err(ValidationError::new("invalid_time_format"));
        }
    }
    Ok(())
}

impl Settings {
    /// Switch the notification frequency, snapshotting the active custom
    /// selection when leaving `custom` so a later return restores it.
    pub fn change_frequency(&mut self, frequency: NotificationFrequency) {
        if self.notification_frequency == NotificationFrequency::Custom
            && frequency != NotificationFrequency::Custom
        {
            self.saved_custom_times = self.custom_times.clone();
        }

        self.custom_times = scheduler::resolve_times_for_frequency(
            frequency,
            &self.custom_times,
            &self.saved_custom_times,
        );
        self.notification_frequency = frequency;
    }

    /// Add a custom notification time, keeping the list sorted and unique.
    ///
    /// Adding a time that is already present is a no-op (matches the time
    /// picker behavior).
    pub fn add_custom_time(&mut self, time: &str) -> Result<(), AppError> {
        scheduler::minutes_of_day(time)?;

        if self.custom_times.iter().any(|t| t == time) {
            return Ok(());
        }
        if self.custom_times.len() >= MAX_CUSTOM_TIMES {
            return Err(AppError::BadRequest(format!(
                "maximum {} notification times per day",
                MAX_CUSTOM_TIMES
            )));
        }

        self.custom_times.push(time.to_string());
        self.custom_times.sort();
        Ok(())
    }

    /// Remove a custom notification time.
    pub fn remove_custom_time(&mut self, time: &str) {
        self.custom_times.retain(|t| t != time);
    }

    /// Concrete daily trigger times the host notification subsystem should
    /// be programmed with after this settings record is saved.
    pub fn notification_plan(&self) -> Vec<String> {
        if !self.notifications_enabled {
            return Vec::new();
        }
        // custom_times is kept in sync with the frequency by
        // change_frequency, so it is the plan for every mode.
        self.custom_times.clone()
    }
}

/// Settings row in the hosted `user_settings` table, keyed by `user_id`.
///
/// Snake_case columns like the rest of the hosted schema. The local-only
/// `saved_custom_times` snapshot has no column here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSettingsRecord {
    pub id: String,
    pub user_id: String,
    pub notification_frequency: NotificationFrequency,
    #[serde(default)]
    pub custom_times: Vec<String>,
    pub calendar_integration_enabled: bool,
    pub google_calendar_connected: bool,
    pub apple_calendar_connected: bool,
    pub notifications_enabled: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(
            settings.notification_frequency,
            NotificationFrequency::Daily
        );
        assert_eq!(settings.custom_times, vec!["12:00"]);
        assert!(settings.notifications_enabled);
        assert!(!settings.google_calendar_connected);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_frequency_roundtrip_restores_custom_times() {
        let mut settings = Settings::default();
        settings.change_frequency(NotificationFrequency::Custom);
        settings.custom_times = vec!["07:00".to_string(), "21:30".to_string()];

        settings.change_frequency(NotificationFrequency::Daily);
        assert_eq!(settings.custom_times, vec!["12:00"]);

        settings.change_frequency(NotificationFrequency::Custom);
        assert_eq!(settings.custom_times, vec!["07:00", "21:30"]);
    }

    #[test]
    fn test_twice_daily_is_fully_determined() {
        let mut settings = Settings::default();
        settings.change_frequency(NotificationFrequency::TwiceDaily);
        assert_eq!(settings.custom_times, vec!["12:00", "18:00"]);
    }

    #[test]
    fn test_add_custom_time_sorted_and_capped() {
        let mut settings = Settings {
            notification_frequency: NotificationFrequency::Custom,
            custom_times: vec!["12:00".to_string()],
            ..Settings::default()
        };

        settings.add_custom_time("09:00").unwrap();
        settings.add_custom_time("18:00").unwrap();
        assert_eq!(settings.custom_times, vec!["09:00", "12:00", "18:00"]);

        // Duplicate: no-op
        settings.add_custom_time("09:00").unwrap();
        assert_eq!(settings.custom_times.len(), 3);

        // Fourth distinct time: rejected
        assert!(settings.add_custom_time("20:00").is_err());

        // Malformed time: rejected before any capacity check
        assert!(matches!(
            settings.add_custom_time("25:00"),
            Err(AppError::InvalidTimeFormat(_))
        ));
    }

    #[test]
    fn test_notification_plan_respects_master_toggle() {
        let mut settings = Settings::default();
        assert_eq!(settings.notification_plan(), vec!["12:00"]);

        settings.notifications_enabled = false;
        assert!(settings.notification_plan().is_empty());
    }

    #[test]
    fn test_validate_rejects_bad_times() {
        let settings = Settings {
            custom_times: vec!["12:99".to_string()],
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_wire_shape_is_camel_case() {
        let json = serde_json::to_value(Settings::default()).unwrap();
        assert_eq!(json["notificationFrequency"], "daily");
        assert!(json.get("customTimes").is_some());
        // Unset snapshot is omitted entirely, like the original blob
        assert!(json.get("savedCustomTimes").is_none());
    }
}
