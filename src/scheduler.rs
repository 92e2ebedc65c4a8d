// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Notification scheduling policy.
//!
//! Pure functions mapping a frequency selection to concrete daily trigger
//! times, and computing the next upcoming trigger across a day boundary.
//! Nothing here touches storage or the host notification subsystem; callers
//! reprogram that themselves after every settings save.

use std::fmt;

use crate::error::AppError;
use crate::models::settings::NotificationFrequency;

/// Trigger time used when frequency is `daily`.
pub const DAILY_TIMES: &[&str] = &["12:00"];
/// Trigger times used when frequency is `twice_daily`.
pub const TWICE_DAILY_TIMES: &[&str] = &["12:00", "18:00"];
/// Starting point for a fresh custom selection.
pub const DEFAULT_CUSTOM_TIME: &str = "09:00";

/// The next notification trigger relative to "now".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextTrigger {
    /// Wall-clock time, "HH:MM"
    pub time: String,
    /// True when every configured time has already passed today
    pub tomorrow: bool,
}

impl fmt::Display for NextTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.tomorrow {
            write!(f, "{} (tomorrow)", self.time)
        } else {
            write!(f, "{}", self.time)
        }
    }
}

/// Derive the concrete trigger times for a frequency selection.
///
/// `daily` and `twice_daily` fully determine the result. `custom` restores
/// `saved_custom_times` verbatim when one was snapshotted, falls back to
/// [`DEFAULT_CUSTOM_TIME`] when the caller has no times at all, and otherwise
/// leaves the current selection untouched.
///
/// Snapshotting the active custom list into `saved_custom_times` when
/// switching *away* from custom is the caller's job; see
/// `Settings::change_frequency`.
pub fn resolve_times_for_frequency(
    frequency: NotificationFrequency,
    current_custom_times: &[String],
    saved_custom_times: &[String],
) -> Vec<String> {
    match frequency {
        NotificationFrequency::Daily => DAILY_TIMES.iter().map(|s| s.to_string()).collect(),
        NotificationFrequency::TwiceDaily => {
            TWICE_DAILY_TIMES.iter().map(|s| s.to_string()).collect()
        }
        NotificationFrequency::Custom => {
            if !saved_custom_times.is_empty() {
                saved_custom_times.to_vec()
            } else if current_custom_times.is_empty() {
                vec![DEFAULT_CUSTOM_TIME.to_string()]
            } else {
                current_custom_times.to_vec()
            }
        }
    }
}

/// Find the first configured time strictly after `now_minutes`
/// (minutes since midnight). Returns `None` for an empty time list.
///
/// Times that have all passed today roll over to the earliest time tomorrow.
/// Comparison is strict `>` on the minute, so a trigger firing at the current
/// minute is considered already delivered.
pub fn next_trigger(times: &[String], now_minutes: u32) -> Result<Option<NextTrigger>, AppError> {
    if times.is_empty() {
        return Ok(None);
    }

    // Fixed-width zero-padded HH:MM makes lexicographic order numeric order.
    let mut sorted = times.to_vec();
    sorted.sort();

    for time in &sorted {
        if minutes_of_day(time)? > now_minutes {
            return Ok(Some(NextTrigger {
                time: time.clone(),
                tomorrow: false,
            }));
        }
    }

    Ok(Some(NextTrigger {
        time: sorted[0].clone(),
        tomorrow: true,
    }))
}

/// Parse a 24-hour "HH:MM" string to minutes since midnight.
///
/// The time picker is the only producer of these strings, so a failure here
/// is a caller contract violation; it is still surfaced as
/// [`AppError::InvalidTimeFormat`] because silent bad math means a missed
/// notification.
pub fn minutes_of_day(time: &str) -> Result<u32, AppError> {
    let invalid = || AppError::InvalidTimeFormat(time.to_string());

    let (hours, minutes) = time.split_once(':').ok_or_else(invalid)?;
    if hours.len() != 2 || minutes.len() != 2 {
        return Err(invalid());
    }
    // u32::parse would accept a leading '+', which is not a digit pair.
    if !hours.bytes().chain(minutes.bytes()).all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let hours: u32 = hours.parse().map_err(|_| invalid())?;
    let minutes: u32 = minutes.parse().map_err(|_| invalid())?;
    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }

    Ok(hours * 60 + minutes)
}

/// Minutes since midnight for a chrono time, for feeding [`next_trigger`].
pub fn minutes_of_now<T: chrono::Timelike>(now: &T) -> u32 {
    now.hour() * 60 + now.minute()
}
