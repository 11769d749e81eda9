// SPDX-License-Identifier: MIT
// Copyright 2026 Crystal Grimoire Developers

//! Shared helpers for date/time formatting.

use chrono::{DateTime, SecondsFormat, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Current time, RFC3339 with a `Z` suffix.
pub fn now_rfc3339() -> String {
    format_utc_rfc3339(Utc::now())
}

/// UTC calendar-day key used for daily usage documents (`YYYY-MM-DD`).
pub fn utc_day_key(date: DateTime<Utc>) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Today's UTC day key.
pub fn today_key() -> String {
    utc_day_key(Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_day_key_format() {
        let date = Utc.with_ymd_and_hms(2026, 3, 7, 23, 59, 59).unwrap();
        assert_eq!(utc_day_key(date), "2026-03-07");
    }

    #[test]
    fn test_rfc3339_has_z_suffix() {
        let date = Utc.with_ymd_and_hms(2026, 3, 7, 12, 0, 0).unwrap();
        assert_eq!(format_utc_rfc3339(date), "2026-03-07T12:00:00Z");
    }
}
