// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting and local-day bucketing.
//!
//! Every day-based calculation (streak, high-days, adherence) buckets a
//! reading into the calendar day of its observation timestamp in the *user's*
//! timezone. Mixing UTC-date and local-date keys within one calculation is a
//! correctness bug; all bucketing goes through [`local_date`].

use chrono::{DateTime, FixedOffset, NaiveDate, SecondsFormat, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Build a `FixedOffset` from a user's profile offset in minutes east of UTC.
///
/// Out-of-range offsets (beyond ±24h) fall back to UTC rather than panicking;
/// the profile subsystem validates offsets, this is the engine's last line.
pub fn user_offset(utc_offset_minutes: i32) -> FixedOffset {
    FixedOffset::east_opt(utc_offset_minutes.saturating_mul(60))
        .unwrap_or_else(|| FixedOffset::east_opt(0).unwrap())
}

/// The local calendar day of a UTC instant for a user at the given offset.
pub fn local_date(instant: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    instant.with_timezone(&offset).date_naive()
}

/// Convert a UTC instant to the user's local wall-clock time.
pub fn local_time(instant: DateTime<Utc>, offset: FixedOffset) -> DateTime<FixedOffset> {
    instant.with_timezone(&offset)
}
