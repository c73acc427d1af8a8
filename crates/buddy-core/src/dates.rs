//! Calendar-day arithmetic.
//!
//! Streaks count calendar days, not 24-hour spans, so every comparison goes
//! through [`NaiveDate`] after the instant has been projected into the
//! observer's time zone.

use crate::error::{BuddyError, Result};
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Signed number of calendar days from `from` to `to`.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Calendar date of `instant` as seen at `offset`.
pub fn local_date(instant: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    instant.with_timezone(&offset).date_naive()
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|_| BuddyError::InvalidDate(s.to_string()))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Whole days since `sobriety_date`, counting the day itself as 0.
/// `None` when unset or when the date lies in the future.
pub fn days_sober(sobriety_date: Option<NaiveDate>, today: NaiveDate) -> Option<i64> {
    let since = sobriety_date?;
    let days = days_between(since, today);
    (days >= 0).then_some(days)
}
