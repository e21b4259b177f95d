use anyhow::{anyhow, Result};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use tracing::warn;

const SECOND: i64 = 1;
const MINUTE: i64 = 60 * SECOND;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;

/// Beyond this many whole days the absolute date is shown instead.
const ABSOLUTE_AFTER_DAYS: i64 = 5;

/// Month names used for the absolute date form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateLocale {
    #[default]
    English,
    Indonesian,
}

impl DateLocale {
    pub fn short_month(self, month: u32) -> &'static str {
        const EN: [&str; 12] = [
            "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
        ];
        const ID: [&str; 12] = [
            "Jan", "Feb", "Mar", "Apr", "Mei", "Jun", "Jul", "Agu", "Sep", "Okt", "Nov", "Des",
        ];
        let idx = (month.clamp(1, 12) - 1) as usize;
        match self {
            DateLocale::English => EN[idx],
            DateLocale::Indonesian => ID[idx],
        }
    }
}

/// Formats how long ago `timestamp` was, relative to the current time.
pub fn format_relative(timestamp: DateTime<Utc>) -> String {
    format_relative_time(timestamp, Utc::now())
}

/// Formats how long ago `timestamp` was, relative to `now`.
///
/// Returns e.g. "29 secs ago", "1 minute ago", "2 days ago", or an absolute
/// date such as "04 Jan 2025" once five or more days have passed.
pub fn format_relative_time(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    format_relative_time_in(timestamp, now, DateLocale::default())
}

pub fn format_relative_time_in(
    timestamp: DateTime<Utc>,
    now: DateTime<Utc>,
    locale: DateLocale,
) -> String {
    // Timestamps in the future are treated as "0 sec ago".
    let seconds = now.signed_duration_since(timestamp).num_seconds().max(0);
    let minutes = seconds / MINUTE;
    let hours = seconds / HOUR;
    let days = seconds / DAY;

    if days >= ABSOLUTE_AFTER_DAYS {
        return format_absolute_date(timestamp, locale);
    }

    if days > 0 {
        ago(days, "day")
    } else if hours > 0 {
        ago(hours, "hour")
    } else if minutes > 0 {
        ago(minutes, "minute")
    } else {
        ago(seconds, "sec")
    }
}

/// `DD Mon YYYY`, e.g. "30 Sep 2025".
pub fn format_absolute_date(timestamp: DateTime<Utc>, locale: DateLocale) -> String {
    format!(
        "{:02} {} {}",
        timestamp.day(),
        locale.short_month(timestamp.month()),
        timestamp.year()
    )
}

// Plural only above one: "0 sec ago" and "1 sec ago" are both singular.
fn ago(value: i64, unit: &str) -> String {
    let suffix = if value > 1 { "s" } else { "" };
    format!("{} {}{} ago", value, unit, suffix)
}

/// Parse an API timestamp. Accepts RFC 3339 and zone-less ISO forms (taken as UTC).
pub fn parse_timestamp(input: &str) -> Result<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }

    const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, fmt) {
            return Ok(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| anyhow!("unrecognized timestamp: {:?}", input))
}

/// Relative label for a raw timestamp string. Unparseable input is shown as-is.
pub fn format_relative_str(input: &str, now: DateTime<Utc>) -> String {
    format_relative_str_in(input, now, DateLocale::default())
}

pub fn format_relative_str_in(input: &str, now: DateTime<Utc>, locale: DateLocale) -> String {
    match parse_timestamp(input) {
        Ok(timestamp) => format_relative_time_in(timestamp, now, locale),
        Err(e) => {
            warn!("comment time left unformatted: {}", e);
            input.to_string()
        }
    }
}
