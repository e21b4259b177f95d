use chrono::{DateTime, Utc};

use invite_engine::format::relative::{format_relative_time, parse_timestamp};

fn at(raw: &str) -> DateTime<Utc> {
    parse_timestamp(raw).unwrap()
}

fn label(raw: &str) -> String {
    format_relative_time(at(raw), at("2025-01-10T00:00:00Z"))
}

#[test]
fn test_seconds() {
    assert_eq!(label("2025-01-09T23:59:31Z"), "29 secs ago");
    assert_eq!(label("2025-01-09T23:59:59Z"), "1 sec ago");
}

#[test]
fn test_minutes() {
    assert_eq!(label("2025-01-09T23:59:00Z"), "1 minute ago");
    assert_eq!(label("2025-01-09T23:01:00Z"), "59 minutes ago");
}

#[test]
fn test_hours() {
    assert_eq!(label("2025-01-09T22:00:00Z"), "2 hours ago");
    assert_eq!(label("2025-01-09T23:00:00Z"), "1 hour ago");
}

#[test]
fn test_days() {
    assert_eq!(label("2025-01-08T00:00:00Z"), "2 days ago");
    assert_eq!(label("2025-01-09T00:00:00Z"), "1 day ago");
}

#[test]
fn test_absolute_date_after_five_days() {
    assert_eq!(label("2025-01-04T00:00:00Z"), "04 Jan 2025");
    assert_eq!(label("2024-09-30T12:00:00Z"), "30 Sep 2024");
}
