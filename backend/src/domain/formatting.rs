//! Display formatting for dates and times.
//!
//! Formatting lives in the domain layer so every consumer renders the
//! same strings; views should not re-implement these rules.

use chrono::{DateTime, NaiveDate, Utc};
use log::warn;

/// Render a 24-hour `HH:MM` string as 12-hour with AM/PM.
///
/// `"13:05"` becomes `"1:05 PM"`, `"00:30"` becomes `"12:30 AM"`.
/// Input that does not look like a time is returned unchanged.
pub fn format_time(time: &str) -> String {
    let Some((hour_part, minute_part)) = time.split_once(':') else {
        warn!("format_time: not a HH:MM string: {}", time);
        return time.to_string();
    };

    let Ok(hour) = hour_part.parse::<u32>() else {
        warn!("format_time: unparseable hour in {}", time);
        return time.to_string();
    };

    let meridiem = if hour >= 12 { "PM" } else { "AM" };
    let display_hour = match hour % 12 {
        0 => 12,
        h => h,
    };

    format!("{}:{} {}", display_hour, minute_part, meridiem)
}

/// Render a date as `DD/MM/YYYY`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Render how long ago an RFC 3339 timestamp was, bucketed the way the
/// recent-changes list displays it.
pub fn format_time_ago(timestamp: &str) -> String {
    format_time_ago_at(timestamp, Utc::now())
}

fn format_time_ago_at(timestamp: &str, now: DateTime<Utc>) -> String {
    let Ok(time) = DateTime::parse_from_rfc3339(timestamp) else {
        warn!("format_time_ago: unparseable timestamp: {}", timestamp);
        return timestamp.to_string();
    };

    let diff_seconds = (now - time.with_timezone(&Utc)).num_seconds().max(0);

    if diff_seconds < 60 {
        "Just now".to_string()
    } else if diff_seconds < 3600 {
        format!("{}m ago", diff_seconds / 60)
    } else if diff_seconds < 86_400 {
        format!("{}h ago", diff_seconds / 3600)
    } else {
        format!("{}d ago", diff_seconds / 86_400)
    }
}
