//! Time conversion and formatting utilities.

use chrono::{DateTime, Utc};

/// Convert upstream epoch seconds. Out-of-range values yield `None`.
#[must_use]
pub fn from_unix_seconds(secs: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
}

/// Format a countdown to a future time.
#[must_use]
pub fn format_countdown(target: DateTime<Utc>) -> String {
    let duration = target.signed_duration_since(Utc::now());

    if duration.num_seconds() <= 0 {
        return "expired".to_string();
    }

    let hours = duration.num_hours();
    let minutes = duration.num_minutes() % 60;

    if hours > 24 {
        let days = hours / 24;
        format!("in {days} day{}", if days == 1 { "" } else { "s" })
    } else if hours > 0 {
        format!("in {hours}h {minutes}m")
    } else {
        format!("in {}m", minutes.max(1))
    }
}

/// Format a past time relative to now.
#[must_use]
pub fn format_relative_time(target: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(target);

    if duration.num_seconds().abs() < 60 {
        return "just now".to_string();
    }

    let minutes = duration.num_minutes().abs();
    let hours = duration.num_hours().abs();
    let days = duration.num_days().abs();

    let suffix = if duration.num_seconds() > 0 {
        "ago"
    } else {
        "from now"
    };

    if days > 0 {
        format!("{days} day{} {suffix}", if days == 1 { "" } else { "s" })
    } else if hours > 0 {
        format!("{hours} hour{} {suffix}", if hours == 1 { "" } else { "s" })
    } else {
        format!(
            "{minutes} minute{} {suffix}",
            if minutes == 1 { "" } else { "s" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn unix_seconds_roundtrip() {
        let dt = from_unix_seconds(1_700_000_000).unwrap();
        assert_eq!(dt.timestamp(), 1_700_000_000);
        assert!(from_unix_seconds(i64::MAX).is_none());
    }

    #[test]
    fn countdown_days() {
        let target = Utc::now() + Duration::days(3);
        assert!(format_countdown(target).starts_with("in "));
        assert!(format_countdown(target).contains("day"));
    }

    #[test]
    fn countdown_past_is_expired() {
        assert_eq!(format_countdown(Utc::now() - Duration::hours(1)), "expired");
    }

    #[test]
    fn relative_hours_ago() {
        let target = Utc::now() - Duration::hours(2) - Duration::minutes(5);
        assert_eq!(format_relative_time(target), "2 hours ago");
    }
}
