//! Time utilities for provider timestamps and display timezones

use chrono::{DateTime, FixedOffset, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;

/// 12-hour wall-clock label used for every listing entry
pub const WALL_CLOCK_FORMAT: &str = "%I:%M %p";

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

const CLOCK_FORMATS: &[&str] = &["%H:%M", "%H:%M:%S", "%I:%M %p", "%I:%M%p"];

/// Parse an ISO-8601 instant carrying an offset
///
/// Accepts full RFC 3339 as well as the minute-precision form some providers
/// emit (`2025-07-27T19:30Z`).
pub fn parse_iso_instant(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(instant);
    }

    let normalized = match raw.strip_suffix('Z') {
        Some(stripped) => format!("{stripped}+00:00"),
        None => raw.to_string(),
    };
    DateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M%:z")
        .or_else(|_| DateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M%z"))
        .ok()
}

/// Parse a local date-time without offset
pub fn parse_naive_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
}

/// Parse a time-of-day label (`19:30`, `7:30 PM`, `7:30pm`)
pub fn parse_clock_label(raw: &str) -> Option<NaiveTime> {
    let upper = raw.trim().to_uppercase();
    CLOCK_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(&upper, format).ok())
}

/// Render an instant as a wall-clock label
///
/// The instant keeps its own offset unless `display_tz` is given.
pub fn format_wall_clock(instant: &DateTime<FixedOffset>, display_tz: Option<Tz>) -> String {
    match display_tz {
        Some(tz) => instant.with_timezone(&tz).format(WALL_CLOCK_FORMAT).to_string(),
        None => instant.format(WALL_CLOCK_FORMAT).to_string(),
    }
}

/// Parse and validate an IANA timezone name
pub fn parse_timezone(tz_str: &str) -> Result<Tz, String> {
    tz_str.trim().parse::<Tz>().map_err(|_| {
        format!("Invalid timezone: '{tz_str}'. Use a named timezone (e.g., 'America/New_York')")
    })
}

/// Current time reading in a display timezone
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClockReading {
    pub time: String,
    pub date: String,
    pub timezone: String,
}

/// Format a UTC instant for display in `tz`
pub fn format_for_display(utc_time: DateTime<Utc>, tz: Tz) -> ClockReading {
    let local_time = utc_time.with_timezone(&tz);
    ClockReading {
        time: local_time.format(WALL_CLOCK_FORMAT).to_string(),
        date: local_time.format("%Y-%m-%d").to_string(),
        timezone: tz.name().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_iso_instant_variants() {
        let full = parse_iso_instant("2025-07-27T19:30:00Z").unwrap();
        assert_eq!(full.offset().local_minus_utc(), 0);

        let minute = parse_iso_instant("2025-07-27T19:30Z").unwrap();
        assert_eq!(minute, full);

        let offset = parse_iso_instant("2025-07-27T20:00:00-04:00").unwrap();
        assert_eq!(offset.offset().local_minus_utc(), -4 * 3600);

        assert!(parse_iso_instant("2025-07-27T19:30").is_none());
        assert!(parse_iso_instant("tonight").is_none());
    }

    #[test]
    fn test_parse_naive_and_clock() {
        assert!(parse_naive_datetime("2025-07-27T19:30").is_some());
        assert!(parse_naive_datetime("2025-07-27 19:30:00").is_some());
        assert_eq!(
            parse_clock_label("7:30 pm"),
            NaiveTime::from_hms_opt(19, 30, 0)
        );
        assert_eq!(parse_clock_label("09:05"), NaiveTime::from_hms_opt(9, 5, 0));
        assert!(parse_clock_label("Late night").is_none());
    }

    #[test]
    fn test_format_wall_clock() {
        let instant = parse_iso_instant("2025-07-27T19:30:00Z").unwrap();
        assert_eq!(format_wall_clock(&instant, None), "07:30 PM");

        let eastern = parse_timezone("America/New_York").unwrap();
        assert_eq!(format_wall_clock(&instant, Some(eastern)), "03:30 PM");
    }

    #[test]
    fn test_parse_timezone() {
        assert!(parse_timezone("Europe/London").is_ok());
        assert!(parse_timezone("Mars/Olympus").is_err());
    }

    #[test]
    fn test_format_for_display() {
        let utc = Utc.with_ymd_and_hms(2025, 7, 28, 2, 15, 0).unwrap();
        let reading = format_for_display(utc, chrono_tz::America::New_York);
        assert_eq!(reading.time, "10:15 PM");
        assert_eq!(reading.date, "2025-07-27");
        assert_eq!(reading.timezone, "America/New_York");
    }
}
