//! Human-readable formatting for programme and film runtimes

use regex::Regex;
use std::sync::OnceLock;

fn iso_duration_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^P(?:(\d+)D)?T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+(?:\.\d+)?)S)?$").ok()
    })
    .as_ref()
}

/// Formats a whole number of minutes as `"2h 14m"`, `"45m"` or `"3h"`
pub fn format_minutes(total_minutes: u64) -> String {
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    match (hours, minutes) {
        (0, m) => format!("{m}m"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h {m}m"),
    }
}

/// Formats an ISO-8601 duration such as `PT2H14M`
///
/// Returns `None` when the input is not a time-based ISO duration. Seconds
/// are dropped; days fold into hours.
pub fn format_iso_duration(raw: &str) -> Option<String> {
    let caps = iso_duration_regex()?.captures(raw.trim())?;

    let part = |index: usize| -> u64 {
        caps.get(index)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0)
    };

    let days = part(1);
    let hours = part(2);
    let minutes = part(3);

    if caps.get(1).is_none() && caps.get(2).is_none() && caps.get(3).is_none() {
        // seconds only, or the bare "PT"
        caps.get(4)?;
        return Some(format_minutes(0));
    }

    Some(format_minutes((days * 24 + hours) * 60 + minutes))
}

/// Formats a provider runtime value for display
///
/// ISO durations and plain integer minutes are rendered uniformly; anything
/// else is returned unchanged.
pub fn format_runtime(raw: &str) -> String {
    let trimmed = raw.trim();

    if let Some(formatted) = format_iso_duration(trimmed) {
        return formatted;
    }

    if let Ok(minutes) = trimmed.parse::<u64>() {
        return format_minutes(minutes);
    }

    trimmed.to_string()
}
