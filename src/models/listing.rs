//! Listing records before and after normalization

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::time::{parse_clock_label, parse_iso_instant, parse_naive_datetime};

/// When a listing entry starts, as precisely as the provider reported it
#[derive(Debug, Clone, PartialEq)]
pub enum StartTime {
    /// Full instant with offset (`2025-07-27T19:30:00Z`)
    Instant(DateTime<FixedOffset>),
    /// Local date and time without offset (`2025-07-27T19:30`)
    Naive(NaiveDateTime),
    /// Time of day only (`19:30`, `7:30 PM`)
    Clock(NaiveTime),
    /// Free text the provider used instead of a time
    Label(String),
    /// Provider gave nothing
    Unknown,
}

impl StartTime {
    /// Interpret a provider time string, most precise form first
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            return StartTime::Unknown;
        }
        if let Some(instant) = parse_iso_instant(raw) {
            return StartTime::Instant(instant);
        }
        if let Some(naive) = parse_naive_datetime(raw) {
            return StartTime::Naive(naive);
        }
        if let Some(clock) = parse_clock_label(raw) {
            return StartTime::Clock(clock);
        }
        StartTime::Label(raw.to_string())
    }

    /// Chronological key, anchoring date-less times on `date` (UTC)
    pub fn sort_key(&self, date: NaiveDate) -> Option<DateTime<Utc>> {
        match self {
            StartTime::Instant(instant) => Some(instant.with_timezone(&Utc)),
            StartTime::Naive(naive) => Some(naive.and_utc()),
            StartTime::Clock(clock) => Some(date.and_time(*clock).and_utc()),
            StartTime::Label(_) | StartTime::Unknown => None,
        }
    }

    /// Whether this start could be on `date`; date-less starts always could
    pub fn falls_on(&self, date: NaiveDate) -> bool {
        match self {
            StartTime::Instant(instant) => instant.date_naive() == date,
            StartTime::Naive(naive) => naive.date() == date,
            StartTime::Clock(_) | StartTime::Label(_) | StartTime::Unknown => true,
        }
    }
}

/// One entry exactly as an adapter parsed it
#[derive(Debug, Clone, PartialEq)]
pub struct ItemDraft {
    pub start: StartTime,
    pub title: Option<String>,
    pub description: Option<String>,
    pub episode_title: Option<String>,
    pub season: Option<u32>,
    pub episode: Option<u32>,
    /// ISO-8601 duration, integer minutes, or free text
    pub runtime: Option<String>,
    pub rating: Option<String>,
    /// Theatre or venue name for screenings
    pub venue: Option<String>,
}

impl ItemDraft {
    pub fn new(start: StartTime, title: impl Into<String>) -> Self {
        Self {
            start,
            title: Some(title.into()),
            description: None,
            episode_title: None,
            season: None,
            episode: None,
            runtime: None,
            rating: None,
            venue: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_runtime(mut self, runtime: impl Into<String>) -> Self {
        self.runtime = Some(runtime.into());
        self
    }
}

/// Adapter output prior to normalization
#[derive(Debug, Clone, PartialEq)]
pub struct RawListing {
    pub items: Vec<ItemDraft>,
    /// Provider-specific trust tag (`commercial_verified`, `scraped`, ...)
    pub status: String,
}

impl RawListing {
    pub fn new<S: Into<String>>(items: Vec<ItemDraft>, status: S) -> Self {
        Self {
            items,
            status: status.into(),
        }
    }
}

/// A normalized listing entry
///
/// Every field is always serialized; descriptive text defaults to `""` and
/// optional metadata to `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub time: String,
    pub title: String,
    pub description: String,
    pub episode_title: String,
    pub season: Option<u32>,
    pub episode: Option<u32>,
    pub runtime: Option<String>,
    pub rating: Option<String>,
    pub venue: Option<String>,
}

/// The normalized result of the adapter that satisfied a query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderResult {
    pub source: String,
    pub status: String,
    pub items: Vec<Item>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_time_parse_forms() {
        assert!(matches!(
            StartTime::parse("2025-07-27T19:30:00Z"),
            StartTime::Instant(_)
        ));
        assert!(matches!(
            StartTime::parse("2025-07-27T19:30"),
            StartTime::Naive(_)
        ));
        assert!(matches!(StartTime::parse("19:30"), StartTime::Clock(_)));
        assert!(matches!(StartTime::parse("7:30 PM"), StartTime::Clock(_)));
        assert_eq!(
            StartTime::parse("Call for showtimes"),
            StartTime::Label("Call for showtimes".to_string())
        );
        assert_eq!(StartTime::parse("  "), StartTime::Unknown);
    }

    #[test]
    fn test_sort_key_anchors_clock_on_query_date() {
        let date = NaiveDate::from_ymd_opt(2025, 7, 27).unwrap();
        let key = StartTime::parse("9:00 AM").sort_key(date).unwrap();
        assert_eq!(key.to_rfc3339(), "2025-07-27T09:00:00+00:00");
        assert!(StartTime::parse("TBA").sort_key(date).is_none());
    }

    #[test]
    fn test_falls_on_uses_local_date() {
        let date = NaiveDate::from_ymd_opt(2025, 7, 27).unwrap();
        // 23:30 in New York is already the 28th in UTC
        assert!(StartTime::parse("2025-07-27T23:30:00-04:00").falls_on(date));
        assert!(!StartTime::parse("2025-07-28T10:00").falls_on(date));
        assert!(StartTime::parse("8:00 PM").falls_on(date));
    }

    #[test]
    fn test_sort_key_uses_utc_instant() {
        let date = NaiveDate::from_ymd_opt(2025, 7, 27).unwrap();
        let eastern = StartTime::parse("2025-07-27T20:00:00-04:00").sort_key(date);
        let utc = StartTime::parse("2025-07-27T23:00:00Z").sort_key(date);
        // 20:00 EDT is midnight UTC, after 23:00 UTC the day before
        assert!(utc < eastern);
    }
}
