//! Normalization of adapter output into the canonical item shape
//!
//! Every adapter hands back a [`RawListing`] of drafts; this is the only place
//! that turns drafts into [`Item`]s, so all providers render times, runtimes
//! and descriptions identically.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::config::ResolverConfig;
use crate::errors::{AppError, AppResult};
use crate::models::{Item, ItemDraft, ProviderResult, RawListing, StartTime};
use crate::utils::html::strip_html;
use crate::utils::human_format::format_runtime;
use crate::utils::time::{format_wall_clock, parse_timezone, WALL_CLOCK_FORMAT};

/// Label used when a provider gave no start time at all
pub const UNKNOWN_TIME_LABEL: &str = "TBA";

const TRUNCATION_MARKER: &str = "...";

#[derive(Debug, Clone)]
pub struct Normalizer {
    display_tz: Option<Tz>,
    max_description_length: usize,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(None, crate::config::defaults::DEFAULT_MAX_DESCRIPTION_LENGTH)
    }
}

impl Normalizer {
    pub fn new(display_tz: Option<Tz>, max_description_length: usize) -> Self {
        Self {
            display_tz,
            max_description_length,
        }
    }

    pub fn from_config(config: &ResolverConfig) -> AppResult<Self> {
        let display_tz = config
            .display_timezone
            .as_deref()
            .map(parse_timezone)
            .transpose()
            .map_err(AppError::configuration)?;

        Ok(Self::new(display_tz, config.max_description_length))
    }

    /// Normalize a raw listing into a provider result
    ///
    /// Drafts without a title are dropped. Items are ordered by their start
    /// instant; entries with no sortable start keep their relative order at
    /// the end.
    pub fn normalize(&self, raw: RawListing, source: &str, date: NaiveDate) -> ProviderResult {
        let mut keyed: Vec<(Option<DateTime<Utc>>, Item)> = raw
            .items
            .into_iter()
            .filter_map(|draft| {
                let key = draft.start.sort_key(date);
                self.normalize_item(draft).map(|item| (key, item))
            })
            .collect();

        keyed.sort_by(|(a, _), (b, _)| compare_start(a, b));

        ProviderResult {
            source: source.to_string(),
            status: raw.status,
            items: keyed.into_iter().map(|(_, item)| item).collect(),
        }
    }

    /// Normalize a single draft, or `None` if it has no usable title
    pub fn normalize_item(&self, draft: ItemDraft) -> Option<Item> {
        let title = draft
            .title
            .as_deref()
            .map(strip_html)
            .filter(|t| !t.is_empty())?;

        Some(Item {
            time: self.format_start(&draft.start),
            title,
            description: self.clean_description(draft.description.as_deref()),
            episode_title: draft.episode_title.as_deref().map(strip_html).unwrap_or_default(),
            season: draft.season,
            episode: draft.episode,
            runtime: non_blank(draft.runtime.as_deref()).map(|r| format_runtime(&r)),
            rating: non_blank(draft.rating.as_deref()),
            venue: non_blank(draft.venue.as_deref()),
        })
    }

    /// Render a start time as its display label
    pub fn format_start(&self, start: &StartTime) -> String {
        match start {
            StartTime::Instant(instant) => format_wall_clock(instant, self.display_tz),
            StartTime::Naive(naive) => naive.format(WALL_CLOCK_FORMAT).to_string(),
            StartTime::Clock(clock) => clock.format(WALL_CLOCK_FORMAT).to_string(),
            StartTime::Label(label) => label.clone(),
            StartTime::Unknown => UNKNOWN_TIME_LABEL.to_string(),
        }
    }

    /// Strip markup and apply the length cap
    pub fn clean_description(&self, description: Option<&str>) -> String {
        let text = description.map(strip_html).unwrap_or_default();
        self.truncate(text)
    }

    fn truncate(&self, text: String) -> String {
        if self.max_description_length == 0 || text.chars().count() <= self.max_description_length {
            return text;
        }

        let mut truncated: String = text.chars().take(self.max_description_length).collect();
        truncated.push_str(TRUNCATION_MARKER);
        truncated
    }
}

fn compare_start(a: &Option<DateTime<Utc>>, b: &Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 27).unwrap()
    }

    fn draft(start: &str, title: &str) -> ItemDraft {
        ItemDraft::new(StartTime::parse(start), title)
    }

    #[test]
    fn test_iso_instant_renders_twelve_hour_clock() {
        let normalizer = Normalizer::default();
        let item = normalizer
            .normalize_item(draft("2025-07-27T19:30:00Z", "Nightly News"))
            .unwrap();
        assert_eq!(item.time, "07:30 PM");
    }

    #[test]
    fn test_display_timezone_converts_instants() {
        let normalizer = Normalizer::new(Some(chrono_tz::America::Los_Angeles), 200);
        let item = normalizer
            .normalize_item(draft("2025-07-27T19:30:00Z", "Nightly News"))
            .unwrap();
        assert_eq!(item.time, "12:30 PM");
    }

    #[test]
    fn test_items_sorted_by_instant_not_label() {
        let raw = RawListing::new(
            vec![
                draft("2025-07-27T14:00:00Z", "Afternoon"),
                draft("2025-07-27T09:00:00Z", "Morning"),
                draft("2025-07-27T20:00:00Z", "Evening"),
            ],
            "verified",
        );

        let result = Normalizer::default().normalize(raw, "tvmaze", date());
        let titles: Vec<_> = result.items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Morning", "Afternoon", "Evening"]);

        let times: Vec<_> = result.items.iter().map(|i| i.time.as_str()).collect();
        assert_eq!(times, vec!["09:00 AM", "02:00 PM", "08:00 PM"]);
    }

    #[test]
    fn test_pm_label_sorts_after_am_label() {
        // "01:00 PM" sorts before "11:00 AM" as text
        let raw = RawListing::new(
            vec![draft("1:00 PM", "Lunch"), draft("11:00 AM", "Brunch")],
            "scraped",
        );
        let result = Normalizer::default().normalize(raw, "tvguide", date());
        assert_eq!(result.items[0].title, "Brunch");
        assert_eq!(result.items[1].title, "Lunch");
    }

    #[test]
    fn test_unsortable_entries_go_last_in_order() {
        let raw = RawListing::new(
            vec![
                draft("Late night", "First label"),
                draft("", "No time"),
                draft("2025-07-27T08:00:00Z", "Timed"),
            ],
            "scraped",
        );
        let result = Normalizer::default().normalize(raw, "tvguide", date());
        let titles: Vec<_> = result.items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Timed", "First label", "No time"]);
        assert_eq!(result.items[2].time, UNKNOWN_TIME_LABEL);
        assert_eq!(result.items[1].time, "Late night");
    }

    #[test]
    fn test_blank_titles_are_dropped() {
        let mut untitled = draft("20:00", "x");
        untitled.title = None;
        let raw = RawListing::new(vec![untitled, draft("21:00", "  <b></b> ")], "scraped");
        let result = Normalizer::default().normalize(raw, "tvguide", date());
        assert!(result.items.is_empty());
    }

    #[test]
    fn test_descriptions_stripped_defaulted_and_truncated() {
        let normalizer = Normalizer::new(None, 10);

        let item = normalizer
            .normalize_item(draft("20:00", "Show").with_description("<p>Twelve chars</p>"))
            .unwrap();
        assert_eq!(item.description, "Twelve cha...");

        let bare = normalizer.normalize_item(draft("20:00", "Show")).unwrap();
        assert_eq!(bare.description, "");
        assert_eq!(bare.episode_title, "");
        assert!(bare.season.is_none());

        let unlimited = Normalizer::new(None, 0);
        let long = "a".repeat(500);
        assert_eq!(unlimited.clean_description(Some(&long)).len(), 500);
    }

    #[test]
    fn test_runtime_and_metadata() {
        let mut with_meta = draft("20:00", "Film").with_runtime("PT2H14M");
        with_meta.rating = Some(" PG-13 ".to_string());
        with_meta.venue = Some("   ".to_string());

        let item = Normalizer::default().normalize_item(with_meta).unwrap();
        assert_eq!(item.runtime.as_deref(), Some("2h 14m"));
        assert_eq!(item.rating.as_deref(), Some("PG-13"));
        assert!(item.venue.is_none());
    }

    #[test]
    fn test_from_config_rejects_bad_timezone() {
        let config = ResolverConfig {
            display_timezone: Some("Not/AZone".to_string()),
            ..ResolverConfig::default()
        };
        assert!(Normalizer::from_config(&config).is_err());
    }
}
