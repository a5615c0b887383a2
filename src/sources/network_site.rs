//! Official network schedule pages
//!
//! Network sites that publish structured data embed schema.org JSON-LD
//! (`BroadcastEvent`, `TVEpisode`, plain `Event`). Pages without it yield
//! nothing and the resolver moves on.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::status::LIMITED_DATA;
use super::traits::{AdapterKind, SourceAdapter};
use crate::config::NetworkSiteConfig;
use crate::errors::{SourceError, SourceResult};
use crate::models::{ItemDraft, Query, RawListing, StartTime};
use crate::utils::html::{extract_json_ld, json_ld_text, json_ld_type_is};
use crate::utils::HttpClient;

pub const NAME: &str = "network_site";

const EVENT_TYPES: &[&str] = &["BroadcastEvent", "TVEpisode", "Episode", "Event", "PublicationEvent"];

fn number_field(value: &Value, key: &str) -> Option<u32> {
    json_ld_text(value, key).and_then(|n| n.trim().parse().ok())
}

/// Build a draft from one JSON-LD event node
///
/// A broadcast names its programme in `workPerformed`; an episode names its
/// series in `partOfSeries`. In both cases the programme becomes the title
/// and the node's own name the episode title.
pub fn event_to_draft(event: &Value) -> ItemDraft {
    let work = event.get("workPerformed");
    let series = event
        .get("partOfSeries")
        .or_else(|| work.and_then(|w| w.get("partOfSeries")));

    let own_name = json_ld_text(event, "name");
    let programme = series
        .and_then(|s| json_ld_text(s, "name"))
        .or_else(|| work.and_then(|w| json_ld_text(w, "name")));

    let (title, episode_title) = match programme {
        Some(programme) => (Some(programme), own_name.filter(|_| series.is_some())),
        None => (own_name, None),
    };

    let episode_node = work.unwrap_or(event);
    let start = json_ld_text(event, "startDate")
        .map(|s| StartTime::parse(&s))
        .unwrap_or(StartTime::Unknown);

    ItemDraft {
        start,
        title,
        description: json_ld_text(event, "description")
            .or_else(|| work.and_then(|w| json_ld_text(w, "description"))),
        episode_title,
        season: episode_node
            .get("partOfSeason")
            .and_then(|s| number_field(s, "seasonNumber")),
        episode: number_field(episode_node, "episodeNumber"),
        runtime: json_ld_text(event, "duration")
            .or_else(|| work.and_then(|w| json_ld_text(w, "duration"))),
        rating: work
            .and_then(|w| json_ld_text(w, "contentRating"))
            .or_else(|| json_ld_text(event, "contentRating")),
        venue: None,
    }
}

/// Extract the events on `date` from a schedule page
pub fn parse_schedule_page(html: &str, date: NaiveDate) -> Result<Vec<ItemDraft>, String> {
    let drafts = extract_json_ld(html)?
        .iter()
        .filter(|node| json_ld_type_is(node, EVENT_TYPES))
        .map(event_to_draft)
        .filter(|draft| draft.start.falls_on(date))
        .collect();
    Ok(drafts)
}

pub struct NetworkSiteAdapter {
    client: HttpClient,
    config: NetworkSiteConfig,
}

impl NetworkSiteAdapter {
    pub fn new(client: HttpClient, config: NetworkSiteConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl SourceAdapter for NetworkSiteAdapter {
    fn name(&self) -> &str {
        NAME
    }

    fn kind(&self) -> AdapterKind {
        AdapterKind::DirectSite
    }

    fn timeout(&self) -> Option<Duration> {
        self.config.timeout
    }

    async fn fetch(&self, query: &Query) -> SourceResult<RawListing> {
        let url = self
            .config
            .pages
            .get(query.entity())
            .ok_or_else(|| SourceError::unsupported_entity(NAME, query.entity()))?;

        let html = self.client.get_text(NAME, url).await?;
        let drafts =
            parse_schedule_page(&html, query.date()).map_err(|e| SourceError::parse(NAME, e))?;
        debug!("{}: {} structured events on {}", NAME, drafts.len(), url);

        if drafts.is_empty() {
            return Err(SourceError::empty(NAME));
        }
        Ok(RawListing::new(drafts, LIMITED_DATA))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const FIXTURE: &str = r#"<html><head>
      <script type="application/ld+json">
      {"@context": "https://schema.org", "@graph": [
        {
          "@type": "BroadcastEvent",
          "name": "The Last Call",
          "startDate": "2025-07-27T21:00:00-04:00",
          "workPerformed": {
            "@type": "TVEpisode",
            "name": "The Last Call",
            "episodeNumber": "12",
            "partOfSeason": {"@type": "TVSeason", "seasonNumber": 33},
            "partOfSeries": {"@type": "TVSeries", "name": "Dateline"},
            "description": "A mystery unfolds."
          }
        },
        {
          "@type": "BroadcastEvent",
          "name": "Tomorrow's Show",
          "startDate": "2025-07-28T20:00:00-04:00"
        },
        {"@type": "Organization", "name": "NBC"}
      ]}
      </script>
      <script type="application/ld+json">
      {"@type": "Event", "name": "Sunday Night Football", "startDate": "2025-07-27T20:20:00-04:00", "duration": "PT3H"}
      </script>
    </head><body></body></html>"#;

    #[test]
    fn test_parse_events_for_day() {
        let date = NaiveDate::from_ymd_opt(2025, 7, 27).unwrap();
        let drafts = parse_schedule_page(FIXTURE, date).unwrap();

        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].title.as_deref(), Some("Dateline"));
        assert_eq!(drafts[0].episode_title.as_deref(), Some("The Last Call"));
        assert_eq!(drafts[0].season, Some(33));
        assert_eq!(drafts[0].episode, Some(12));
        assert_eq!(drafts[0].description.as_deref(), Some("A mystery unfolds."));

        assert_eq!(drafts[1].title.as_deref(), Some("Sunday Night Football"));
        assert_eq!(drafts[1].runtime.as_deref(), Some("PT3H"));
        assert!(drafts[1].episode_title.is_none());
    }

    #[test]
    fn test_plain_broadcast_without_work() {
        let draft = event_to_draft(&json!({
            "@type": "BroadcastEvent",
            "name": "Local News",
            "startDate": "2025-07-27T18:00"
        }));
        assert_eq!(draft.title.as_deref(), Some("Local News"));
        assert!(draft.episode_title.is_none());
        assert!(matches!(draft.start, StartTime::Naive(_)));
    }

    #[test]
    fn test_page_without_structured_data() {
        let date = NaiveDate::from_ymd_opt(2025, 7, 27).unwrap();
        assert!(parse_schedule_page("<html><body>Schedule</body></html>", date)
            .unwrap()
            .is_empty());
    }
}
