//! TVmaze free schedule API
//!
//! The schedule endpoint returns every episode airing in a country on a day;
//! entries are kept when the show's network matches the entity's configured
//! display name.
//!
//! Every start comes from `airdate` + `airtime` on the network's local clock;
//! the UTC `airstamp` is ignored so one listing never mixes time bases.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use super::lenient;
use super::status::VERIFIED;
use super::traits::{AdapterKind, SourceAdapter};
use crate::config::TvmazeConfig;
use crate::errors::{SourceError, SourceResult};
use crate::models::{ItemDraft, Query, RawListing, StartTime};
use crate::utils::url::UrlUtils;
use crate::utils::HttpClient;

pub const NAME: &str = "tvmaze";

#[derive(Debug, Deserialize)]
pub struct ScheduleEntry {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_u32")]
    pub season: Option<u32>,
    #[serde(default, deserialize_with = "lenient::optional_u32")]
    pub number: Option<u32>,
    pub airdate: Option<String>,
    pub airtime: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub runtime: Option<String>,
    pub summary: Option<String>,
    pub show: Option<Show>,
}

#[derive(Debug, Deserialize)]
pub struct Show {
    pub name: Option<String>,
    pub summary: Option<String>,
    pub network: Option<Network>,
}

#[derive(Debug, Deserialize)]
pub struct Network {
    pub name: String,
}

/// Keep entries broadcast on `network` and turn them into drafts
pub fn schedule_to_drafts(entries: Vec<ScheduleEntry>, network: &str) -> Vec<ItemDraft> {
    entries
        .into_iter()
        .filter_map(|entry| {
            let show = entry.show?;
            let on_network = show
                .network
                .as_ref()
                .is_some_and(|n| n.name.eq_ignore_ascii_case(network));
            if !on_network {
                return None;
            }

            let start = local_start(entry.airdate.as_deref(), entry.airtime.as_deref());

            Some(ItemDraft {
                start,
                title: show.name,
                description: entry.summary.or(show.summary),
                episode_title: entry.name,
                season: entry.season,
                episode: entry.number,
                runtime: entry.runtime,
                rating: None,
                venue: None,
            })
        })
        .collect()
}

/// Network-local start from the entry's date and clock time
fn local_start(airdate: Option<&str>, airtime: Option<&str>) -> StartTime {
    let time = airtime.map(str::trim).unwrap_or_default();
    if time.is_empty() {
        return StartTime::Unknown;
    }
    match airdate.map(str::trim).filter(|d| !d.is_empty()) {
        Some(date) => StartTime::parse(&format!("{date}T{time}")),
        None => StartTime::parse(time),
    }
}

pub struct TvmazeAdapter {
    client: HttpClient,
    config: TvmazeConfig,
}

impl TvmazeAdapter {
    pub fn new(client: HttpClient, config: TvmazeConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl SourceAdapter for TvmazeAdapter {
    fn name(&self) -> &str {
        NAME
    }

    fn kind(&self) -> AdapterKind {
        AdapterKind::FreeApi
    }

    fn timeout(&self) -> Option<Duration> {
        self.config.timeout
    }

    async fn fetch(&self, query: &Query) -> SourceResult<RawListing> {
        let network = self
            .config
            .networks
            .get(query.entity())
            .ok_or_else(|| SourceError::unsupported_entity(NAME, query.entity()))?;

        let date = query.date_string();
        let url = UrlUtils::build(
            &self.config.base_url,
            "schedule",
            &[("country", self.config.country.as_str()), ("date", date.as_str())],
        )
        .map_err(|e| SourceError::transport(NAME, format!("invalid base URL: {e}")))?;

        let entries: Vec<ScheduleEntry> = self.client.get_json(NAME, &url).await?;
        let drafts = schedule_to_drafts(entries, network);

        if drafts.is_empty() {
            return Err(SourceError::empty(NAME));
        }
        Ok(RawListing::new(drafts, VERIFIED))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::Normalizer;
    use chrono::NaiveDate;

    const FIXTURE: &str = r#"[
        {
            "id": 1,
            "name": "Pilot",
            "season": 1,
            "number": 1,
            "airdate": "2025-07-27",
            "airtime": "20:00",
            "airstamp": "2025-07-28T00:00:00+00:00",
            "runtime": 60,
            "summary": null,
            "show": {
                "name": "Brilliant Minds",
                "summary": "<p>A neurologist <b>solves</b> cases.</p>",
                "network": {"id": 1, "name": "NBC"}
            }
        },
        {
            "name": "Episode 4",
            "airtime": "21:00",
            "airstamp": null,
            "runtime": 30,
            "show": {"name": "Other Show", "network": {"name": "CBS"}}
        },
        {
            "name": "Streaming Only",
            "airtime": "",
            "show": {"name": "Web Show", "network": null}
        },
        {
            "name": "Late Edition",
            "airdate": "2025-07-27",
            "airtime": "23:35",
            "airstamp": null,
            "summary": "<p>Interviews.</p>",
            "show": {"name": "Late Night", "network": {"name": "nbc"}}
        }
    ]"#;

    #[test]
    fn test_filters_by_network_name() {
        let entries: Vec<ScheduleEntry> = serde_json::from_str(FIXTURE).unwrap();
        let drafts = schedule_to_drafts(entries, "NBC");

        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].title.as_deref(), Some("Brilliant Minds"));
        assert_eq!(drafts[0].episode_title.as_deref(), Some("Pilot"));
        assert_eq!(drafts[0].runtime.as_deref(), Some("60"));
        assert!(drafts[0].description.as_deref().unwrap().contains("neurologist"));
        assert!(matches!(drafts[0].start, StartTime::Naive(_)));

        assert_eq!(drafts[1].title.as_deref(), Some("Late Night"));
        assert!(matches!(drafts[1].start, StartTime::Naive(_)));
        assert_eq!(drafts[1].description.as_deref(), Some("<p>Interviews.</p>"));
    }

    #[test]
    fn test_entries_share_local_time_base() {
        let entries: Vec<ScheduleEntry> = serde_json::from_str(FIXTURE).unwrap();
        let drafts = schedule_to_drafts(entries, "NBC");
        let date = NaiveDate::from_ymd_opt(2025, 7, 27).unwrap();

        // prime time has an airstamp, the late show does not
        let result = Normalizer::default().normalize(RawListing::new(drafts, VERIFIED), NAME, date);
        let listed: Vec<(&str, &str)> = result
            .items
            .iter()
            .map(|item| (item.title.as_str(), item.time.as_str()))
            .collect();
        assert_eq!(
            listed,
            vec![("Brilliant Minds", "08:00 PM"), ("Late Night", "11:35 PM")]
        );
    }

    #[test]
    fn test_missing_airtime_is_unknown() {
        assert_eq!(local_start(Some("2025-07-27"), Some(" ")), StartTime::Unknown);
        assert_eq!(local_start(None, None), StartTime::Unknown);
        assert!(matches!(local_start(None, Some("21:00")), StartTime::Clock(_)));
    }

    #[test]
    fn test_no_matching_network() {
        let entries: Vec<ScheduleEntry> = serde_json::from_str(FIXTURE).unwrap();
        assert!(schedule_to_drafts(entries, "FOX").is_empty());
    }
}
