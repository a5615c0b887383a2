//! Gracenote (TMS) movie showings near a postal code

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::status::COMMERCIAL_VERIFIED;
use super::traits::{AdapterKind, SourceAdapter};
use crate::config::{GracenoteConfig, ENV_GRACENOTE_API_KEY};
use crate::errors::{SourceError, SourceResult};
use crate::models::{ItemDraft, Query, RawListing, StartTime};
use crate::utils::url::UrlUtils;
use crate::utils::HttpClient;

use super::gracenote::Rating;

pub const NAME: &str = "gracenote_movies";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub title: Option<String>,
    pub short_description: Option<String>,
    pub long_description: Option<String>,
    pub run_time: Option<String>,
    #[serde(default)]
    pub ratings: Vec<Rating>,
    #[serde(default)]
    pub showtimes: Vec<Showtime>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Showtime {
    pub theatre: Option<Theatre>,
    #[serde(default)]
    pub date_time: Option<DateTimes>,
}

#[derive(Debug, Deserialize)]
pub struct Theatre {
    pub name: Option<String>,
}

/// Showings carry a single start or, in some plans, a list of them
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum DateTimes {
    One(String),
    Many(Vec<String>),
}

impl DateTimes {
    fn into_vec(self) -> Vec<String> {
        match self {
            DateTimes::One(one) => vec![one],
            DateTimes::Many(many) => many,
        }
    }
}

/// One draft per movie, theatre and start time on `date`
pub fn showings_to_drafts(movies: Vec<Movie>, date: NaiveDate) -> Vec<ItemDraft> {
    let mut drafts = Vec::new();

    for movie in movies {
        let rating = movie.ratings.iter().find_map(|r| r.code.clone());
        let description = movie.short_description.or(movie.long_description);

        for showtime in movie.showtimes {
            let venue = showtime.theatre.and_then(|t| t.name);
            let starts = showtime.date_time.map(DateTimes::into_vec).unwrap_or_default();

            for raw_start in starts {
                let start = StartTime::parse(&raw_start);
                if !start.falls_on(date) {
                    continue;
                }
                drafts.push(ItemDraft {
                    start,
                    title: movie.title.clone(),
                    description: description.clone(),
                    episode_title: None,
                    season: None,
                    episode: None,
                    runtime: movie.run_time.clone(),
                    rating: rating.clone(),
                    venue: venue.clone(),
                });
            }
        }
    }

    drafts
}

pub struct GracenoteMoviesAdapter {
    client: HttpClient,
    config: GracenoteConfig,
}

impl GracenoteMoviesAdapter {
    pub fn new(client: HttpClient, config: GracenoteConfig) -> Self {
        Self { client, config }
    }

    fn api_key(&self) -> SourceResult<&str> {
        self.config
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| SourceError::missing_credential(NAME, ENV_GRACENOTE_API_KEY))
    }

    fn showings_url(&self, api_key: &str, query: &Query) -> SourceResult<String> {
        let postal_code = query.postal_code().unwrap_or(query.entity());
        let radius = query.radius().unwrap_or(self.config.default_radius).to_string();
        let date = query.date_string();

        UrlUtils::build(
            &self.config.base_url,
            "v1.1/movies/showings",
            &[
                ("api_key", api_key),
                ("startDate", date.as_str()),
                ("zip", postal_code),
                ("radius", radius.as_str()),
            ],
        )
        .map_err(|e| SourceError::transport(NAME, format!("invalid base URL: {e}")))
    }
}

#[async_trait]
impl SourceAdapter for GracenoteMoviesAdapter {
    fn name(&self) -> &str {
        NAME
    }

    fn kind(&self) -> AdapterKind {
        AdapterKind::Commercial
    }

    fn timeout(&self) -> Option<Duration> {
        self.config.timeout
    }

    fn is_configured(&self) -> bool {
        self.api_key().is_ok()
    }

    async fn fetch(&self, query: &Query) -> SourceResult<RawListing> {
        let api_key = self.api_key()?;
        let url = self.showings_url(api_key, query)?;

        let movies: Vec<Movie> = self.client.get_json(NAME, &url).await?;
        debug!("{}: {} movies near {}", NAME, movies.len(), query.entity());

        let drafts = showings_to_drafts(movies, query.date());
        if drafts.is_empty() {
            return Err(SourceError::empty(NAME));
        }
        Ok(RawListing::new(drafts, COMMERCIAL_VERIFIED))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HttpConfig;
    use crate::errors::FailureKind;

    const FIXTURE: &str = r#"[
        {
            "tmsId": "MV000000001",
            "title": "Heat",
            "releaseYear": 1995,
            "runTime": "PT02H50M",
            "ratings": [{"body": "Motion Picture Association of America", "code": "R"}],
            "showtimes": [
                {"theatre": {"id": "1", "name": "Main Street Cinema"}, "dateTime": "2025-07-27T19:30"},
                {"theatre": {"id": "1", "name": "Main Street Cinema"}, "dateTime": "2025-07-27T13:00"},
                {"theatre": {"id": "2", "name": "Drive-In"}, "dateTime": ["2025-07-27T21:00", "2025-07-28T21:00"]}
            ]
        },
        {"title": "No Showtimes", "showtimes": []}
    ]"#;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 27).unwrap()
    }

    #[test]
    fn test_one_draft_per_showing_on_date() {
        let movies: Vec<Movie> = serde_json::from_str(FIXTURE).unwrap();
        let drafts = showings_to_drafts(movies, date());

        assert_eq!(drafts.len(), 3);
        assert!(drafts.iter().all(|d| d.title.as_deref() == Some("Heat")));
        assert_eq!(drafts[0].venue.as_deref(), Some("Main Street Cinema"));
        assert_eq!(drafts[2].venue.as_deref(), Some("Drive-In"));
        assert_eq!(drafts[0].rating.as_deref(), Some("R"));
        assert_eq!(drafts[0].runtime.as_deref(), Some("PT02H50M"));
    }

    #[test]
    fn test_showings_url_prefers_query_radius() {
        let config = GracenoteConfig {
            api_key: Some("k".to_string()),
            base_url: "https://data.tmsapi.com".to_string(),
            ..GracenoteConfig::default()
        };
        let adapter = GracenoteMoviesAdapter::new(HttpClient::new(&HttpConfig::default()).unwrap(), config);

        let query = Query::new("36330", date()).unwrap().with_radius(10);
        let url = adapter.showings_url("k", &query).unwrap();
        assert_eq!(
            url,
            "https://data.tmsapi.com/v1.1/movies/showings?api_key=k&startDate=2025-07-27&zip=36330&radius=10"
        );

        let default_radius = Query::new("36330", date()).unwrap();
        assert!(adapter
            .showings_url("k", &default_radius)
            .unwrap()
            .ends_with("radius=25"));
    }

    #[tokio::test]
    async fn test_missing_key_is_configuration_error() {
        let adapter = GracenoteMoviesAdapter::new(
            HttpClient::new(&HttpConfig::default()).unwrap(),
            GracenoteConfig::default(),
        );
        let query = Query::new("36330", date()).unwrap();
        let err = adapter.fetch(&query).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::ConfigurationError);
    }
}
