//! Gracenote (TMS) station airings
//!
//! `GET {base}/v1.1/stations/{station}/airings` for the query day. The
//! response is either a bare array of airings or an object wrapping one.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::lenient;
use super::status::COMMERCIAL_VERIFIED;
use super::traits::{AdapterKind, SourceAdapter};
use crate::config::{GracenoteConfig, ENV_GRACENOTE_API_KEY};
use crate::errors::{SourceError, SourceResult};
use crate::models::{ItemDraft, Query, RawListing, StartTime};
use crate::utils::url::UrlUtils;
use crate::utils::HttpClient;

pub const NAME: &str = "gracenote";

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum AiringsPayload {
    List(Vec<Airing>),
    Wrapped {
        #[serde(default)]
        airings: Vec<Airing>,
    },
}

impl AiringsPayload {
    fn into_airings(self) -> Vec<Airing> {
        match self {
            AiringsPayload::List(airings) => airings,
            AiringsPayload::Wrapped { airings } => airings,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Airing {
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub duration: Option<String>,
    #[serde(default)]
    pub program: Program,
    #[serde(default)]
    pub ratings: Vec<Rating>,
    #[serde(default, deserialize_with = "lenient::optional_u32")]
    pub season_num: Option<u32>,
    #[serde(default, deserialize_with = "lenient::optional_u32")]
    pub episode_num: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    pub title: Option<String>,
    pub short_description: Option<String>,
    pub long_description: Option<String>,
    pub episode_title: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_u32")]
    pub season_num: Option<u32>,
    #[serde(default, deserialize_with = "lenient::optional_u32")]
    pub episode_num: Option<u32>,
    #[serde(default)]
    pub ratings: Vec<Rating>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Rating {
    pub code: Option<String>,
}

/// Turn an airings payload into drafts
pub fn airings_to_drafts(payload: AiringsPayload) -> Vec<ItemDraft> {
    payload
        .into_airings()
        .into_iter()
        .map(|airing| {
            let program = airing.program;
            let rating = airing
                .ratings
                .iter()
                .chain(program.ratings.iter())
                .find_map(|r| r.code.clone());

            ItemDraft {
                start: airing
                    .start_time
                    .as_deref()
                    .map(StartTime::parse)
                    .unwrap_or(StartTime::Unknown),
                title: program.title,
                description: program.short_description.or(program.long_description),
                episode_title: program.episode_title,
                season: airing.season_num.or(program.season_num),
                episode: airing.episode_num.or(program.episode_num),
                runtime: airing.duration,
                rating,
                venue: None,
            }
        })
        .collect()
}

pub struct GracenoteAdapter {
    client: HttpClient,
    config: GracenoteConfig,
}

impl GracenoteAdapter {
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

    fn airings_url(&self, api_key: &str, station: &str, date: &str) -> SourceResult<String> {
        let start = format!("{date}T00:00Z");
        let end = format!("{date}T23:59Z");
        UrlUtils::build(
            &self.config.base_url,
            &format!("v1.1/stations/{station}/airings"),
            &[("api_key", api_key), ("startDateTime", &start), ("endDateTime", &end)],
        )
        .map_err(|e| SourceError::transport(NAME, format!("invalid base URL: {e}")))
    }
}

#[async_trait]
impl SourceAdapter for GracenoteAdapter {
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
        let station = self
            .config
            .station_ids
            .get(query.entity())
            .ok_or_else(|| SourceError::unsupported_entity(NAME, query.entity()))?;

        let url = self.airings_url(api_key, station, &query.date_string())?;
        let payload: AiringsPayload = self.client.get_json(NAME, &url).await?;

        let drafts = airings_to_drafts(payload);
        debug!("{}: station {} returned {} airings", NAME, station, drafts.len());

        if drafts.is_empty() {
            return Err(SourceError::empty(NAME));
        }
        Ok(RawListing::new(drafts, COMMERCIAL_VERIFIED))
    }
}
