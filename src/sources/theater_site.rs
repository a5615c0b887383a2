//! Theater showtime pages publishing schema.org `ScreeningEvent` data

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use super::status::SCRAPED;
use super::traits::{AdapterKind, SourceAdapter};
use crate::config::{TheaterPage, TheaterSiteConfig};
use crate::errors::{SourceError, SourceResult};
use crate::models::{ItemDraft, Query, RawListing, StartTime};
use crate::utils::html::{extract_json_ld, json_ld_text, json_ld_type_is};
use crate::utils::HttpClient;

pub const NAME: &str = "theater_site";

/// Screenings on `date` found on one theater page
///
/// The screening's `location` names the theater; `fallback_venue` is used
/// when the page leaves it out.
pub fn parse_showtimes_page(
    html: &str,
    date: NaiveDate,
    fallback_venue: &str,
) -> Result<Vec<ItemDraft>, String> {
    let drafts = extract_json_ld(html)?
        .iter()
        .filter(|node| json_ld_type_is(node, &["ScreeningEvent"]))
        .map(|event| screening_to_draft(event, fallback_venue))
        .filter(|draft| draft.start.falls_on(date))
        .collect();
    Ok(drafts)
}

fn screening_to_draft(event: &Value, fallback_venue: &str) -> ItemDraft {
    let movie = event.get("workPresented");
    let from_movie = |key: &str| movie.and_then(|m| json_ld_text(m, key));

    ItemDraft {
        start: json_ld_text(event, "startDate")
            .map(|s| StartTime::parse(&s))
            .unwrap_or(StartTime::Unknown),
        title: from_movie("name").or_else(|| json_ld_text(event, "name")),
        description: from_movie("description"),
        episode_title: None,
        season: None,
        episode: None,
        runtime: from_movie("duration").or_else(|| json_ld_text(event, "duration")),
        rating: from_movie("contentRating"),
        venue: json_ld_text(event, "location").or_else(|| Some(fallback_venue.to_string())),
    }
}

pub struct TheaterSiteAdapter {
    client: HttpClient,
    config: TheaterSiteConfig,
}

impl TheaterSiteAdapter {
    pub fn new(client: HttpClient, config: TheaterSiteConfig) -> Self {
        Self { client, config }
    }

    /// Theaters serving `postal_code`; theaters with no list serve everyone
    fn theaters_for<'a>(&'a self, postal_code: &'a str) -> impl Iterator<Item = &'a TheaterPage> + 'a {
        self.config.theaters.iter().filter(move |theater| {
            theater.postal_codes.is_empty() || theater.postal_codes.iter().any(|p| p == postal_code)
        })
    }
}

#[async_trait]
impl SourceAdapter for TheaterSiteAdapter {
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
        let postal_code = query.postal_code().unwrap_or(query.entity());
        let theaters: Vec<&TheaterPage> = self.theaters_for(postal_code).collect();
        if theaters.is_empty() {
            return Err(SourceError::unsupported_entity(NAME, postal_code));
        }

        let mut drafts = Vec::new();
        let mut first_error = None;

        for theater in theaters {
            let parsed = match self.client.get_text(NAME, &theater.url).await {
                Ok(html) => parse_showtimes_page(&html, query.date(), &theater.name)
                    .map_err(|e| SourceError::parse(NAME, e)),
                Err(e) => Err(e),
            };

            match parsed {
                Ok(mut found) => {
                    debug!("{}: {} screenings at {}", NAME, found.len(), theater.name);
                    drafts.append(&mut found);
                }
                Err(e) => {
                    warn!("{}: skipping {}: {}", NAME, theater.name, e);
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        if drafts.is_empty() {
            return Err(first_error.unwrap_or_else(|| SourceError::empty(NAME)));
        }
        Ok(RawListing::new(drafts, SCRAPED))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HttpConfig;
    use crate::errors::FailureKind;

    const FIXTURE: &str = r#"<html><head>
      <script type="application/ld+json">
      [
        {
          "@context": "https://schema.org",
          "@type": "ScreeningEvent",
          "startDate": "2025-07-27T19:30:00-05:00",
          "location": {"@type": "MovieTheater", "name": "Main Street Cinema"},
          "workPresented": {"@type": "Movie", "name": "Heat", "duration": "PT2H50M", "contentRating": "R"}
        },
        {
          "@type": "ScreeningEvent",
          "startDate": "2025-07-27T14:00:00-05:00",
          "workPresented": {"@type": "Movie", "name": "Heat"}
        },
        {
          "@type": "ScreeningEvent",
          "startDate": "2025-07-29T14:00:00-05:00",
          "workPresented": {"@type": "Movie", "name": "Later Film"}
        },
        {"@type": "MovieTheater", "name": "Main Street Cinema"}
      ]
      </script>
    </head></html>"#;

    #[test]
    fn test_parse_screenings_for_day() {
        let date = NaiveDate::from_ymd_opt(2025, 7, 27).unwrap();
        let drafts = parse_showtimes_page(FIXTURE, date, "Fallback Theater").unwrap();

        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].title.as_deref(), Some("Heat"));
        assert_eq!(drafts[0].venue.as_deref(), Some("Main Street Cinema"));
        assert_eq!(drafts[0].rating.as_deref(), Some("R"));
        assert_eq!(drafts[0].runtime.as_deref(), Some("PT2H50M"));
        assert_eq!(drafts[1].venue.as_deref(), Some("Fallback Theater"));
    }

    #[tokio::test]
    async fn test_no_theater_for_postal_code() {
        let config = TheaterSiteConfig {
            theaters: vec![TheaterPage {
                name: "Main Street Cinema".to_string(),
                url: "http://127.0.0.1:9/showtimes".to_string(),
                postal_codes: vec!["90210".to_string()],
            }],
            timeout: None,
        };
        let adapter = TheaterSiteAdapter::new(HttpClient::new(&HttpConfig::default()).unwrap(), config);
        let query = Query::new("36330", NaiveDate::from_ymd_opt(2025, 7, 27).unwrap()).unwrap();

        let err = adapter.fetch(&query).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::EmptyResultError);
    }

    #[tokio::test]
    async fn test_unreachable_theater_reports_transport_failure() {
        let config = TheaterSiteConfig {
            theaters: vec![TheaterPage {
                name: "Closed Cinema".to_string(),
                url: "http://127.0.0.1:9/showtimes".to_string(),
                postal_codes: vec![],
            }],
            timeout: None,
        };
        let adapter = TheaterSiteAdapter::new(HttpClient::new(&HttpConfig::default()).unwrap(), config);
        let query = Query::new("36330", NaiveDate::from_ymd_opt(2025, 7, 27).unwrap()).unwrap();

        let err = adapter.fetch(&query).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::TransportError);
    }
}
