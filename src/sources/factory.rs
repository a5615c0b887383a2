//! Adapter factory
//!
//! Builds the ordered schedule and movie chains from configuration. Every
//! adapter shares one [`HttpClient`]; unknown adapter names are rejected when
//! the chain is built, not when a request arrives.

use std::sync::Arc;

use super::gracenote::{self, GracenoteAdapter};
use super::gracenote_movies::{self, GracenoteMoviesAdapter};
use super::network_site::{self, NetworkSiteAdapter};
use super::theater_site::{self, TheaterSiteAdapter};
use super::traits::{AdapterSummary, SourceAdapter};
use super::tvguide::{self, TvGuideAdapter};
use super::tvmaze::{self, TvmazeAdapter};
use crate::config::{Config, SourcesConfig};
use crate::errors::{AppError, AppResult};
use crate::utils::HttpClient;

/// Which lookup a chain serves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainKind {
    Schedule,
    Movies,
}

pub struct AdapterFactory {
    client: HttpClient,
    sources: SourcesConfig,
}

impl AdapterFactory {
    pub fn new(config: &Config) -> AppResult<Self> {
        Ok(Self::with_client(
            HttpClient::new(&config.http)?,
            config.sources.clone(),
        ))
    }

    pub fn with_client(client: HttpClient, sources: SourcesConfig) -> Self {
        Self { client, sources }
    }

    /// Names every adapter the factory can build for `kind`
    pub fn supported_names(kind: ChainKind) -> &'static [&'static str] {
        match kind {
            ChainKind::Schedule => &[gracenote::NAME, tvmaze::NAME, tvguide::NAME, network_site::NAME],
            ChainKind::Movies => &[gracenote_movies::NAME, theater_site::NAME],
        }
    }

    /// Create a single adapter by name
    ///
    /// # Errors
    /// Returns a configuration error if the name is unknown for `kind`
    pub fn create_adapter(&self, kind: ChainKind, name: &str) -> AppResult<Arc<dyn SourceAdapter>> {
        let client = self.client.clone();
        let adapter: Arc<dyn SourceAdapter> = match (kind, name) {
            (ChainKind::Schedule, gracenote::NAME) => {
                Arc::new(GracenoteAdapter::new(client, self.sources.gracenote.clone()))
            }
            (ChainKind::Schedule, tvmaze::NAME) => {
                Arc::new(TvmazeAdapter::new(client, self.sources.tvmaze.clone()))
            }
            (ChainKind::Schedule, tvguide::NAME) => {
                Arc::new(TvGuideAdapter::new(client, self.sources.tvguide.clone()))
            }
            (ChainKind::Schedule, network_site::NAME) => {
                Arc::new(NetworkSiteAdapter::new(client, self.sources.network_site.clone()))
            }
            (ChainKind::Movies, gracenote_movies::NAME) => {
                Arc::new(GracenoteMoviesAdapter::new(client, self.sources.gracenote.clone()))
            }
            (ChainKind::Movies, theater_site::NAME) => {
                Arc::new(TheaterSiteAdapter::new(client, self.sources.theater_site.clone()))
            }
            _ => {
                return Err(AppError::configuration(format!(
                    "Unknown {} adapter '{}'. Supported: {}",
                    match kind {
                        ChainKind::Schedule => "schedule",
                        ChainKind::Movies => "movie",
                    },
                    name,
                    Self::supported_names(kind).join(", ")
                )))
            }
        };
        Ok(adapter)
    }

    fn build_chain(&self, kind: ChainKind, order: &[String]) -> AppResult<Vec<Arc<dyn SourceAdapter>>> {
        let mut chain: Vec<Arc<dyn SourceAdapter>> = Vec::with_capacity(order.len());
        for name in order {
            let name = name.trim();
            if chain.iter().any(|a| a.name() == name) {
                return Err(AppError::configuration(format!(
                    "Adapter '{name}' is listed twice in the same chain"
                )));
            }
            chain.push(self.create_adapter(kind, name)?);
        }
        Ok(chain)
    }

    /// Schedule adapters in `sources.schedule_order`
    pub fn schedule_chain(&self) -> AppResult<Vec<Arc<dyn SourceAdapter>>> {
        self.build_chain(ChainKind::Schedule, &self.sources.schedule_order)
    }

    /// Movie adapters in `sources.movie_order`
    pub fn movie_chain(&self) -> AppResult<Vec<Arc<dyn SourceAdapter>>> {
        self.build_chain(ChainKind::Movies, &self.sources.movie_order)
    }
}

/// Summaries for a built chain, in priority order
pub fn summarize(chain: &[Arc<dyn SourceAdapter>]) -> Vec<AdapterSummary> {
    chain
        .iter()
        .map(|adapter| AdapterSummary::describe(adapter.as_ref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::AdapterKind;

    fn factory(sources: SourcesConfig) -> AdapterFactory {
        AdapterFactory::with_client(
            HttpClient::new(&crate::config::HttpConfig::default()).unwrap(),
            sources,
        )
    }

    #[test]
    fn test_default_chains_follow_configured_order() {
        let factory = factory(SourcesConfig::default());

        let schedule = summarize(&factory.schedule_chain().unwrap());
        let names: Vec<_> = schedule.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["gracenote", "tvmaze", "tvguide", "network_site"]);
        assert_eq!(schedule[0].kind, AdapterKind::Commercial);
        assert!(!schedule[0].configured);
        assert!(schedule[1].configured);

        let movies = summarize(&factory.movie_chain().unwrap());
        let names: Vec<_> = movies.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["gracenote_movies", "theater_site"]);
    }

    #[test]
    fn test_unknown_adapter_is_configuration_error() {
        let sources = SourcesConfig {
            schedule_order: vec!["tvmaze".to_string(), "teletext".to_string()],
            ..SourcesConfig::default()
        };
        let err = factory(sources).schedule_chain().err().unwrap();
        assert!(matches!(err, AppError::Configuration { .. }));
        assert!(err.to_string().contains("teletext"));
    }

    #[test]
    fn test_adapter_in_wrong_chain_is_rejected() {
        let sources = SourcesConfig {
            movie_order: vec!["tvmaze".to_string()],
            ..SourcesConfig::default()
        };
        assert!(factory(sources).movie_chain().is_err());
    }

    #[test]
    fn test_duplicate_adapter_rejected() {
        let sources = SourcesConfig {
            schedule_order: vec!["tvmaze".to_string(), "tvmaze".to_string()],
            ..SourcesConfig::default()
        };
        assert!(factory(sources).schedule_chain().is_err());
    }

    #[test]
    fn test_configured_key_marks_commercial_adapters_ready() {
        let mut sources = SourcesConfig::default();
        sources.gracenote.api_key = Some("abc".to_string());
        let chain = factory(sources).movie_chain().unwrap();
        assert!(chain[0].is_configured());
    }
}
