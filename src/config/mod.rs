use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{info, warn};

pub mod defaults;
pub mod duration_serde;

use defaults::*;

use crate::errors::{AppError, AppResult};
use crate::utils::time::parse_timezone;

/// Environment variable holding the Gracenote (TMS) API key
pub const ENV_GRACENOTE_API_KEY: &str = "GRACENOTE_API_KEY";
pub const ENV_HOST: &str = "LISTINGS_PROXY_HOST";
pub const ENV_PORT: &str = "LISTINGS_PROXY_PORT";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub sources: SourcesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Outbound HTTP settings shared by every adapter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_accept")]
    pub accept: String,
    #[serde(default = "default_accept_language")]
    pub accept_language: String,
    #[serde(default = "default_connect_timeout", with = "duration_serde::duration")]
    pub connect_timeout: Duration,
    #[serde(default = "default_request_timeout", with = "duration_serde::duration")]
    pub request_timeout: Duration,
}

/// Fallback resolution and normalization settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Hard ceiling on a single adapter attempt
    #[serde(default = "default_adapter_timeout", with = "duration_serde::duration")]
    pub adapter_timeout: Duration,
    /// IANA timezone for wall-clock labels; instants keep their own offset when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_timezone: Option<String>,
    /// Description length cap in characters, 0 disables truncation
    #[serde(default = "default_max_description_length")]
    pub max_description_length: usize,
}

impl ResolverConfig {
    /// Timezone used by the current-time endpoint
    pub fn clock_timezone(&self) -> &str {
        self.display_timezone
            .as_deref()
            .unwrap_or(DEFAULT_CLOCK_TIMEZONE)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// Adapter names tried for schedule lookups, highest priority first
    #[serde(default = "default_schedule_order")]
    pub schedule_order: Vec<String>,
    /// Adapter names tried for movie lookups, highest priority first
    #[serde(default = "default_movie_order")]
    pub movie_order: Vec<String>,
    #[serde(default)]
    pub gracenote: GracenoteConfig,
    #[serde(default)]
    pub tvmaze: TvmazeConfig,
    #[serde(default)]
    pub tvguide: TvGuideConfig,
    #[serde(default)]
    pub network_site: NetworkSiteConfig,
    #[serde(default)]
    pub theater_site: TheaterSiteConfig,
}

/// Gracenote (TMS) data API, used for both airings and movie showings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GracenoteConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "default_gracenote_base_url")]
    pub base_url: String,
    /// Entity (network code) to TMS station id
    #[serde(default = "default_gracenote_stations")]
    pub station_ids: BTreeMap<String, String>,
    /// Showings search radius in miles when the query has none
    #[serde(default = "default_gracenote_radius")]
    pub default_radius: u32,
    #[serde(
        default,
        with = "duration_serde::option_duration",
        skip_serializing_if = "Option::is_none"
    )]
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TvmazeConfig {
    #[serde(default = "default_tvmaze_base_url")]
    pub base_url: String,
    #[serde(default = "default_tvmaze_country")]
    pub country: String,
    /// Entity to TVmaze network display name
    #[serde(default = "default_tvmaze_networks")]
    pub networks: BTreeMap<String, String>,
    #[serde(
        default,
        with = "duration_serde::option_duration",
        skip_serializing_if = "Option::is_none"
    )]
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TvGuideConfig {
    /// Listing page URL with `{entity}` and `{date}` placeholders
    #[serde(default = "default_tvguide_url_template")]
    pub url_template: String,
    #[serde(default = "default_tvguide_max_items")]
    pub max_items: usize,
    #[serde(
        default,
        with = "duration_serde::option_duration",
        skip_serializing_if = "Option::is_none"
    )]
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkSiteConfig {
    /// Entity to official schedule page
    #[serde(default = "default_network_sites")]
    pub pages: BTreeMap<String, String>,
    #[serde(
        default,
        with = "duration_serde::option_duration",
        skip_serializing_if = "Option::is_none"
    )]
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TheaterSiteConfig {
    #[serde(default)]
    pub theaters: Vec<TheaterPage>,
    #[serde(
        default,
        with = "duration_serde::option_duration",
        skip_serializing_if = "Option::is_none"
    )]
    pub timeout: Option<Duration>,
}

/// A theater whose showtimes page publishes schema.org `ScreeningEvent` data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TheaterPage {
    pub name: String,
    pub url: String,
    /// Postal codes this theater serves; empty matches every query
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub postal_codes: Vec<String>,
}

// Web defaults
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

// HTTP defaults
fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_accept() -> String {
    DEFAULT_ACCEPT.to_string()
}

fn default_accept_language() -> String {
    DEFAULT_ACCEPT_LANGUAGE.to_string()
}

fn default_connect_timeout() -> Duration {
    DEFAULT_CONNECT_TIMEOUT
}

fn default_request_timeout() -> Duration {
    DEFAULT_REQUEST_TIMEOUT
}

// Resolver defaults
fn default_adapter_timeout() -> Duration {
    DEFAULT_ADAPTER_TIMEOUT
}

fn default_max_description_length() -> usize {
    DEFAULT_MAX_DESCRIPTION_LENGTH
}

// Source defaults
fn default_schedule_order() -> Vec<String> {
    DEFAULT_SCHEDULE_ORDER.iter().map(|s| s.to_string()).collect()
}

fn default_movie_order() -> Vec<String> {
    DEFAULT_MOVIE_ORDER.iter().map(|s| s.to_string()).collect()
}

fn pairs_to_map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn default_gracenote_base_url() -> String {
    DEFAULT_GRACENOTE_BASE_URL.to_string()
}

fn default_gracenote_stations() -> BTreeMap<String, String> {
    pairs_to_map(DEFAULT_GRACENOTE_STATIONS)
}

fn default_gracenote_radius() -> u32 {
    DEFAULT_GRACENOTE_RADIUS
}

fn default_tvmaze_base_url() -> String {
    DEFAULT_TVMAZE_BASE_URL.to_string()
}

fn default_tvmaze_country() -> String {
    DEFAULT_TVMAZE_COUNTRY.to_string()
}

fn default_tvmaze_networks() -> BTreeMap<String, String> {
    pairs_to_map(DEFAULT_TVMAZE_NETWORKS)
}

fn default_tvguide_url_template() -> String {
    DEFAULT_TVGUIDE_URL_TEMPLATE.to_string()
}

fn default_tvguide_max_items() -> usize {
    DEFAULT_TVGUIDE_MAX_ITEMS
}

fn default_network_sites() -> BTreeMap<String, String> {
    pairs_to_map(DEFAULT_NETWORK_SITES)
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            accept: default_accept(),
            accept_language: default_accept_language(),
            connect_timeout: default_connect_timeout(),
            request_timeout: default_request_timeout(),
        }
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            adapter_timeout: default_adapter_timeout(),
            display_timezone: None,
            max_description_length: default_max_description_length(),
        }
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            schedule_order: default_schedule_order(),
            movie_order: default_movie_order(),
            gracenote: GracenoteConfig::default(),
            tvmaze: TvmazeConfig::default(),
            tvguide: TvGuideConfig::default(),
            network_site: NetworkSiteConfig::default(),
            theater_site: TheaterSiteConfig::default(),
        }
    }
}

impl Default for GracenoteConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_gracenote_base_url(),
            station_ids: default_gracenote_stations(),
            default_radius: default_gracenote_radius(),
            timeout: None,
        }
    }
}

impl Default for TvmazeConfig {
    fn default() -> Self {
        Self {
            base_url: default_tvmaze_base_url(),
            country: default_tvmaze_country(),
            networks: default_tvmaze_networks(),
            timeout: None,
        }
    }
}

impl Default for TvGuideConfig {
    fn default() -> Self {
        Self {
            url_template: default_tvguide_url_template(),
            max_items: default_tvguide_max_items(),
            timeout: None,
        }
    }
}

impl Default for NetworkSiteConfig {
    fn default() -> Self {
        Self {
            pages: default_network_sites(),
            timeout: None,
        }
    }
}

impl Config {
    pub fn load_from_file(config_file: &str) -> Result<Self> {
        let mut config = if std::path::Path::new(&config_file).exists() {
            let contents = std::fs::read_to_string(config_file)?;
            toml::from_str(&contents)?
        } else {
            let default_config = Self::default();
            let contents = toml::to_string_pretty(&default_config)?;
            std::fs::write(config_file, contents)?;
            info!("Created default config file: {}", config_file);
            default_config
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply environment-style overrides from `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(api_key) = lookup(ENV_GRACENOTE_API_KEY).filter(|k| !k.trim().is_empty()) {
            self.sources.gracenote.api_key = Some(api_key.trim().to_string());
        }

        if let Some(host) = lookup(ENV_HOST).filter(|h| !h.trim().is_empty()) {
            self.web.host = host.trim().to_string();
        }

        if let Some(port) = lookup(ENV_PORT) {
            match port.trim().parse::<u16>() {
                Ok(port) => self.web.port = port,
                Err(_) => warn!("Ignoring invalid {} value '{}'", ENV_PORT, port),
            }
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.resolver.adapter_timeout.is_zero() {
            return Err(AppError::configuration(
                "resolver.adapter_timeout must be greater than zero",
            ));
        }

        if let Some(tz) = &self.resolver.display_timezone {
            parse_timezone(tz).map_err(AppError::configuration)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config_round_trips_through_toml() {
        let rendered = toml::to_string_pretty(&Config::default()).unwrap();
        let parsed: Config = toml::from_str(&rendered).unwrap();

        assert_eq!(parsed.web.port, DEFAULT_PORT);
        assert_eq!(parsed.resolver.adapter_timeout, DEFAULT_ADAPTER_TIMEOUT);
        assert_eq!(
            parsed.sources.schedule_order,
            vec!["gracenote", "tvmaze", "tvguide", "network_site"]
        );
        assert_eq!(
            parsed.sources.gracenote.station_ids.get("nbc").map(String::as_str),
            Some("10161")
        );
        assert!(parsed.sources.gracenote.api_key.is_none());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [resolver]
            adapter_timeout = "5s"
            display_timezone = "Europe/London"

            [[sources.theater_site.theaters]]
            name = "Main Street Cinema"
            url = "https://mainstreet.example/showtimes"
            "#,
        )
        .unwrap();

        assert_eq!(config.resolver.adapter_timeout, Duration::from_secs(5));
        assert_eq!(config.resolver.clock_timezone(), "Europe/London");
        assert_eq!(config.resolver.max_description_length, 200);
        assert_eq!(config.sources.theater_site.theaters.len(), 1);
        assert_eq!(config.http.request_timeout, DEFAULT_REQUEST_TIMEOUT);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_GRACENOTE_API_KEY, " abc123 "),
            (ENV_HOST, "127.0.0.1"),
            (ENV_PORT, "not-a-port"),
        ]);

        let mut config = Config::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.sources.gracenote.api_key.as_deref(), Some("abc123"));
        assert_eq!(config.web.host, "127.0.0.1");
        assert_eq!(config.web.port, DEFAULT_PORT);
    }

    #[test]
    fn test_validate_rejects_unknown_timezone() {
        let mut config = Config::default();
        config.resolver.display_timezone = Some("Nowhere/Special".to_string());
        assert!(matches!(
            config.validate(),
            Err(AppError::Configuration { .. })
        ));

        assert_eq!(Config::default().resolver.clock_timezone(), "America/New_York");
    }

    #[test]
    fn test_missing_file_writes_default() {
        let path = std::env::temp_dir().join(format!(
            "listings-proxy-config-{}.toml",
            std::process::id()
        ));
        let path_str = path.to_string_lossy().to_string();
        let _ = std::fs::remove_file(&path);

        let config = Config::load_from_file(&path_str).unwrap();
        assert!(path.exists());
        assert_eq!(config.web.port, DEFAULT_PORT);

        let _ = std::fs::remove_file(&path);
    }
}
