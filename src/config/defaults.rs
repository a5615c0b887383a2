//! Configuration default values
//!
//! This module contains all the default values for configuration options,
//! making them easily changeable in one central location.
use std::time::Duration;

// Web server defaults
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

// Outbound HTTP defaults
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; listings-proxy/0.1)";
pub const DEFAULT_ACCEPT: &str = "application/json, text/html;q=0.9, */*;q=0.8";
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

// Resolver defaults
pub const DEFAULT_ADAPTER_TIMEOUT: Duration = Duration::from_secs(20);
pub const DEFAULT_MAX_DESCRIPTION_LENGTH: usize = 200;
pub const DEFAULT_CLOCK_TIMEZONE: &str = "America/New_York";

// Source chains
pub const DEFAULT_SCHEDULE_ORDER: &[&str] = &["gracenote", "tvmaze", "tvguide", "network_site"];
pub const DEFAULT_MOVIE_ORDER: &[&str] = &["gracenote_movies", "theater_site"];

// Gracenote (TMS) defaults
pub const DEFAULT_GRACENOTE_BASE_URL: &str = "https://data.tmsapi.com";
pub const DEFAULT_GRACENOTE_RADIUS: u32 = 25;
pub const DEFAULT_GRACENOTE_STATIONS: &[(&str, &str)] = &[
    ("nbc", "10161"),
    ("abc", "10142"),
    ("cbs", "10239"),
    ("fox", "11867"),
];

// TVmaze defaults
pub const DEFAULT_TVMAZE_BASE_URL: &str = "https://api.tvmaze.com";
pub const DEFAULT_TVMAZE_COUNTRY: &str = "US";
pub const DEFAULT_TVMAZE_NETWORKS: &[(&str, &str)] = &[
    ("nbc", "NBC"),
    ("abc", "ABC"),
    ("cbs", "CBS"),
    ("fox", "FOX"),
];

// TV Guide scrape defaults
pub const DEFAULT_TVGUIDE_URL_TEMPLATE: &str = "https://www.tvguide.com/listings/{entity}/";
pub const DEFAULT_TVGUIDE_MAX_ITEMS: usize = 20;

// Official network schedule pages
pub const DEFAULT_NETWORK_SITES: &[(&str, &str)] = &[
    ("nbc", "https://www.nbc.com/schedule"),
    ("abc", "https://abc.com/schedule"),
    ("cbs", "https://www.cbs.com/schedule/"),
    ("fox", "https://www.fox.com/schedule/"),
];
