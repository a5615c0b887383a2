//! Listing source adapters
//!
//! This module provides one adapter per external provider, all behind the
//! [`SourceAdapter`] trait so the resolver never branches on provider names.
//!
//! # Adapters
//!
//! - **gracenote**: commercial airings API, needs an API key
//! - **tvmaze**: free schedule API, filtered by network
//! - **tvguide**: listing page scrape
//! - **network_site**: official network schedule page, schema.org JSON-LD
//! - **gracenote_movies**: commercial movie showings by postal code and radius
//! - **theater_site**: theater showtime pages, schema.org `ScreeningEvent`
//!
//! # Usage
//!
//! ```rust,no_run
//! use listings_proxy::config::Config;
//! use listings_proxy::sources::AdapterFactory;
//!
//! fn example() -> listings_proxy::errors::AppResult<()> {
//!     let factory = AdapterFactory::new(&Config::default())?;
//!     let schedule_chain = factory.schedule_chain()?;
//!     println!("{} schedule adapters", schedule_chain.len());
//!     Ok(())
//! }
//! ```

pub mod factory;
pub mod gracenote;
pub mod gracenote_movies;
pub mod network_site;
pub mod theater_site;
pub mod traits;
pub mod tvguide;
pub mod tvmaze;

pub use factory::{AdapterFactory, ChainKind};
pub use traits::*;

/// Status tags reported alongside each provider's items
pub mod status {
    pub const COMMERCIAL_VERIFIED: &str = "commercial_verified";
    pub const VERIFIED: &str = "verified";
    pub const SCRAPED: &str = "scraped";
    pub const LIMITED_DATA: &str = "limited_data";
}

/// Serde helpers for provider payloads that are loose about number types
pub(crate) mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// Accept `3`, `"3"`, `null` or a missing field as an optional number
    pub fn optional_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        })
    }

    /// Accept a number or a string as optional text
    pub fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::Number(n)) => Some(n.to_string()),
            Some(Value::String(s)) => Some(s),
            _ => None,
        })
    }
}
