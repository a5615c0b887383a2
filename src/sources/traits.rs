//! Source adapter trait definitions
//!
//! Every provider sits behind [`SourceAdapter`]. Adapters own their request
//! construction and payload parsing and hold no mutable state between calls,
//! so a single instance can serve concurrent resolutions.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::SourceResult;
use crate::models::{Query, RawListing};

/// How an adapter obtains its data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterKind {
    /// Paid metadata API requiring a credential
    Commercial,
    /// Public API without a credential
    FreeApi,
    /// HTML listing page scrape
    Scrape,
    /// Direct fetch of an official site
    DirectSite,
}

impl std::fmt::Display for AdapterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            AdapterKind::Commercial => "commercial",
            AdapterKind::FreeApi => "free_api",
            AdapterKind::Scrape => "scrape",
            AdapterKind::DirectSite => "direct_site",
        };
        f.write_str(label)
    }
}

/// A single external listing provider
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Stable identifier, unique within a chain
    fn name(&self) -> &str;

    fn kind(&self) -> AdapterKind;

    /// Own time budget; the resolver never lets it exceed its ceiling
    fn timeout(&self) -> Option<Duration> {
        None
    }

    /// Whether required credentials are present
    fn is_configured(&self) -> bool {
        true
    }

    /// Fetch and parse listings for `query`
    ///
    /// Return `Err` for every failure, including a reachable provider with no
    /// usable entries; `Ok` with an empty list is treated the same way by the
    /// resolver.
    async fn fetch(&self, query: &Query) -> SourceResult<RawListing>;
}

/// Adapter description for listings and diagnostics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterSummary {
    pub name: String,
    pub kind: AdapterKind,
    pub configured: bool,
}

impl AdapterSummary {
    pub fn describe(adapter: &dyn SourceAdapter) -> Self {
        Self {
            name: adapter.name().to_string(),
            kind: adapter.kind(),
            configured: adapter.is_configured(),
        }
    }
}
