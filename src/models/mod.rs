//! Domain models shared by the resolver, the adapters and the web layer

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};

pub mod listing;
pub mod outcome;

pub use listing::{Item, ItemDraft, ProviderResult, RawListing, StartTime};
pub use outcome::{AttemptFailure, ResolutionOutcome};

/// A logical listing request: which entity, which day, and optional
/// refinements.
///
/// The entity is a network code (`nbc`) for schedules or a postal code for
/// movie listings. A `Query` is immutable once built; refinements are applied
/// with the consuming `with_*` methods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    entity: String,
    date: NaiveDate,
    postal_code: Option<String>,
    radius: Option<u32>,
}

impl Query {
    /// Build a query for `entity` on `date`
    ///
    /// The entity is trimmed and lower-cased. An empty entity is rejected.
    pub fn new<E: AsRef<str>>(entity: E, date: NaiveDate) -> AppResult<Self> {
        let entity = entity.as_ref().trim().to_lowercase();
        if entity.is_empty() {
            return Err(AppError::validation("Query entity must not be empty"));
        }

        Ok(Self {
            entity,
            date,
            postal_code: None,
            radius: None,
        })
    }

    /// Restrict the query to a postal code
    pub fn with_postal_code<P: Into<String>>(mut self, postal_code: P) -> Self {
        let postal_code = postal_code.into();
        let trimmed = postal_code.trim();
        self.postal_code = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self
    }

    /// Restrict the query to a search radius (miles)
    pub fn with_radius(mut self, radius: u32) -> Self {
        self.radius = Some(radius);
        self
    }

    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Date formatted as `YYYY-MM-DD`, the form every provider expects
    pub fn date_string(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    pub fn postal_code(&self) -> Option<&str> {
        self.postal_code.as_deref()
    }

    pub fn radius(&self) -> Option<u32> {
        self.radius
    }
}
