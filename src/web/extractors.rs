//! Request parameter parsing and validation

use chrono::NaiveDate;
use serde::Deserialize;

use crate::errors::{WebError, WebResult};

/// Parse a `YYYY-MM-DD` path segment
pub fn parse_date_param(value: &str) -> WebResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| WebError::invalid_date(value))
}

/// Query string of the movie listing endpoint
///
/// `radius` is kept as text so a malformed value answers with the same JSON
/// error shape as every other request problem.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovieParams {
    pub radius: Option<String>,
}

impl MovieParams {
    pub fn radius(&self) -> WebResult<Option<u32>> {
        match self.radius.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|r| *r > 0)
                .map(Some)
                .ok_or_else(|| {
                    WebError::invalid_request("radius", "must be a positive whole number of miles")
                }),
        }
    }
}
