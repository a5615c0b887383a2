//! HTTP response types and utilities
//!
//! Success bodies are flat JSON documents; a resolution that ran out of
//! sources answers `503` with every attempt, and request-shape problems answer
//! `400` with a single `error` field.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::errors::{AppError, WebError};
use crate::models::{AttemptFailure, Item, ProviderResult, Query, ResolutionOutcome};

const UNKNOWN_THEATRE: &str = "Unknown Theatre";

/// `GET /api/schedule/{entity}/{date}` body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleResponse {
    pub entity: String,
    pub date: String,
    pub source: String,
    pub status: String,
    pub total_programs: usize,
    pub schedule: Vec<Item>,
}

impl ScheduleResponse {
    pub fn new(query: &Query, result: ProviderResult) -> Self {
        Self {
            entity: query.entity().to_string(),
            date: query.date_string(),
            source: result.source,
            status: result.status,
            total_programs: result.items.len(),
            schedule: result.items,
        }
    }
}

/// `GET /api/movies/{postal_code}/{date}` body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieListingResponse {
    pub postal_code: String,
    pub date: String,
    pub source: String,
    pub status: String,
    /// Number of distinct movies
    pub total: usize,
    pub movies: Vec<MovieEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieEntry {
    pub title: String,
    pub rating: Option<String>,
    pub runtime: Option<String>,
    pub showtimes: Vec<Showing>,
}

/// Start times of one movie at one theatre
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Showing {
    pub theatre: String,
    pub times: Vec<String>,
}

impl MovieListingResponse {
    pub fn new(query: &Query, result: ProviderResult) -> Self {
        let movies = group_showings(result.items);
        Self {
            postal_code: query.postal_code().unwrap_or(query.entity()).to_string(),
            date: query.date_string(),
            source: result.source,
            status: result.status,
            total: movies.len(),
            movies,
        }
    }
}

/// Group per-showing items by title, then theatre
///
/// Items arrive in chronological order, so first-appearance order keeps both
/// movies and times sorted by their earliest start. Repeated times at one
/// theatre are collapsed.
pub fn group_showings(items: Vec<Item>) -> Vec<MovieEntry> {
    let mut movies: Vec<MovieEntry> = Vec::new();

    for item in items {
        let index = match movies.iter().position(|m| m.title == item.title) {
            Some(index) => index,
            None => {
                movies.push(MovieEntry {
                    title: item.title.clone(),
                    rating: None,
                    runtime: None,
                    showtimes: Vec::new(),
                });
                movies.len() - 1
            }
        };
        let movie = &mut movies[index];

        if movie.rating.is_none() {
            movie.rating = item.rating;
        }
        if movie.runtime.is_none() {
            movie.runtime = item.runtime;
        }

        let theatre = item.venue.unwrap_or_else(|| UNKNOWN_THEATRE.to_string());
        match movie.showtimes.iter_mut().find(|s| s.theatre == theatre) {
            Some(showing) => {
                if !showing.times.contains(&item.time) {
                    showing.times.push(item.time);
                }
            }
            None => movie.showtimes.push(Showing {
                theatre,
                times: vec![item.time],
            }),
        }
    }

    movies
}

/// Terminal resolution failure body (`503`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionFailureResponse {
    pub error: String,
    pub entity: String,
    pub date: String,
    pub sources_tried: Vec<AttemptFailure>,
}

impl ResolutionFailureResponse {
    pub fn new(query: &Query, attempts: Vec<AttemptFailure>) -> Self {
        let error = if attempts.is_empty() {
            "No listing sources are configured".to_string()
        } else {
            format!("No listings available from {} sources", attempts.len())
        };
        Self {
            error,
            entity: query.entity().to_string(),
            date: query.date_string(),
            sources_tried: attempts,
        }
    }
}

/// Either the winning provider's body or the list of failed attempts
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    Found(T),
    Exhausted(ResolutionFailureResponse),
}

impl<T> Lookup<T> {
    pub fn from_outcome<F>(query: &Query, outcome: ResolutionOutcome, build: F) -> Self
    where
        F: FnOnce(&Query, ProviderResult) -> T,
    {
        match outcome {
            ResolutionOutcome::Resolved { result, .. } => Lookup::Found(build(query, result)),
            ResolutionOutcome::Exhausted { attempts } => {
                Lookup::Exhausted(ResolutionFailureResponse::new(query, attempts))
            }
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    /// The body either way, as JSON
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value>
    where
        T: Serialize,
    {
        match self {
            Lookup::Found(body) => serde_json::to_value(body),
            Lookup::Exhausted(failure) => serde_json::to_value(failure),
        }
    }
}

impl<T: Serialize> IntoResponse for Lookup<T> {
    fn into_response(self) -> Response {
        match self {
            Lookup::Found(body) => (StatusCode::OK, Json(body)).into_response(),
            Lookup::Exhausted(failure) => {
                (StatusCode::SERVICE_UNAVAILABLE, Json(failure)).into_response()
            }
        }
    }
}

/// Error body for request and server problems
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Convert AppError to appropriate HTTP response
pub fn handle_error(error: AppError) -> Response {
    let (status, message) = match &error {
        AppError::Validation { message } => (StatusCode::BAD_REQUEST, message.clone()),
        AppError::Web(web_error) => match web_error {
            WebError::InvalidDate { .. } | WebError::InvalidRequest { .. } => {
                (StatusCode::BAD_REQUEST, web_error.to_string())
            }
        },
        AppError::Configuration { message } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Configuration error: {}", message),
        ),
        AppError::Resolver(resolver_error) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            resolver_error.to_string(),
        ),
        AppError::Source(_) | AppError::Http(_) => (
            StatusCode::BAD_GATEWAY,
            "External service communication failed".to_string(),
        ),
        AppError::Io(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error".to_string(),
        ),
    };

    if status.is_server_error() {
        error!("Request failed: {}", error);
    }

    (status, Json(ErrorResponse { error: message })).into_response()
}
