use axum::{extract::State, Json};
use serde::Serialize;

use crate::sources::AdapterSummary;
use crate::web::AppState;

/// Both adapter chains in priority order
#[derive(Debug, Clone, Serialize)]
pub struct SourcesResponse {
    pub schedule: Vec<AdapterSummary>,
    pub movies: Vec<AdapterSummary>,
}

impl SourcesResponse {
    pub fn from_state(state: &AppState) -> Self {
        Self {
            schedule: state.schedule_sources(),
            movies: state.movie_sources(),
        }
    }
}

/// `GET /api/sources`
pub async fn list_sources(State(state): State<AppState>) -> Json<SourcesResponse> {
    Json(SourcesResponse::from_state(&state))
}
