//! Network schedule lookups

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::errors::AppResult;
use crate::models::Query;
use crate::web::{extractors::parse_date_param, handle_error, AppState, Lookup, ScheduleResponse};

/// `GET /api/schedule/:entity/:date`
pub async fn get_schedule(
    State(state): State<AppState>,
    Path((entity, date)): Path<(String, String)>,
) -> Response {
    debug!("Schedule request for '{}' on {}", entity, date);
    match schedule(&state, &entity, &date).await {
        Ok(lookup) => lookup.into_response(),
        Err(e) => handle_error(e),
    }
}

async fn schedule(state: &AppState, entity: &str, date: &str) -> AppResult<Lookup<ScheduleResponse>> {
    let date = parse_date_param(date)?;
    let query = Query::new(entity, date)?;
    state.lookup_schedule(&query).await
}
