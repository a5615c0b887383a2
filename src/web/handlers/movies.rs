//! Movie showtime lookups

use axum::{
    extract::{Path, Query as QueryParams, State},
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::errors::AppResult;
use crate::models::Query;
use crate::web::{
    extractors::{parse_date_param, MovieParams},
    handle_error, AppState, Lookup, MovieListingResponse,
};

/// `GET /api/movies/:postal_code/:date?radius=N`
pub async fn get_movies(
    State(state): State<AppState>,
    Path((postal_code, date)): Path<(String, String)>,
    QueryParams(params): QueryParams<MovieParams>,
) -> Response {
    debug!("Movie request for {} on {}", postal_code, date);
    match movies(&state, &postal_code, &date, &params).await {
        Ok(lookup) => lookup.into_response(),
        Err(e) => handle_error(e),
    }
}

async fn movies(
    state: &AppState,
    postal_code: &str,
    date: &str,
    params: &MovieParams,
) -> AppResult<Lookup<MovieListingResponse>> {
    let date = parse_date_param(date)?;
    let mut query = Query::new(postal_code, date)?.with_postal_code(postal_code);
    if let Some(radius) = params.radius()? {
        query = query.with_radius(radius);
    }
    state.lookup_movies(&query).await
}
