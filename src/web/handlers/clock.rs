use axum::{extract::State, Json};
use chrono::Utc;

use crate::utils::time::{format_for_display, ClockReading};
use crate::web::AppState;

/// `GET /api/current-time` in the configured display timezone
pub async fn current_time(State(state): State<AppState>) -> Json<ClockReading> {
    Json(format_for_display(Utc::now(), state.clock_timezone))
}
