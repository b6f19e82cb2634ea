//! Handlers for host-facing booking views.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::NaiveDate;

use crate::api::dto::host::OverviewQuery;
use crate::application::services::DayView;
use crate::domain::calendar::BookingOverview;
use crate::error::AppError;
use crate::state::AppState;

/// Week, month, following-two-months and history buckets of a host's bookings.
///
/// # Endpoint
///
/// `GET /api/hosts/{id}/overview?today=2024-06-01`
///
/// Cancelled bookings are excluded. A booking may appear in several buckets.
pub async fn host_overview_handler(
    Path(host_id): Path<i64>,
    State(state): State<AppState>,
    Query(query): Query<OverviewQuery>,
) -> Result<Json<BookingOverview>, AppError> {
    let overview = state
        .calendar_service
        .host_overview(host_id, query.today)
        .await?;

    Ok(Json(overview))
}

/// Active bookings occupying the night of the given date.
///
/// # Endpoint
///
/// `GET /api/hosts/{id}/day/{date}`
pub async fn host_day_handler(
    Path((host_id, date)): Path<(i64, NaiveDate)>,
    State(state): State<AppState>,
) -> Result<Json<DayView>, AppError> {
    let view = state.calendar_service.host_day(host_id, date).await?;
    Ok(Json(view))
}
