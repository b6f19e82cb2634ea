//! Handlers for availability calendars and host day overrides.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use validator::Validate;

use crate::api::dto::calendar::{
    CalendarQuery, CalendarResponse, CalendarTargetQuery, DayOverrideRequest, DayOverrideResponse,
};
use crate::error::AppError;
use crate::state::AppState;

/// Day-by-day availability of an accommodation, room or room type.
///
/// # Endpoint
///
/// `GET /api/accommodations/{id}/calendar?start_date=..&end_date=..`
///
/// Both dates are inclusive. Select a room with `room_id` or a tier with
/// `room_type`; with neither the whole accommodation is shown.
///
/// # Errors
///
/// Returns 404 if the accommodation, room or tier does not exist.
/// Returns 422 if the window is inverted or longer than a year.
pub async fn calendar_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<CalendarResponse>, AppError> {
    query.validate()?;

    let days = state
        .availability_service
        .get_calendar(&query.selector(id), query.start_date, query.end_date)
        .await?;

    Ok(Json(CalendarResponse {
        accommodation_id: id,
        room_id: query.room_id,
        room_type: query.room_type,
        start_date: query.start_date,
        end_date: query.end_date,
        days,
    }))
}

/// Sets a maintenance flag or display price for one day.
///
/// # Endpoint
///
/// `PUT /api/accommodations/{id}/calendar/{date}`
///
/// Maintenance days reject new bookings; existing bookings are untouched.
pub async fn set_day_override_handler(
    Path((id, date)): Path<(i64, NaiveDate)>,
    State(state): State<AppState>,
    Json(payload): Json<DayOverrideRequest>,
) -> Result<Json<DayOverrideResponse>, AppError> {
    payload.validate()?;

    let saved = state
        .availability_service
        .set_day_override(&payload.selector(id), date, payload.maintenance, payload.price)
        .await?;

    Ok(Json(saved.into()))
}

/// # Endpoint
///
/// `DELETE /api/accommodations/{id}/calendar/{date}`
///
/// # Errors
///
/// Returns 404 if no override exists for that day.
pub async fn clear_day_override_handler(
    Path((id, date)): Path<(i64, NaiveDate)>,
    State(state): State<AppState>,
    Query(query): Query<CalendarTargetQuery>,
) -> Result<StatusCode, AppError> {
    query.validate()?;

    state
        .availability_service
        .clear_day_override(&query.selector(id), date)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
