//! Handlers for accommodation, room and room-type management.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::accommodation::{
    CreateAccommodationRequest, CreateRoomRequest, CreateRoomTypeRequest, UpdateRateRequest,
};
use crate::application::services::AccommodationDetails;
use crate::domain::entities::{Accommodation, Room, RoomTypePricing};
use crate::error::AppError;
use crate::state::AppState;

/// Registers a new accommodation.
///
/// # Endpoint
///
/// `POST /api/accommodations`
///
/// # Errors
///
/// Returns 400 if the payload fails validation.
pub async fn create_accommodation_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateAccommodationRequest>,
) -> Result<(StatusCode, Json<Accommodation>), AppError> {
    payload.validate()?;

    let accommodation = state
        .accommodation_service
        .create_accommodation(payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(accommodation)))
}

/// Returns an accommodation with its rooms and room types.
///
/// # Endpoint
///
/// `GET /api/accommodations/{id}`
///
/// # Errors
///
/// Returns 404 if the accommodation does not exist.
pub async fn get_accommodation_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<AccommodationDetails>, AppError> {
    let details = state.accommodation_service.get_details(id).await?;
    Ok(Json(details))
}

/// Changes the base nightly rate.
///
/// # Endpoint
///
/// `PATCH /api/accommodations/{id}/rate`
///
/// Existing bookings keep the total quoted at creation.
pub async fn update_base_rate_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateRateRequest>,
) -> Result<Json<Accommodation>, AppError> {
    payload.validate()?;

    let accommodation = state
        .accommodation_service
        .update_base_rate(id, payload.nightly_rate)
        .await?;

    Ok(Json(accommodation))
}

/// # Endpoint
///
/// `POST /api/accommodations/{id}/rooms`
///
/// # Errors
///
/// Returns 400 if the payload fails validation.
/// Returns 404 if the accommodation does not exist.
pub async fn create_room_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<CreateRoomRequest>,
) -> Result<(StatusCode, Json<Room>), AppError> {
    payload.validate()?;

    let room = state
        .accommodation_service
        .add_room(payload.into_new_room(id))
        .await?;

    Ok((StatusCode::CREATED, Json(room)))
}

/// # Endpoint
///
/// `PATCH /api/rooms/{id}/rate`
pub async fn update_room_rate_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateRateRequest>,
) -> Result<Json<Room>, AppError> {
    payload.validate()?;

    let room = state
        .accommodation_service
        .update_room_rate(id, payload.nightly_rate)
        .await?;

    Ok(Json(room))
}

/// Adds a pricing tier.
///
/// # Endpoint
///
/// `POST /api/accommodations/{id}/room-types`
///
/// `available_units` enables per-tier inventory; omit it for a tier that
/// shares the accommodation's calendar.
///
/// # Errors
///
/// Returns 400 if the name is invalid or already used by this accommodation.
/// Returns 404 if the accommodation does not exist.
pub async fn create_room_type_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<CreateRoomTypeRequest>,
) -> Result<(StatusCode, Json<RoomTypePricing>), AppError> {
    payload.validate()?;

    let room_type = state
        .accommodation_service
        .add_room_type(payload.into_new_room_type(id))
        .await?;

    Ok((StatusCode::CREATED, Json(room_type)))
}

/// # Endpoint
///
/// `PATCH /api/accommodations/{id}/room-types/{name}/rate`
pub async fn update_room_type_rate_handler(
    Path((id, name)): Path<(i64, String)>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateRateRequest>,
) -> Result<Json<RoomTypePricing>, AppError> {
    payload.validate()?;

    let room_type = state
        .accommodation_service
        .update_room_type_rate(id, &name, payload.nightly_rate)
        .await?;

    Ok(Json(room_type))
}
