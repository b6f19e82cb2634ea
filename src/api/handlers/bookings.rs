//! Handlers for booking creation, lookup and lifecycle.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::booking::{
    BookingListParams, BookingResponse, CreateBookingRequest, PaymentRequest, TransitionRequest,
};
use crate::api::dto::pagination::Page;
use crate::domain::entities::{BookingFilter, CommissionRecord};
use crate::error::AppError;
use crate::state::AppState;

/// Books a stay.
///
/// # Endpoint
///
/// `POST /api/bookings`
///
/// # Request Body
///
/// ```json
/// {
///   "accommodation_id": 1,
///   "room_id": 3,
///   "check_in": "2024-06-10",
///   "check_out": "2024-06-13",
///   "guests": 2
/// }
/// ```
///
/// The new booking is `pending` with payment `pending`; the total is quoted
/// from the rate in force now.
///
/// # Errors
///
/// - 400: malformed request, or both `room_id` and `room_type` given
/// - 404: unknown accommodation, room or room type
/// - 409 `overlap`: dates already taken or under maintenance
/// - 422 `invalid_date_range`: `check_out <= check_in` or `check_in` in the past
/// - 422 `capacity_exceeded`: too many guests
pub async fn create_booking_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), AppError> {
    payload.validate()?;

    let booking = state.booking_service.create_booking(payload.into()).await?;

    Ok((StatusCode::CREATED, Json(booking.into())))
}

/// # Endpoint
///
/// `GET /api/bookings/{id}`
pub async fn get_booking_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking = state.booking_service.get_booking(id).await?;
    Ok(Json(booking.into()))
}

/// Lists bookings, newest first.
///
/// # Endpoint
///
/// `GET /api/bookings`
///
/// # Query Parameters
///
/// - `page` (optional): Page number (default: 1)
/// - `page_size` (optional): Items per page (default: 25, max: 100)
/// - `accommodation_id`, `host_id`, `status` (optional): filters
///
/// # Errors
///
/// Returns 400 Bad Request if pagination parameters are invalid.
pub async fn list_bookings_handler(
    State(state): State<AppState>,
    Query(params): Query<BookingListParams>,
) -> Result<Json<Page<BookingResponse>>, AppError> {
    let (offset, limit) = params
        .pagination
        .validate_and_get_offset_limit()
        .map_err(|e| AppError::bad_request(e, json!({})))?;

    let filter = BookingFilter::new(offset, limit)
        .with_accommodation(params.accommodation_id)
        .with_host(params.host_id)
        .with_status(params.status);

    let (bookings, total_items) = state.booking_service.list_bookings(filter).await?;
    let items = bookings.into_iter().map(BookingResponse::from).collect();

    Ok(Json(Page::new(items, &params.pagination, total_items)))
}

/// Applies `confirm` or `cancel` to a booking.
///
/// # Endpoint
///
/// `POST /api/bookings/{id}/transition`
///
/// # Errors
///
/// Returns 404 if the booking does not exist.
/// Returns 409 `invalid_transition` if the move is illegal from the current state.
pub async fn transition_booking_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<TransitionRequest>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking = state
        .booking_service
        .transition_booking(id, payload.action)
        .await?;

    Ok(Json(booking.into()))
}

/// Records a payment outcome reported by the payment collaborator.
///
/// # Endpoint
///
/// `POST /api/bookings/{id}/payment`
///
/// `paid` creates the commission record; repeating it is harmless.
///
/// # Errors
///
/// Returns 404 if the booking does not exist.
/// Returns 409 `invalid_transition` if the outcome is illegal from the current state.
pub async fn record_payment_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<PaymentRequest>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking = state
        .booking_service
        .record_payment(id, payload.outcome)
        .await?;

    Ok(Json(booking.into()))
}

/// # Endpoint
///
/// `GET /api/bookings/{id}/commission`
///
/// # Errors
///
/// Returns 404 if the booking has not been paid.
pub async fn booking_commission_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<CommissionRecord>, AppError> {
    let record = state.commission_service.get_for_booking(id).await?;
    Ok(Json(record))
}
