//! Handlers for the platform commission rate and commission records.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::commission::{CommissionListParams, RateResponse, SetRateRequest};
use crate::api::dto::pagination::Page;
use crate::domain::entities::{CommissionRateChange, CommissionRecord};
use crate::error::AppError;
use crate::state::AppState;

/// # Endpoint
///
/// `GET /api/commission-rate`
pub async fn get_rate_handler(
    State(state): State<AppState>,
) -> Result<Json<RateResponse>, AppError> {
    let snapshot = state.commission_service.current_rate().await?;
    Ok(Json(snapshot.into()))
}

/// Replaces the commission rate for future payments.
///
/// # Endpoint
///
/// `PUT /api/commission-rate`
///
/// ```json
/// { "rate": 15, "note": "summer promotion ended" }
/// ```
///
/// Records created earlier keep the rate they were created with.
///
/// # Errors
///
/// Returns 422 `invalid_rate` if the rate is outside `[0, 100]`.
pub async fn set_rate_handler(
    State(state): State<AppState>,
    Json(payload): Json<SetRateRequest>,
) -> Result<Json<RateResponse>, AppError> {
    payload.validate()?;

    state
        .commission_service
        .set_rate(payload.rate, payload.note)
        .await?;
    let snapshot = state.commission_service.current_rate().await?;

    Ok(Json(snapshot.into()))
}

/// Audit log of rate changes, newest first.
///
/// # Endpoint
///
/// `GET /api/commission-rate/history`
pub async fn rate_history_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<CommissionRateChange>>, AppError> {
    let history = state.commission_service.rate_history().await?;
    Ok(Json(history))
}

/// # Endpoint
///
/// `GET /api/commissions`
///
/// # Query Parameters
///
/// - `page`, `page_size` (optional): pagination
/// - `status` (optional): `pending`, `paid` or `cancelled`
///
/// # Errors
///
/// Returns 400 Bad Request if pagination parameters are invalid.
pub async fn list_commissions_handler(
    State(state): State<AppState>,
    Query(params): Query<CommissionListParams>,
) -> Result<Json<Page<CommissionRecord>>, AppError> {
    let (offset, limit) = params
        .pagination
        .validate_and_get_offset_limit()
        .map_err(|e| AppError::bad_request(e, json!({})))?;

    let (items, total_items) = state
        .commission_service
        .list(params.status, offset, limit)
        .await?;

    Ok(Json(Page::new(items, &params.pagination, total_items)))
}

/// Marks a pending commission as settled.
///
/// # Endpoint
///
/// `POST /api/commissions/{id}/settle`
///
/// # Errors
///
/// Returns 404 if the record does not exist.
/// Returns 409 if it is not pending.
pub async fn settle_commission_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<CommissionRecord>, AppError> {
    let record = state.commission_service.settle(id).await?;
    Ok(Json(record))
}
