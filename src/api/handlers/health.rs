//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: One or more components degraded
///
/// # Components Checked
///
/// 1. **Database**: Round-trip to the backing store
/// 2. **Commission rate**: Current rate can be resolved
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "storage": "postgres",
///   "checks": {
///     "database": { "status": "ok", "message": "Connected" },
///     "commission_rate": { "status": "ok", "message": "Current rate: 10%" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let db_check = check_database(&state).await;

    let rate_check = check_commission_rate(&state).await;

    let all_healthy = db_check.is_ok() && rate_check.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        storage: state.storage.name(),
        checks: HealthChecks {
            database: db_check,
            commission_rate: rate_check,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_database(state: &AppState) -> CheckStatus {
    match state.storage.ping().await {
        Ok(()) => CheckStatus::ok("Connected"),
        Err(e) => CheckStatus::error(format!("Database error: {e}")),
    }
}

async fn check_commission_rate(state: &AppState) -> CheckStatus {
    match state.commission_service.current_rate().await {
        Ok(snapshot) => CheckStatus::ok(format!("Current rate: {}%", snapshot.rate.percent())),
        Err(e) => CheckStatus::error(format!("Commission rate unavailable: {e}")),
    }
}
