//! Application error type shared by repositories, services and handlers.
//!
//! Every failure the reservation authority reports is a structured, recoverable
//! error: state is left unchanged and the caller receives a machine-readable code.
//!
//! ```json
//! { "error": { "code": "overlap", "message": "...", "details": { ... } } }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Serializable error payload.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

/// Error taxonomy of the reservation authority.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed request (bad shape, out-of-range field, both room and tier).
    #[error("{message}")]
    Validation { message: String, details: Value },

    /// `check_out <= check_in`, or `check_in` lies in the past.
    #[error("{message}")]
    InvalidDateRange { message: String, details: Value },

    /// More guests than the selected room or accommodation can hold.
    #[error("{message}")]
    CapacityExceeded { message: String, details: Value },

    /// Requested dates collide with an active booking or a maintenance day.
    #[error("{message}")]
    Overlap { message: String, details: Value },

    /// Illegal booking, payment or commission status move.
    #[error("{message}")]
    InvalidTransition { message: String, details: Value },

    /// Commission rate outside `[0, 100]`.
    #[error("{message}")]
    InvalidRate { message: String, details: Value },

    #[error("{message}")]
    NotFound { message: String, details: Value },

    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn invalid_date_range(message: impl Into<String>, details: Value) -> Self {
        Self::InvalidDateRange {
            message: message.into(),
            details,
        }
    }

    pub fn capacity_exceeded(message: impl Into<String>, details: Value) -> Self {
        Self::CapacityExceeded {
            message: message.into(),
            details,
        }
    }

    pub fn overlap(message: impl Into<String>, details: Value) -> Self {
        Self::Overlap {
            message: message.into(),
            details,
        }
    }

    pub fn invalid_transition(message: impl Into<String>, details: Value) -> Self {
        Self::InvalidTransition {
            message: message.into(),
            details,
        }
    }

    pub fn invalid_rate(message: impl Into<String>, details: Value) -> Self {
        Self::InvalidRate {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation_error",
            Self::InvalidDateRange { .. } => "invalid_date_range",
            Self::CapacityExceeded { .. } => "capacity_exceeded",
            Self::Overlap { .. } => "overlap",
            Self::InvalidTransition { .. } => "invalid_transition",
            Self::InvalidRate { .. } => "invalid_rate",
            Self::NotFound { .. } => "not_found",
            Self::Internal { .. } => "internal_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::InvalidDateRange { .. }
            | Self::CapacityExceeded { .. }
            | Self::InvalidRate { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Overlap { .. } | Self::InvalidTransition { .. } => StatusCode::CONFLICT,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Converts the error into its serializable payload.
    pub fn to_error_info(&self) -> ErrorInfo {
        let (message, details) = match self {
            Self::Validation { message, details }
            | Self::InvalidDateRange { message, details }
            | Self::CapacityExceeded { message, details }
            | Self::Overlap { message, details }
            | Self::InvalidTransition { message, details }
            | Self::InvalidRate { message, details }
            | Self::NotFound { message, details }
            | Self::Internal { message, details } => (message.clone(), details.clone()),
        };

        ErrorInfo {
            code: self.code(),
            message,
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, code = self.code(), "Request failed");
        }

        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        map_sqlx_error(e)
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        let details = serde_json::to_value(&e).unwrap_or_else(|_| json!({}));
        AppError::bad_request("Request validation failed", details)
    }
}

/// SQLSTATE raised when `lock_timeout` expires while waiting for a lock.
const LOCK_NOT_AVAILABLE: &str = "55P03";

pub fn map_sqlx_error(e: sqlx::Error) -> AppError {
    if let Some(db) = e.as_database_error() {
        if db.code().as_deref() == Some(LOCK_NOT_AVAILABLE) {
            return AppError::internal(
                "Timed out waiting for the booking target lock",
                json!({ "retryable": true }),
            );
        }
        if db.is_foreign_key_violation() {
            return AppError::not_found(
                "Referenced record does not exist",
                json!({ "constraint": db.constraint() }),
            );
        }
    }

    tracing::error!(error = %e, "Database error");
    AppError::internal("Database error", json!({}))
}
