//! Repository trait for commission records and the commission-rate audit log.

use crate::domain::entities::{CommissionRateChange, CommissionRecord, CommissionStatus};
use crate::error::AppError;
use async_trait::async_trait;
use rust_decimal::Decimal;

/// Filter criteria for commission listings.
#[derive(Debug, Clone)]
pub struct CommissionFilter {
    pub status: Option<CommissionStatus>,
    pub offset: i64,
    pub limit: i64,
}

impl CommissionFilter {
    pub fn new(offset: i64, limit: i64) -> Self {
        Self {
            status: None,
            offset,
            limit,
        }
    }

    pub fn with_status(mut self, status: Option<CommissionStatus>) -> Self {
        self.status = status;
        self
    }
}

/// Repository interface for commission data.
///
/// Records are write-once except for `status`; at most one record exists per
/// booking. Records are created and cancelled through
/// [`crate::domain::repositories::BookingRepository::update_lifecycle`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommissionRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_id(&self, id: i64) -> Result<Option<CommissionRecord>, AppError>;

    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_booking(&self, booking_id: i64)
    -> Result<Option<CommissionRecord>, AppError>;

    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn list(&self, filter: CommissionFilter) -> Result<Vec<CommissionRecord>, AppError>;

    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn count(&self, status: Option<CommissionStatus>) -> Result<i64, AppError>;

    /// Moves a record's status from `expected` to `next`.
    ///
    /// Returns `Ok(None)` when the record is missing or not in `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn update_status(
        &self,
        id: i64,
        expected: CommissionStatus,
        next: CommissionStatus,
    ) -> Result<Option<CommissionRecord>, AppError>;

    /// Latest rate change, i.e. the current configuration version.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn latest_rate(&self) -> Result<Option<CommissionRateChange>, AppError>;

    /// Appends a rate change; `previous_rate` is read in the same atomic step.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn append_rate_change(
        &self,
        rate: Decimal,
        note: Option<String>,
    ) -> Result<CommissionRateChange, AppError>;

    /// Full audit log, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn list_rate_changes(&self) -> Result<Vec<CommissionRateChange>, AppError>;
}
