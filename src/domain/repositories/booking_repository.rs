//! Repository trait for bookings.

use crate::domain::entities::{
    Booking, BookingFilter, CommissionEffect, LifecycleState, NewBooking,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Repository interface for bookings.
///
/// # Atomicity
///
/// [`BookingRepository::insert_if_available`] is the single serialization point
/// of the system: the availability check and the insert run as one unit with
/// respect to every other insert on the same target. Lifecycle updates are
/// compare-and-set on the current statuses and carry their commission write
/// in the same unit.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgBookingRepository`] - PostgreSQL
/// - [`crate::infrastructure::persistence::MemoryStore`] - in-process store
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Inserts `new_booking` in `pending`/`pending` unless its target is full.
    ///
    /// The target is full for the stay when, for any night of
    /// `[check_in, check_out)`, the number of active bookings on the same
    /// target reaches [`crate::domain::entities::BookingTarget::concurrent_capacity`],
    /// or when any night is a maintenance day of the target.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Overlap`] if the target is full or blocked.
    /// Returns [`AppError::Internal`] on storage errors or lock timeout; in
    /// that case nothing was inserted.
    async fn insert_if_available(&self, new_booking: NewBooking) -> Result<Booking, AppError>;

    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_id(&self, id: i64) -> Result<Option<Booking>, AppError>;

    /// Active bookings on `target_key` overlapping `[from, to)`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn list_active_for_target(
        &self,
        target_key: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Booking>, AppError>;

    /// All bookings on accommodations owned by `host_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn list_for_host(&self, host_id: i64) -> Result<Vec<Booking>, AppError>;

    /// Page of bookings matching `filter`, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn list(&self, filter: BookingFilter) -> Result<Vec<Booking>, AppError>;

    /// Number of bookings matching `filter` (paging fields ignored).
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn count(&self, filter: BookingFilter) -> Result<i64, AppError>;

    /// Moves a booking from `expected` to `next` and applies `effect` to its
    /// commission record, all or nothing.
    ///
    /// Returns `Ok(None)` when the booking is missing or no longer in
    /// `expected`; nothing is written then.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors; neither the booking
    /// nor its commission record changed in that case.
    async fn update_lifecycle(
        &self,
        id: i64,
        expected: LifecycleState,
        next: LifecycleState,
        effect: CommissionEffect,
    ) -> Result<Option<Booking>, AppError>;
}
