//! Repository trait for per-day availability overrides.

use crate::domain::entities::DayOverride;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AvailabilityRepository: Send + Sync {
    /// Inserts or replaces the override for `(target_key, day)`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn upsert_override(&self, day_override: DayOverride) -> Result<DayOverride, AppError>;

    /// Removes the override; `Ok(false)` if there was none.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn delete_override(&self, target_key: &str, day: NaiveDate) -> Result<bool, AppError>;

    /// Overrides of `target_key` within the inclusive window `[from, to]`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn list_overrides(
        &self,
        target_key: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DayOverride>, AppError>;
}
