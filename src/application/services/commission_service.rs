//! Commission-rate configuration and per-booking commission records.
//!
//! The current rate is the newest entry of the rate audit log, or the
//! configured default while the log is empty. A record snapshots the rate
//! that is current when the booking is first paid; later rate changes never
//! touch existing records.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

use crate::domain::commission::{self, CommissionRate};
use crate::domain::entities::{
    Booking, CommissionRateChange, CommissionRecord, CommissionStatus, NewCommissionRecord,
};
use crate::domain::repositories::{CommissionFilter, CommissionRepository};
use crate::error::AppError;

/// The rate in force, with the audit-log version it came from.
#[derive(Debug, Clone, Serialize)]
pub struct RateSnapshot {
    pub rate: CommissionRate,
    /// `None` while the configured default is in force.
    pub version: Option<i64>,
    pub changed_at: Option<DateTime<Utc>>,
}

pub struct CommissionService {
    repository: Arc<dyn CommissionRepository>,
    default_rate: CommissionRate,
}

impl CommissionService {
    pub fn new(repository: Arc<dyn CommissionRepository>, default_rate: CommissionRate) -> Self {
        Self {
            repository,
            default_rate,
        }
    }

    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors or if the stored rate
    /// is out of range.
    pub async fn current_rate(&self) -> Result<RateSnapshot, AppError> {
        match self.repository.latest_rate().await? {
            Some(change) => Ok(RateSnapshot {
                rate: CommissionRate::new(change.rate).map_err(|_| {
                    AppError::internal(
                        "Stored commission rate is out of range",
                        json!({ "version": change.id, "rate": change.rate.to_string() }),
                    )
                })?,
                version: Some(change.id),
                changed_at: Some(change.changed_at),
            }),
            None => Ok(RateSnapshot {
                rate: self.default_rate,
                version: None,
                changed_at: None,
            }),
        }
    }

    /// Replaces the current rate for future commission records.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidRate`] if `percent` is outside `[0, 100]`;
    /// the configuration is left unchanged.
    pub async fn set_rate(
        &self,
        percent: Decimal,
        note: Option<String>,
    ) -> Result<CommissionRateChange, AppError> {
        let rate = CommissionRate::new(percent)?;
        let change = self.repository.append_rate_change(rate.percent(), note).await?;

        metrics::counter!("commission_rate_changes_total").increment(1);
        tracing::info!(
            version = change.id,
            previous = ?change.previous_rate,
            rate = %rate,
            "Commission rate changed"
        );

        Ok(change)
    }

    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn rate_history(&self) -> Result<Vec<CommissionRateChange>, AppError> {
        self.repository.list_rate_changes().await
    }

    /// Builds the commission record for `booking` at the current rate.
    ///
    /// The record is stored by the payment update that makes the booking
    /// paid; see [`crate::domain::entities::CommissionEffect`].
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn quote_for_booking(&self, booking: &Booking) -> Result<NewCommissionRecord, AppError> {
        let snapshot = self.current_rate().await?;
        commission::new_record(booking.id, booking.total_price, snapshot.rate)
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the booking has no commission record.
    pub async fn get_for_booking(&self, booking_id: i64) -> Result<CommissionRecord, AppError> {
        self.repository
            .find_by_booking(booking_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(
                    "No commission recorded for this booking",
                    json!({ "booking_id": booking_id }),
                )
            })
    }

    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn list(
        &self,
        status: Option<CommissionStatus>,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<CommissionRecord>, i64), AppError> {
        let filter = CommissionFilter::new(offset, limit).with_status(status);
        tokio::try_join!(self.repository.list(filter), self.repository.count(status))
    }

    /// Marks a pending commission as settled with the host.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the record does not exist.
    /// Returns [`AppError::InvalidTransition`] if it is not pending.
    pub async fn settle(&self, id: i64) -> Result<CommissionRecord, AppError> {
        if let Some(record) = self
            .repository
            .update_status(id, CommissionStatus::Pending, CommissionStatus::Paid)
            .await?
        {
            tracing::info!(commission_id = id, "Commission settled");
            return Ok(record);
        }

        match self.repository.find_by_id(id).await? {
            None => Err(AppError::not_found(
                "Commission not found",
                json!({ "id": id }),
            )),
            Some(record) => Err(AppError::invalid_transition(
                format!("cannot settle a {} commission", record.status),
                json!({ "id": id, "status": record.status.as_str() }),
            )),
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn record(id: i64, booking_id: i64, status: CommissionStatus) -> CommissionRecord {
        CommissionRecord {
            id,
            booking_id,
            booking_amount: 210_000,
            commission_rate: Decimal::from(10),
            commission_amount: 21_000,
            host_amount: 189_000,
            status,
            created_at: Utc::now(),
        }
    }

    pub fn rate_change(id: i64, rate: Decimal) -> CommissionRateChange {
        CommissionRateChange {
            id,
            previous_rate: None,
            rate,
            note: None,
            changed_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::domain::entities::booking::fixtures::{booking, date};
    use crate::domain::repositories::MockCommissionRepository;
    use rust_decimal_macros::dec;

    fn service(mock_repo: MockCommissionRepository) -> CommissionService {
        CommissionService::new(
            Arc::new(mock_repo),
            CommissionRate::new(dec!(10)).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_current_rate_falls_back_to_default() {
        let mut mock_repo = MockCommissionRepository::new();
        mock_repo.expect_latest_rate().times(1).returning(|| Ok(None));

        let snapshot = service(mock_repo).current_rate().await.unwrap();

        assert_eq!(snapshot.rate.percent(), dec!(10));
        assert!(snapshot.version.is_none());
    }

    #[tokio::test]
    async fn test_current_rate_uses_latest_change() {
        let mut mock_repo = MockCommissionRepository::new();
        mock_repo
            .expect_latest_rate()
            .returning(|| Ok(Some(rate_change(3, dec!(12.5)))));

        let snapshot = service(mock_repo).current_rate().await.unwrap();

        assert_eq!(snapshot.rate.percent(), dec!(12.5));
        assert_eq!(snapshot.version, Some(3));
    }

    #[tokio::test]
    async fn test_set_rate_out_of_range_is_rejected() {
        let mut mock_repo = MockCommissionRepository::new();
        mock_repo.expect_append_rate_change().times(0);

        let result = service(mock_repo).set_rate(dec!(150), None).await;

        assert!(matches!(result, Err(AppError::InvalidRate { .. })));
    }

    #[tokio::test]
    async fn test_quote_for_booking_snapshots_current_rate() {
        let mut mock_repo = MockCommissionRepository::new();
        mock_repo
            .expect_latest_rate()
            .returning(|| Ok(Some(rate_change(2, dec!(12.5)))));

        let mut paid = booking(1, date(2024, 6, 1), date(2024, 6, 4));
        paid.total_price = 1_004;

        let quote = service(mock_repo).quote_for_booking(&paid).await.unwrap();

        assert_eq!(quote.booking_id, 1);
        assert_eq!(quote.commission_rate, dec!(12.5));
        assert_eq!(quote.commission_amount, 126);
        assert_eq!(quote.host_amount, 878);
    }

    #[tokio::test]
    async fn test_settle_non_pending_is_invalid_transition() {
        let mut mock_repo = MockCommissionRepository::new();
        mock_repo.expect_update_status().returning(|_, _, _| Ok(None));
        mock_repo
            .expect_find_by_id()
            .returning(|id| Ok(Some(record(id, 1, CommissionStatus::Cancelled))));

        let result = service(mock_repo).settle(4).await;

        assert!(matches!(result, Err(AppError::InvalidTransition { .. })));
    }

    #[tokio::test]
    async fn test_settle_missing_is_not_found() {
        let mut mock_repo = MockCommissionRepository::new();
        mock_repo.expect_update_status().returning(|_, _, _| Ok(None));
        mock_repo.expect_find_by_id().returning(|_| Ok(None));

        let result = service(mock_repo).settle(4).await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }
}
