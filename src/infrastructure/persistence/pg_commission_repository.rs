//! PostgreSQL implementation of the commission repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::{CommissionRateChange, CommissionRecord, CommissionStatus};
use crate::domain::repositories::{CommissionFilter, CommissionRepository};
use crate::error::AppError;
use crate::infrastructure::persistence::parse_status;

#[derive(FromRow)]
struct CommissionRow {
    id: i64,
    booking_id: i64,
    booking_amount: i64,
    commission_rate: Decimal,
    commission_amount: i64,
    host_amount: i64,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<CommissionRow> for CommissionRecord {
    type Error = AppError;

    fn try_from(row: CommissionRow) -> Result<Self, Self::Error> {
        Ok(CommissionRecord {
            id: row.id,
            booking_id: row.booking_id,
            booking_amount: row.booking_amount,
            commission_rate: row.commission_rate,
            commission_amount: row.commission_amount,
            host_amount: row.host_amount,
            status: parse_status(&row.status)?,
            created_at: row.created_at,
        })
    }
}

#[derive(FromRow)]
struct RateChangeRow {
    id: i64,
    previous_rate: Option<Decimal>,
    rate: Decimal,
    note: Option<String>,
    changed_at: DateTime<Utc>,
}

impl From<RateChangeRow> for CommissionRateChange {
    fn from(row: RateChangeRow) -> Self {
        CommissionRateChange {
            id: row.id,
            previous_rate: row.previous_rate,
            rate: row.rate,
            note: row.note,
            changed_at: row.changed_at,
        }
    }
}

const COMMISSION_COLUMNS: &str = "id, booking_id, booking_amount, commission_rate, \
     commission_amount, host_amount, status, created_at";

/// PostgreSQL repository for commission records and the rate audit log.
///
/// Records are inserted by [`crate::infrastructure::persistence::PgBookingRepository`]
/// together with the payment that creates them.
pub struct PgCommissionRepository {
    pool: Arc<PgPool>,
}

impl PgCommissionRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommissionRepository for PgCommissionRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<CommissionRecord>, AppError> {
        let row: Option<CommissionRow> = sqlx::query_as(&format!(
            "SELECT {COMMISSION_COLUMNS} FROM commission_records WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(CommissionRecord::try_from).transpose()
    }

    async fn find_by_booking(&self, booking_id: i64) -> Result<Option<CommissionRecord>, AppError> {
        let row: Option<CommissionRow> = sqlx::query_as(&format!(
            "SELECT {COMMISSION_COLUMNS} FROM commission_records WHERE booking_id = $1"
        ))
        .bind(booking_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(CommissionRecord::try_from).transpose()
    }

    async fn list(&self, filter: CommissionFilter) -> Result<Vec<CommissionRecord>, AppError> {
        let rows: Vec<CommissionRow> = sqlx::query_as(&format!(
            r#"
            SELECT {COMMISSION_COLUMNS}
            FROM commission_records
            WHERE ($1::text IS NULL OR status = $1)
            ORDER BY id DESC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(filter.status.map(|s| s.as_str()))
        .bind(filter.limit)
        .bind(filter.offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        rows.into_iter().map(CommissionRecord::try_from).collect()
    }

    async fn count(&self, status: Option<CommissionStatus>) -> Result<i64, AppError> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM commission_records WHERE ($1::text IS NULL OR status = $1)",
        )
        .bind(status.map(|s| s.as_str()))
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(total)
    }

    async fn update_status(
        &self,
        id: i64,
        expected: CommissionStatus,
        next: CommissionStatus,
    ) -> Result<Option<CommissionRecord>, AppError> {
        let row: Option<CommissionRow> = sqlx::query_as(&format!(
            r#"
            UPDATE commission_records SET status = $3
            WHERE id = $1 AND status = $2
            RETURNING {COMMISSION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(expected.as_str())
        .bind(next.as_str())
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(CommissionRecord::try_from).transpose()
    }

    async fn latest_rate(&self) -> Result<Option<CommissionRateChange>, AppError> {
        let row: Option<RateChangeRow> = sqlx::query_as(
            r#"
            SELECT id, previous_rate, rate, note, changed_at
            FROM commission_rate_changes
            ORDER BY id DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(CommissionRateChange::from))
    }

    async fn append_rate_change(
        &self,
        rate: Decimal,
        note: Option<String>,
    ) -> Result<CommissionRateChange, AppError> {
        let mut tx = self.pool.begin().await?;

        // Serializes concurrent writers so `previous_rate` is the rate actually replaced.
        sqlx::query("LOCK TABLE commission_rate_changes IN SHARE ROW EXCLUSIVE MODE")
            .execute(&mut *tx)
            .await?;

        let row: RateChangeRow = sqlx::query_as(
            r#"
            INSERT INTO commission_rate_changes (previous_rate, rate, note)
            VALUES (
                (SELECT rate FROM commission_rate_changes ORDER BY id DESC LIMIT 1),
                $1,
                $2
            )
            RETURNING id, previous_rate, rate, note, changed_at
            "#,
        )
        .bind(rate)
        .bind(&note)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(row.into())
    }

    async fn list_rate_changes(&self) -> Result<Vec<CommissionRateChange>, AppError> {
        let rows: Vec<RateChangeRow> = sqlx::query_as(
            r#"
            SELECT id, previous_rate, rate, note, changed_at
            FROM commission_rate_changes
            ORDER BY id DESC
            "#,
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(CommissionRateChange::from).collect())
    }
}
