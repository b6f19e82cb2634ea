//! PostgreSQL implementation of the booking repository.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::json;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use std::sync::Arc;
use std::time::Duration;

use crate::domain::availability::peak_occupancy;
use crate::domain::entities::{
    Booking, BookingFilter, BookingStatus, CommissionEffect, LifecycleState, NewBooking,
    PaymentStatus,
};
use crate::domain::repositories::BookingRepository;
use crate::error::AppError;
use crate::infrastructure::persistence::parse_status;

#[derive(FromRow)]
struct BookingRow {
    id: i64,
    accommodation_id: i64,
    room_id: Option<i64>,
    room_type: Option<String>,
    target_key: String,
    check_in: NaiveDate,
    check_out: NaiveDate,
    guests: i32,
    nightly_rate: i64,
    total_price: i64,
    status: String,
    payment_status: String,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = AppError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        Ok(Booking {
            id: row.id,
            accommodation_id: row.accommodation_id,
            room_id: row.room_id,
            room_type: row.room_type,
            target_key: row.target_key,
            check_in: row.check_in,
            check_out: row.check_out,
            guests: row.guests,
            nightly_rate: row.nightly_rate,
            total_price: row.total_price,
            status: parse_status(&row.status)?,
            payment_status: parse_status(&row.payment_status)?,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn into_bookings(rows: Vec<BookingRow>) -> Result<Vec<Booking>, AppError> {
    rows.into_iter().map(Booking::try_from).collect()
}

const BOOKING_COLUMNS: &str = "id, accommodation_id, room_id, room_type, target_key, check_in, \
     check_out, guests, nightly_rate, total_price, status, payment_status, notes, created_at, \
     updated_at";

const ACTIVE: &str = "status IN ('pending', 'confirmed')";

/// PostgreSQL repository for bookings.
///
/// # Serialization
///
/// Each insertion runs in its own transaction and first takes a
/// transaction-scoped advisory lock derived from the booking target key, so
/// check-then-insert sequences on the same target run one at a time while
/// other targets proceed in parallel. `lock_timeout` bounds the wait; on
/// expiry the transaction is rolled back and nothing is inserted.
///
/// Lifecycle updates run the status compare-and-set and the commission write
/// in one transaction.
pub struct PgBookingRepository {
    pool: Arc<PgPool>,
    lock_timeout: Duration,
}

impl PgBookingRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>, lock_timeout: Duration) -> Self {
        Self { pool, lock_timeout }
    }

    async fn lock_target(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        target_key: &str,
    ) -> Result<(), AppError> {
        sqlx::query("SELECT set_config('lock_timeout', $1, true)")
            .bind(format!("{}ms", self.lock_timeout.as_millis()))
            .execute(&mut **tx)
            .await?;

        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(target_key)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }
}

#[async_trait]
impl BookingRepository for PgBookingRepository {
    async fn insert_if_available(&self, new_booking: NewBooking) -> Result<Booking, AppError> {
        let target_key = new_booking.target.key();
        let mut tx = self.pool.begin().await?;

        self.lock_target(&mut tx, &target_key).await?;

        let overlapping: Vec<BookingRow> = sqlx::query_as(&format!(
            r#"
            SELECT {BOOKING_COLUMNS}
            FROM bookings
            WHERE target_key = $1 AND {ACTIVE} AND check_in < $3 AND check_out > $2
            "#
        ))
        .bind(&target_key)
        .bind(new_booking.check_in)
        .bind(new_booking.check_out)
        .fetch_all(&mut *tx)
        .await?;
        let overlapping = into_bookings(overlapping)?;

        let capacity = new_booking.target.concurrent_capacity();
        if peak_occupancy(&overlapping, new_booking.check_in, new_booking.check_out) >= capacity {
            let conflicting: Vec<i64> = overlapping.iter().map(|b| b.id).collect();
            return Err(AppError::overlap(
                "Dates overlap an existing booking",
                json!({ "target": target_key, "conflicting_booking_ids": conflicting }),
            ));
        }

        let blocked: Vec<NaiveDate> = sqlx::query_scalar(
            r#"
            SELECT day FROM availability_overrides
            WHERE target_key = $1 AND maintenance AND day >= $2 AND day < $3
            ORDER BY day
            "#,
        )
        .bind(&target_key)
        .bind(new_booking.check_in)
        .bind(new_booking.check_out)
        .fetch_all(&mut *tx)
        .await?;

        if !blocked.is_empty() {
            return Err(AppError::overlap(
                "Dates include maintenance days",
                json!({ "target": target_key, "maintenance_days": blocked }),
            ));
        }

        let row: BookingRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO bookings (accommodation_id, room_id, room_type, target_key, check_in,
                                  check_out, guests, nightly_rate, total_price, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(new_booking.accommodation_id)
        .bind(new_booking.room_id)
        .bind(&new_booking.room_type)
        .bind(&target_key)
        .bind(new_booking.check_in)
        .bind(new_booking.check_out)
        .bind(new_booking.guests)
        .bind(new_booking.nightly_rate)
        .bind(new_booking.total_price)
        .bind(&new_booking.notes)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        row.try_into()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Booking>, AppError> {
        let row: Option<BookingRow> =
            sqlx::query_as(&format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1"))
                .bind(id)
                .fetch_optional(self.pool.as_ref())
                .await?;

        row.map(Booking::try_from).transpose()
    }

    async fn list_active_for_target(
        &self,
        target_key: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Booking>, AppError> {
        let rows: Vec<BookingRow> = sqlx::query_as(&format!(
            r#"
            SELECT {BOOKING_COLUMNS}
            FROM bookings
            WHERE target_key = $1 AND {ACTIVE} AND check_in < $3 AND check_out > $2
            ORDER BY check_in, id
            "#
        ))
        .bind(target_key)
        .bind(from)
        .bind(to)
        .fetch_all(self.pool.as_ref())
        .await?;

        into_bookings(rows)
    }

    async fn list_for_host(&self, host_id: i64) -> Result<Vec<Booking>, AppError> {
        let rows: Vec<BookingRow> = sqlx::query_as(&format!(
            r#"
            SELECT {BOOKING_COLUMNS}
            FROM bookings
            WHERE accommodation_id IN (SELECT id FROM accommodations WHERE host_id = $1)
            ORDER BY check_in, id
            "#
        ))
        .bind(host_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        into_bookings(rows)
    }

    async fn list(&self, filter: BookingFilter) -> Result<Vec<Booking>, AppError> {
        let rows: Vec<BookingRow> = sqlx::query_as(&format!(
            r#"
            SELECT {BOOKING_COLUMNS}
            FROM bookings
            WHERE ($1::bigint IS NULL OR accommodation_id = $1)
              AND ($2::bigint IS NULL
                   OR accommodation_id IN (SELECT id FROM accommodations WHERE host_id = $2))
              AND ($3::text IS NULL OR status = $3)
            ORDER BY id DESC
            LIMIT $4 OFFSET $5
            "#
        ))
        .bind(filter.accommodation_id)
        .bind(filter.host_id)
        .bind(filter.status.map(|s| s.as_str()))
        .bind(filter.limit)
        .bind(filter.offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        into_bookings(rows)
    }

    async fn count(&self, filter: BookingFilter) -> Result<i64, AppError> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM bookings
            WHERE ($1::bigint IS NULL OR accommodation_id = $1)
              AND ($2::bigint IS NULL
                   OR accommodation_id IN (SELECT id FROM accommodations WHERE host_id = $2))
              AND ($3::text IS NULL OR status = $3)
            "#,
        )
        .bind(filter.accommodation_id)
        .bind(filter.host_id)
        .bind(filter.status.map(|s| s.as_str()))
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(total)
    }

    async fn update_lifecycle(
        &self,
        id: i64,
        expected: LifecycleState,
        next: LifecycleState,
        effect: CommissionEffect,
    ) -> Result<Option<Booking>, AppError> {
        let mut tx = self.pool.begin().await?;

        let row: Option<BookingRow> = sqlx::query_as(&format!(
            r#"
            UPDATE bookings
            SET status = $4, payment_status = $5, updated_at = now()
            WHERE id = $1 AND status = $2 AND payment_status = $3
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(expected.status.as_str())
        .bind(expected.payment_status.as_str())
        .bind(next.status.as_str())
        .bind(next.payment_status.as_str())
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        match effect {
            CommissionEffect::None => {}
            CommissionEffect::Record(new_record) => {
                sqlx::query(
                    r#"
                    INSERT INTO commission_records
                        (booking_id, booking_amount, commission_rate, commission_amount, host_amount)
                    VALUES ($1, $2, $3, $4, $5)
                    ON CONFLICT (booking_id) DO NOTHING
                    "#,
                )
                .bind(id)
                .bind(new_record.booking_amount)
                .bind(new_record.commission_rate)
                .bind(new_record.commission_amount)
                .bind(new_record.host_amount)
                .execute(&mut *tx)
                .await?;
            }
            CommissionEffect::Cancel => {
                sqlx::query(
                    r#"
                    UPDATE commission_records SET status = 'cancelled'
                    WHERE booking_id = $1 AND status = 'pending'
                    "#,
                )
                .bind(id)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;

        Booking::try_from(row).map(Some)
    }
}

/// Aggregate booking counts used by the admin CLI.
///
/// # Errors
///
/// Returns [`AppError::Internal`] on database errors.
pub async fn status_counts(pool: &PgPool) -> Result<Vec<(BookingStatus, PaymentStatus, i64)>, AppError> {
    let rows: Vec<(String, String, i64)> = sqlx::query_as(
        r#"
        SELECT status, payment_status, COUNT(*)
        FROM bookings
        GROUP BY status, payment_status
        ORDER BY status, payment_status
        "#,
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|(status, payment_status, count)| {
            Ok((parse_status(&status)?, parse_status(&payment_status)?, count))
        })
        .collect()
}
