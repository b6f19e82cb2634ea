//! PostgreSQL implementation of the availability override repository.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::DayOverride;
use crate::domain::repositories::AvailabilityRepository;
use crate::error::AppError;

#[derive(FromRow)]
struct OverrideRow {
    target_key: String,
    day: NaiveDate,
    maintenance: bool,
    price: Option<i64>,
}

impl From<OverrideRow> for DayOverride {
    fn from(row: OverrideRow) -> Self {
        DayOverride {
            target_key: row.target_key,
            day: row.day,
            maintenance: row.maintenance,
            price: row.price,
        }
    }
}

pub struct PgAvailabilityRepository {
    pool: Arc<PgPool>,
}

impl PgAvailabilityRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AvailabilityRepository for PgAvailabilityRepository {
    async fn upsert_override(&self, day_override: DayOverride) -> Result<DayOverride, AppError> {
        let row: OverrideRow = sqlx::query_as(
            r#"
            INSERT INTO availability_overrides (target_key, day, maintenance, price)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (target_key, day)
            DO UPDATE SET maintenance = EXCLUDED.maintenance, price = EXCLUDED.price
            RETURNING target_key, day, maintenance, price
            "#,
        )
        .bind(&day_override.target_key)
        .bind(day_override.day)
        .bind(day_override.maintenance)
        .bind(day_override.price)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn delete_override(&self, target_key: &str, day: NaiveDate) -> Result<bool, AppError> {
        let result =
            sqlx::query("DELETE FROM availability_overrides WHERE target_key = $1 AND day = $2")
                .bind(target_key)
                .bind(day)
                .execute(self.pool.as_ref())
                .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_overrides(
        &self,
        target_key: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DayOverride>, AppError> {
        let rows: Vec<OverrideRow> = sqlx::query_as(
            r#"
            SELECT target_key, day, maintenance, price
            FROM availability_overrides
            WHERE target_key = $1 AND day BETWEEN $2 AND $3
            ORDER BY day
            "#,
        )
        .bind(target_key)
        .bind(from)
        .bind(to)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(DayOverride::from).collect())
    }
}
