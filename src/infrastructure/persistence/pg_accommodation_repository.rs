//! PostgreSQL implementation of the accommodation repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::{
    Accommodation, NewAccommodation, NewRoom, NewRoomTypePricing, Room, RoomTypePricing,
};
use crate::domain::repositories::AccommodationRepository;
use crate::error::AppError;
use crate::infrastructure::persistence::parse_status;

#[derive(FromRow)]
struct AccommodationRow {
    id: i64,
    host_id: i64,
    name: String,
    city: String,
    base_rate: i64,
    max_guests: i32,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<AccommodationRow> for Accommodation {
    type Error = AppError;

    fn try_from(row: AccommodationRow) -> Result<Self, Self::Error> {
        Ok(Accommodation {
            id: row.id,
            host_id: row.host_id,
            name: row.name,
            city: row.city,
            base_rate: row.base_rate,
            max_guests: row.max_guests,
            status: parse_status(&row.status)?,
            created_at: row.created_at,
        })
    }
}

#[derive(FromRow)]
struct RoomRow {
    id: i64,
    accommodation_id: i64,
    name: String,
    capacity: i32,
    nightly_rate: i64,
}

impl From<RoomRow> for Room {
    fn from(row: RoomRow) -> Self {
        Room {
            id: row.id,
            accommodation_id: row.accommodation_id,
            name: row.name,
            capacity: row.capacity,
            nightly_rate: row.nightly_rate,
        }
    }
}

#[derive(FromRow)]
struct RoomTypeRow {
    id: i64,
    accommodation_id: i64,
    name: String,
    nightly_rate: i64,
    available_units: Option<i32>,
}

impl From<RoomTypeRow> for RoomTypePricing {
    fn from(row: RoomTypeRow) -> Self {
        RoomTypePricing {
            id: row.id,
            accommodation_id: row.accommodation_id,
            name: row.name,
            nightly_rate: row.nightly_rate,
            available_units: row.available_units,
        }
    }
}

const ACCOMMODATION_COLUMNS: &str =
    "id, host_id, name, city, base_rate, max_guests, status, created_at";

/// PostgreSQL repository for accommodations, rooms and rate tiers.
pub struct PgAccommodationRepository {
    pool: Arc<PgPool>,
}

impl PgAccommodationRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccommodationRepository for PgAccommodationRepository {
    async fn create(&self, new_accommodation: NewAccommodation) -> Result<Accommodation, AppError> {
        let row: AccommodationRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO accommodations (host_id, name, city, base_rate, max_guests, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {ACCOMMODATION_COLUMNS}
            "#
        ))
        .bind(new_accommodation.host_id)
        .bind(&new_accommodation.name)
        .bind(&new_accommodation.city)
        .bind(new_accommodation.base_rate)
        .bind(new_accommodation.max_guests)
        .bind(new_accommodation.status.as_str())
        .fetch_one(self.pool.as_ref())
        .await?;

        row.try_into()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Accommodation>, AppError> {
        let row: Option<AccommodationRow> = sqlx::query_as(&format!(
            "SELECT {ACCOMMODATION_COLUMNS} FROM accommodations WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Accommodation::try_from).transpose()
    }

    async fn update_base_rate(&self, id: i64, base_rate: i64) -> Result<Accommodation, AppError> {
        let row: Option<AccommodationRow> = sqlx::query_as(&format!(
            r#"
            UPDATE accommodations SET base_rate = $2
            WHERE id = $1
            RETURNING {ACCOMMODATION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(base_rate)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.ok_or_else(|| AppError::not_found("Accommodation not found", json!({ "id": id })))?
            .try_into()
    }

    async fn create_room(&self, new_room: NewRoom) -> Result<Room, AppError> {
        let row: RoomRow = sqlx::query_as(
            r#"
            INSERT INTO rooms (accommodation_id, name, capacity, nightly_rate)
            VALUES ($1, $2, $3, $4)
            RETURNING id, accommodation_id, name, capacity, nightly_rate
            "#,
        )
        .bind(new_room.accommodation_id)
        .bind(&new_room.name)
        .bind(new_room.capacity)
        .bind(new_room.nightly_rate)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn find_room(&self, room_id: i64) -> Result<Option<Room>, AppError> {
        let row: Option<RoomRow> = sqlx::query_as(
            "SELECT id, accommodation_id, name, capacity, nightly_rate FROM rooms WHERE id = $1",
        )
        .bind(room_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Room::from))
    }

    async fn list_rooms(&self, accommodation_id: i64) -> Result<Vec<Room>, AppError> {
        let rows: Vec<RoomRow> = sqlx::query_as(
            r#"
            SELECT id, accommodation_id, name, capacity, nightly_rate
            FROM rooms
            WHERE accommodation_id = $1
            ORDER BY id
            "#,
        )
        .bind(accommodation_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Room::from).collect())
    }

    async fn update_room_rate(&self, room_id: i64, nightly_rate: i64) -> Result<Room, AppError> {
        let row: Option<RoomRow> = sqlx::query_as(
            r#"
            UPDATE rooms SET nightly_rate = $2
            WHERE id = $1
            RETURNING id, accommodation_id, name, capacity, nightly_rate
            "#,
        )
        .bind(room_id)
        .bind(nightly_rate)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Room::from)
            .ok_or_else(|| AppError::not_found("Room not found", json!({ "id": room_id })))
    }

    async fn create_room_type(
        &self,
        new_room_type: NewRoomTypePricing,
    ) -> Result<RoomTypePricing, AppError> {
        let row: Option<RoomTypeRow> = sqlx::query_as(
            r#"
            INSERT INTO room_type_pricing (accommodation_id, name, nightly_rate, available_units)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (accommodation_id, name) DO NOTHING
            RETURNING id, accommodation_id, name, nightly_rate, available_units
            "#,
        )
        .bind(new_room_type.accommodation_id)
        .bind(&new_room_type.name)
        .bind(new_room_type.nightly_rate)
        .bind(new_room_type.available_units)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(RoomTypePricing::from).ok_or_else(|| {
            AppError::bad_request(
                "Room type already exists for this accommodation",
                json!({ "name": new_room_type.name }),
            )
        })
    }

    async fn find_room_type(
        &self,
        accommodation_id: i64,
        name: &str,
    ) -> Result<Option<RoomTypePricing>, AppError> {
        let row: Option<RoomTypeRow> = sqlx::query_as(
            r#"
            SELECT id, accommodation_id, name, nightly_rate, available_units
            FROM room_type_pricing
            WHERE accommodation_id = $1 AND name = $2
            "#,
        )
        .bind(accommodation_id)
        .bind(name)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(RoomTypePricing::from))
    }

    async fn list_room_types(&self, accommodation_id: i64) -> Result<Vec<RoomTypePricing>, AppError> {
        let rows: Vec<RoomTypeRow> = sqlx::query_as(
            r#"
            SELECT id, accommodation_id, name, nightly_rate, available_units
            FROM room_type_pricing
            WHERE accommodation_id = $1
            ORDER BY name
            "#,
        )
        .bind(accommodation_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(RoomTypePricing::from).collect())
    }

    async fn update_room_type_rate(
        &self,
        accommodation_id: i64,
        name: &str,
        nightly_rate: i64,
    ) -> Result<RoomTypePricing, AppError> {
        let row: Option<RoomTypeRow> = sqlx::query_as(
            r#"
            UPDATE room_type_pricing SET nightly_rate = $3
            WHERE accommodation_id = $1 AND name = $2
            RETURNING id, accommodation_id, name, nightly_rate, available_units
            "#,
        )
        .bind(accommodation_id)
        .bind(name)
        .bind(nightly_rate)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(RoomTypePricing::from).ok_or_else(|| {
            AppError::not_found(
                "Room type not found",
                json!({ "accommodation_id": accommodation_id, "name": name }),
            )
        })
    }
}
