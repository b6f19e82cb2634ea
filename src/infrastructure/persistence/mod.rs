//! Repository implementations.
//!
//! Concrete implementations of the domain repository traits: PostgreSQL
//! repositories built on SQLx, and an in-process store with the same
//! atomicity guarantees for database-less runs and tests.
//!
//! # Repositories
//!
//! - [`PgAccommodationRepository`] - Accommodations, rooms and tiers
//! - [`PgBookingRepository`] - Advisory-locked booking insertion and lifecycle updates
//! - [`PgAvailabilityRepository`] - Maintenance and price overrides
//! - [`PgCommissionRepository`] - Commission records and the rate audit log
//! - [`MemoryStore`] - All of the above, in memory

pub mod memory_store;
pub mod pg_accommodation_repository;
pub mod pg_availability_repository;
pub mod pg_booking_repository;
pub mod pg_commission_repository;

pub use memory_store::MemoryStore;
pub use pg_accommodation_repository::PgAccommodationRepository;
pub use pg_availability_repository::PgAvailabilityRepository;
pub use pg_booking_repository::PgBookingRepository;
pub use pg_commission_repository::PgCommissionRepository;

use serde_json::json;
use std::str::FromStr;

use crate::error::AppError;

/// Parses a status column stored as text.
pub(crate) fn parse_status<T>(value: &str) -> Result<T, AppError>
where
    T: FromStr<Err = String>,
{
    value.parse().map_err(|e: String| {
        tracing::error!(error = %e, "Unreadable status column");
        AppError::internal("Corrupt status value in storage", json!({ "value": value }))
    })
}
