//! Repository trait definitions for the domain layer.
//!
//! These traits abstract data access following the Repository pattern.
//! Implementations live in `crate::infrastructure::persistence`: a PostgreSQL
//! store and an in-memory store with identical atomicity guarantees.
//!
//! # Available Repositories
//!
//! - [`AccommodationRepository`] - Accommodations, rooms and rate tiers
//! - [`BookingRepository`] - Serialized booking insertion and lifecycle updates
//! - [`AvailabilityRepository`] - Per-day maintenance and price overrides
//! - [`CommissionRepository`] - Commission records and the rate audit log
//!
//! # Testing
//!
//! Mock implementations are generated with `mockall` under `cfg(test)`.

pub mod accommodation_repository;
pub mod availability_repository;
pub mod booking_repository;
pub mod commission_repository;

pub use accommodation_repository::AccommodationRepository;
pub use availability_repository::AvailabilityRepository;
pub use booking_repository::BookingRepository;
pub use commission_repository::{CommissionFilter, CommissionRepository};

#[cfg(test)]
pub use accommodation_repository::MockAccommodationRepository;
#[cfg(test)]
pub use availability_repository::MockAvailabilityRepository;
#[cfg(test)]
pub use booking_repository::MockBookingRepository;
#[cfg(test)]
pub use commission_repository::MockCommissionRepository;
