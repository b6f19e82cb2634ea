//! Domain layer: entities, the reservation rules, and repository contracts.
//!
//! Everything here is independent of HTTP and storage. The rule modules are
//! pure functions over entities so they can be exercised without a store.
//!
//! # Architecture
//!
//! - [`entities`] - Accommodation, Room, tier, Booking, CommissionRecord
//! - [`pricing`] - Nightly rate resolution (room, then tier, then base rate)
//! - [`availability`] - Per-day occupancy/maintenance projection of a target
//! - [`lifecycle`] - Booking and payment state machines
//! - [`commission`] - Rate validation and platform/host split
//! - [`calendar`] - Host overview buckets and per-day booking lookup
//! - [`clock`] - Injectable time source
//! - [`repositories`] - Data access traits
//!
//! # Booking Flow
//!
//! 1. [`pricing::resolve_nightly_rate`] freezes the rate for the request
//! 2. [`repositories::BookingRepository::insert_if_available`] checks the
//!    target and inserts atomically
//! 3. [`lifecycle`] drives confirmation, cancellation and payment
//! 4. The first `paid` event materializes a commission record via [`commission`]

pub mod availability;
pub mod calendar;
pub mod clock;
pub mod commission;
pub mod entities;
pub mod lifecycle;
pub mod pricing;
pub mod repositories;
