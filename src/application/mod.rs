//! Application layer services implementing the reservation workflows.
//!
//! This layer orchestrates domain operations by coordinating repository calls,
//! validation, and the pure rules in [`crate::domain`]. Services consume
//! repository traits and provide a clean API for HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::booking_service::BookingService`] - Booking validation, lifecycle and payments
//! - [`services::availability_service::AvailabilityService`] - Target calendars and day overrides
//! - [`services::commission_service::CommissionService`] - Commission rate and records
//! - [`services::calendar_service::CalendarService`] - Host overview and day view
//! - [`services::accommodation_service::AccommodationService`] - Inventory and rates

pub mod services;
