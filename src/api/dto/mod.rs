//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization and validator
//! for input validation.

pub mod accommodation;
pub mod booking;
pub mod calendar;
pub mod commission;
pub mod health;
pub mod host;
pub mod pagination;
