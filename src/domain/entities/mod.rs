//! Core domain entities of the reservation authority.
//!
//! Entities are plain data structures; the rules that act on them live in the
//! sibling domain modules ([`crate::domain::pricing`],
//! [`crate::domain::lifecycle`], [`crate::domain::commission`],
//! [`crate::domain::calendar`], [`crate::domain::availability`]).
//!
//! # Design Pattern
//!
//! Entities come with separate `New*` structs used for creation; identity and
//! timestamps are assigned by the store.

pub mod accommodation;
pub mod availability;
pub mod booking;
pub mod commission;

pub use accommodation::{
    Accommodation, AccommodationStatus, NewAccommodation, NewRoom, NewRoomTypePricing, Room,
    RoomTypePricing,
};
pub use availability::{CalendarDay, DayOverride, DayStatus};
pub use booking::{
    Booking, BookingFilter, BookingStatus, BookingTarget, LifecycleState, NewBooking,
    PaymentStatus,
};
pub use commission::{
    CommissionEffect, CommissionRateChange, CommissionRecord, CommissionStatus,
    NewCommissionRecord,
};
