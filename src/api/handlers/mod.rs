//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod accommodations;
pub mod bookings;
pub mod calendar;
pub mod commissions;
pub mod health;
pub mod hosts;

pub use accommodations::{
    create_accommodation_handler, create_room_handler, create_room_type_handler,
    get_accommodation_handler, update_base_rate_handler, update_room_rate_handler,
    update_room_type_rate_handler,
};
pub use bookings::{
    booking_commission_handler, create_booking_handler, get_booking_handler,
    list_bookings_handler, record_payment_handler, transition_booking_handler,
};
pub use calendar::{calendar_handler, clear_day_override_handler, set_day_override_handler};
pub use commissions::{
    get_rate_handler, list_commissions_handler, rate_history_handler, set_rate_handler,
    settle_commission_handler,
};
pub use health::health_handler;
pub use hosts::{host_day_handler, host_overview_handler};
