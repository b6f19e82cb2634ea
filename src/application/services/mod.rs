//! Business logic services for the application layer.

pub mod accommodation_service;
pub mod availability_service;
pub mod booking_service;
pub mod calendar_service;
pub mod commission_service;

pub use accommodation_service::{AccommodationDetails, AccommodationService, Selection};
pub use availability_service::{AvailabilityService, CalendarSelector};
pub use booking_service::{BookingService, CreateBooking};
pub use calendar_service::{CalendarService, DayView};
pub use commission_service::{CommissionService, RateSnapshot};
