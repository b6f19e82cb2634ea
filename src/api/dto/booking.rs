//! DTOs for booking endpoints.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};
use validator::Validate;

use crate::api::dto::accommodation::ROOM_TYPE_NAME_REGEX;
use crate::api::dto::pagination::PaginationParams;
use crate::application::services::CreateBooking;
use crate::domain::entities::{Booking, BookingStatus};
use crate::domain::lifecycle::{BookingAction, PaymentEvent};

/// Request to book a stay.
///
/// At most one of `room_id` and `room_type` may be given.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBookingRequest {
    #[validate(range(min = 1))]
    pub accommodation_id: i64,

    #[validate(range(min = 1))]
    pub room_id: Option<i64>,

    #[validate(length(min = 1, max = 64))]
    #[validate(regex(path = "*ROOM_TYPE_NAME_REGEX"))]
    pub room_type: Option<String>,

    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: i32,

    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

impl From<CreateBookingRequest> for CreateBooking {
    fn from(request: CreateBookingRequest) -> Self {
        CreateBooking {
            accommodation_id: request.accommodation_id,
            room_id: request.room_id,
            room_type: request.room_type,
            check_in: request.check_in,
            check_out: request.check_out,
            guests: request.guests,
            notes: request.notes,
        }
    }
}

/// A booking as returned by the API.
#[derive(Debug, Serialize)]
pub struct BookingResponse {
    #[serde(flatten)]
    pub booking: Booking,
    pub nights: i64,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        let nights = booking.nights();
        Self { booking, nights }
    }
}

#[derive(Debug, Deserialize)]
pub struct TransitionRequest {
    pub action: BookingAction,
}

#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    pub outcome: PaymentEvent,
}

/// Query parameters for `GET /api/bookings`.
#[serde_as]
#[derive(Debug, Deserialize)]
pub struct BookingListParams {
    #[serde(flatten)]
    pub pagination: PaginationParams,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub accommodation_id: Option<i64>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub host_id: Option<i64>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub status: Option<BookingStatus>,
}
