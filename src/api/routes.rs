//! API route configuration.

use crate::api::handlers::{
    booking_commission_handler, calendar_handler, clear_day_override_handler,
    create_accommodation_handler, create_booking_handler, create_room_handler,
    create_room_type_handler, get_accommodation_handler, get_booking_handler, get_rate_handler,
    host_day_handler, host_overview_handler, list_bookings_handler, list_commissions_handler,
    rate_history_handler, record_payment_handler, set_day_override_handler, set_rate_handler,
    settle_commission_handler, transition_booking_handler, update_base_rate_handler,
    update_room_rate_handler, update_room_type_rate_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, patch, post, put},
};

/// All booking API routes, relative to `/api`.
///
/// # Endpoints
///
/// - `POST   /accommodations`                          - Register an accommodation
/// - `GET    /accommodations/{id}`                     - Accommodation with rooms and tiers
/// - `PATCH  /accommodations/{id}/rate`                - Change base nightly rate
/// - `POST   /accommodations/{id}/rooms`               - Add a room
/// - `POST   /accommodations/{id}/room-types`          - Add a pricing tier
/// - `PATCH  /accommodations/{id}/room-types/{name}/rate` - Change a tier's rate
/// - `GET    /accommodations/{id}/calendar`            - Availability calendar
/// - `PUT    /accommodations/{id}/calendar/{date}`     - Set a day override
/// - `DELETE /accommodations/{id}/calendar/{date}`     - Clear a day override
/// - `PATCH  /rooms/{id}/rate`                         - Change a room's rate
/// - `GET    /bookings`                                - Paged booking list
/// - `POST   /bookings`                                - Book a stay
/// - `GET    /bookings/{id}`                           - Booking details
/// - `POST   /bookings/{id}/transition`                - Confirm or cancel
/// - `POST   /bookings/{id}/payment`                   - Record a payment outcome
/// - `GET    /bookings/{id}/commission`                - Commission of a paid booking
/// - `GET    /commissions`                             - Paged commission list
/// - `POST   /commissions/{id}/settle`                 - Settle a commission
/// - `GET    /commission-rate`                         - Current rate
/// - `PUT    /commission-rate`                         - Replace the rate
/// - `GET    /commission-rate/history`                 - Rate audit log
/// - `GET    /hosts/{id}/overview`                     - Host booking overview
/// - `GET    /hosts/{id}/day/{date}`                   - Host day view
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/accommodations", post(create_accommodation_handler))
        .route("/accommodations/{id}", get(get_accommodation_handler))
        .route("/accommodations/{id}/rate", patch(update_base_rate_handler))
        .route("/accommodations/{id}/rooms", post(create_room_handler))
        .route(
            "/accommodations/{id}/room-types",
            post(create_room_type_handler),
        )
        .route(
            "/accommodations/{id}/room-types/{name}/rate",
            patch(update_room_type_rate_handler),
        )
        .route("/accommodations/{id}/calendar", get(calendar_handler))
        .route(
            "/accommodations/{id}/calendar/{date}",
            put(set_day_override_handler).delete(clear_day_override_handler),
        )
        .route("/rooms/{id}/rate", patch(update_room_rate_handler))
        .route(
            "/bookings",
            get(list_bookings_handler).post(create_booking_handler),
        )
        .route("/bookings/{id}", get(get_booking_handler))
        .route(
            "/bookings/{id}/transition",
            post(transition_booking_handler),
        )
        .route("/bookings/{id}/payment", post(record_payment_handler))
        .route("/bookings/{id}/commission", get(booking_commission_handler))
        .route("/commissions", get(list_commissions_handler))
        .route("/commissions/{id}/settle", post(settle_commission_handler))
        .route(
            "/commission-rate",
            get(get_rate_handler).put(set_rate_handler),
        )
        .route("/commission-rate/history", get(rate_history_handler))
        .route("/hosts/{id}/overview", get(host_overview_handler))
        .route("/hosts/{id}/day/{date}", get(host_day_handler))
}
