//! Day-by-day availability projection of one booking target.

use chrono::NaiveDate;
use serde_json::json;
use std::collections::HashMap;

use crate::domain::entities::{Booking, CalendarDay, DayOverride, DayStatus};
use crate::error::AppError;

/// Longest window a single calendar query may span.
pub const MAX_CALENDAR_DAYS: i64 = 366;

/// Checks an inclusive calendar window `[start, end]`.
///
/// # Errors
///
/// Returns [`AppError::InvalidDateRange`] if `end < start` or the window is
/// longer than [`MAX_CALENDAR_DAYS`].
pub fn validate_window(start: NaiveDate, end: NaiveDate) -> Result<(), AppError> {
    if end < start {
        return Err(AppError::invalid_date_range(
            "Calendar end date must not precede start date",
            json!({ "start_date": start, "end_date": end }),
        ));
    }
    if (end - start).num_days() >= MAX_CALENDAR_DAYS {
        return Err(AppError::invalid_date_range(
            format!("Calendar window must not exceed {MAX_CALENDAR_DAYS} days"),
            json!({ "start_date": start, "end_date": end }),
        ));
    }
    Ok(())
}

/// Builds the calendar for `[start, end]` (inclusive).
///
/// A day is `occupied` once `capacity` active bookings cover it, otherwise
/// `maintenance` if the host blocked it, otherwise `available`. Cancelled
/// bookings are ignored. Price overrides are carried through unchanged.
pub fn project_days(
    start: NaiveDate,
    end: NaiveDate,
    capacity: usize,
    bookings: &[Booking],
    overrides: &[DayOverride],
) -> Vec<CalendarDay> {
    let by_day: HashMap<NaiveDate, &DayOverride> = overrides.iter().map(|o| (o.day, o)).collect();

    start
        .iter_days()
        .take_while(|day| *day <= end)
        .map(|day| {
            let occupancy = bookings
                .iter()
                .filter(|b| b.is_active() && b.occupies(day))
                .count();
            let day_override = by_day.get(&day);

            let status = if occupancy >= capacity.max(1) {
                DayStatus::Occupied
            } else if day_override.is_some_and(|o| o.maintenance) {
                DayStatus::Maintenance
            } else {
                DayStatus::Available
            };

            CalendarDay {
                date: day,
                status,
                price: day_override.and_then(|o| o.price),
            }
        })
        .collect()
}

/// Maintenance days within the half-open stay `[check_in, check_out)`.
pub fn maintenance_days_in(
    check_in: NaiveDate,
    check_out: NaiveDate,
    overrides: &[DayOverride],
) -> Vec<NaiveDate> {
    let mut days: Vec<NaiveDate> = overrides
        .iter()
        .filter(|o| o.maintenance && check_in <= o.day && o.day < check_out)
        .map(|o| o.day)
        .collect();
    days.sort();
    days
}

/// Largest number of `bookings` covering any single night of `[from, to)`.
pub fn peak_occupancy(bookings: &[Booking], from: NaiveDate, to: NaiveDate) -> usize {
    from.iter_days()
        .take_while(|day| *day < to)
        .map(|day| {
            bookings
                .iter()
                .filter(|b| b.is_active() && b.occupies(day))
                .count()
        })
        .max()
        .unwrap_or(0)
}
