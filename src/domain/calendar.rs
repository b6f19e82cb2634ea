//! Host calendar projections over a set of bookings.
//!
//! Views are non-exclusive: one booking may appear in `week`, `month` and
//! `two_months` at once. Cancelled bookings never appear.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::Serialize;

use crate::domain::entities::Booking;

/// Bookings of one host bucketed into time windows relative to "today".
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BookingOverview {
    /// Touches `[today, today + 7 days)`.
    pub week: Vec<Booking>,
    /// Touches the current calendar month.
    pub month: Vec<Booking>,
    /// Touches the two calendar months following the current one.
    pub two_months: Vec<Booking>,
    /// `check_out` strictly before today.
    pub history: Vec<Booking>,
}

/// A half-open date window `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Window {
    pub fn touches(&self, booking: &Booking) -> bool {
        booking.overlaps(self.start, self.end)
    }

    pub fn next_week(today: NaiveDate) -> Self {
        Self {
            start: today,
            end: today + Days::new(7),
        }
    }

    pub fn current_month(today: NaiveDate) -> Self {
        let start = first_of_month(today);
        Self {
            start,
            end: start + Months::new(1),
        }
    }

    pub fn following_two_months(today: NaiveDate) -> Self {
        let start = first_of_month(today) + Months::new(1);
        Self {
            start,
            end: start + Months::new(2),
        }
    }
}

fn first_of_month(day: NaiveDate) -> NaiveDate {
    day.with_day(1).unwrap_or(day)
}

/// Partitions `bookings` into the overview views, each ordered by check-in.
pub fn overview(today: NaiveDate, bookings: impl IntoIterator<Item = Booking>) -> BookingOverview {
    let week = Window::next_week(today);
    let month = Window::current_month(today);
    let two_months = Window::following_two_months(today);

    let mut active: Vec<Booking> = bookings.into_iter().filter(Booking::is_active).collect();
    sort_by_check_in(&mut active);

    let mut result = BookingOverview::default();
    for booking in active {
        if week.touches(&booking) {
            result.week.push(booking.clone());
        }
        if month.touches(&booking) {
            result.month.push(booking.clone());
        }
        if two_months.touches(&booking) {
            result.two_months.push(booking.clone());
        }
        if booking.check_out < today {
            result.history.push(booking);
        }
    }

    result
}

/// Active bookings occupying `day`, ordered by check-in.
pub fn bookings_on_day<'a>(
    day: NaiveDate,
    bookings: impl IntoIterator<Item = &'a Booking>,
) -> Vec<Booking> {
    let mut hits: Vec<Booking> = bookings
        .into_iter()
        .filter(|b| b.is_active() && b.occupies(day))
        .cloned()
        .collect();
    sort_by_check_in(&mut hits);
    hits
}

fn sort_by_check_in(bookings: &mut [Booking]) {
    bookings.sort_by(|a, b| a.check_in.cmp(&b.check_in).then(a.id.cmp(&b.id)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::BookingStatus;
    use crate::domain::entities::booking::fixtures::{booking, date};

    #[test]
    fn test_windows() {
        let today = date(2024, 6, 20);

        assert_eq!(
            Window::next_week(today),
            Window {
                start: date(2024, 6, 20),
                end: date(2024, 6, 27)
            }
        );
        assert_eq!(
            Window::current_month(today),
            Window {
                start: date(2024, 6, 1),
                end: date(2024, 7, 1)
            }
        );
        assert_eq!(
            Window::following_two_months(today),
            Window {
                start: date(2024, 7, 1),
                end: date(2024, 9, 1)
            }
        );
    }

    #[test]
    fn test_windows_across_year_end() {
        let today = date(2024, 12, 31);
        assert_eq!(Window::current_month(today).end, date(2025, 1, 1));
        assert_eq!(Window::following_two_months(today).end, date(2025, 3, 1));
    }

    #[test]
    fn test_overview_buckets_are_non_exclusive() {
        let today = date(2024, 6, 20);
        let bookings = vec![
            booking(1, date(2024, 6, 1), date(2024, 6, 5)),
            booking(2, date(2024, 6, 22), date(2024, 6, 24)),
            booking(3, date(2024, 6, 29), date(2024, 7, 3)),
            booking(4, date(2024, 8, 10), date(2024, 8, 12)),
            booking(5, date(2024, 10, 1), date(2024, 10, 2)),
        ];

        let view = overview(today, bookings);
        let ids = |v: &[Booking]| v.iter().map(|b| b.id).collect::<Vec<_>>();

        assert_eq!(ids(&view.week), vec![2]);
        assert_eq!(ids(&view.month), vec![1, 2, 3]);
        assert_eq!(ids(&view.two_months), vec![3, 4]);
        assert_eq!(ids(&view.history), vec![1]);
    }

    #[test]
    fn test_overview_ignores_cancelled() {
        let mut cancelled = booking(1, date(2024, 6, 21), date(2024, 6, 23));
        cancelled.status = BookingStatus::Cancelled;

        let view = overview(date(2024, 6, 20), vec![cancelled]);
        assert_eq!(view, BookingOverview::default());
    }

    #[test]
    fn test_checkout_today_is_not_history() {
        let view = overview(
            date(2024, 6, 20),
            vec![booking(1, date(2024, 6, 18), date(2024, 6, 20))],
        );
        assert!(view.history.is_empty());
        assert_eq!(view.month.len(), 1);
        assert!(view.week.is_empty());
    }

    #[test]
    fn test_bookings_on_day_ordered_by_check_in() {
        let bookings = vec![
            booking(1, date(2024, 6, 12), date(2024, 6, 16)),
            booking(2, date(2024, 6, 10), date(2024, 6, 15)),
            booking(3, date(2024, 6, 15), date(2024, 6, 18)),
        ];

        let hits = bookings_on_day(date(2024, 6, 14), &bookings);
        assert_eq!(hits.iter().map(|b| b.id).collect::<Vec<_>>(), vec![2, 1]);

        // Checkout day is free; arrival day counts.
        let hits = bookings_on_day(date(2024, 6, 15), &bookings);
        assert_eq!(hits.iter().map(|b| b.id).collect::<Vec<_>>(), vec![1, 3]);
    }
}
