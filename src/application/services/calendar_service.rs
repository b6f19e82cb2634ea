//! Host-facing booking overview and per-day grid lookups.

use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;

use crate::domain::calendar::{self, BookingOverview};
use crate::domain::clock::Clock;
use crate::domain::entities::Booking;
use crate::domain::repositories::BookingRepository;
use crate::error::AppError;

/// Bookings touching one day of a host's grid.
#[derive(Debug, Clone, Serialize)]
pub struct DayView {
    pub date: NaiveDate,
    /// Occupancy badge of the day cell.
    pub count: usize,
    pub bookings: Vec<Booking>,
}

pub struct CalendarService {
    repository: Arc<dyn BookingRepository>,
    clock: Arc<dyn Clock>,
}

impl CalendarService {
    pub fn new(repository: Arc<dyn BookingRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Week, month, two-month and history views of a host's bookings.
    ///
    /// `today` defaults to the service clock.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn host_overview(
        &self,
        host_id: i64,
        today: Option<NaiveDate>,
    ) -> Result<BookingOverview, AppError> {
        let today = today.unwrap_or_else(|| self.clock.today());
        let bookings = self.repository.list_for_host(host_id).await?;

        Ok(calendar::overview(today, bookings))
    }

    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn host_day(&self, host_id: i64, day: NaiveDate) -> Result<DayView, AppError> {
        let bookings = self.repository.list_for_host(host_id).await?;
        let hits = calendar::bookings_on_day(day, &bookings);

        Ok(DayView {
            date: day,
            count: hits.len(),
            bookings: hits,
        })
    }
}
