//! Availability calendars and host day overrides.

use chrono::{Days, NaiveDate};
use serde_json::json;
use std::sync::Arc;

use crate::application::services::AccommodationService;
use crate::domain::availability;
use crate::domain::entities::{BookingTarget, CalendarDay, DayOverride};
use crate::domain::repositories::{AvailabilityRepository, BookingRepository};
use crate::error::AppError;

/// Identifies the calendar of one booking target.
#[derive(Debug, Clone)]
pub struct CalendarSelector {
    pub accommodation_id: i64,
    pub room_id: Option<i64>,
    pub room_type: Option<String>,
}

/// Read side of the availability index plus host-managed day overrides.
///
/// Calendars are snapshot reads; they take no booking locks.
pub struct AvailabilityService {
    bookings: Arc<dyn BookingRepository>,
    overrides: Arc<dyn AvailabilityRepository>,
    accommodations: Arc<AccommodationService>,
}

impl AvailabilityService {
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        overrides: Arc<dyn AvailabilityRepository>,
        accommodations: Arc<AccommodationService>,
    ) -> Self {
        Self {
            bookings,
            overrides,
            accommodations,
        }
    }

    /// Day-by-day status of the selected target over `[start, end]`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidDateRange`] for an inverted or oversized window.
    /// Returns [`AppError::NotFound`] if the accommodation, room or tier is unknown.
    pub async fn get_calendar(
        &self,
        selector: &CalendarSelector,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<CalendarDay>, AppError> {
        availability::validate_window(start, end)?;
        let target = self.target(selector).await?;
        let key = target.key();
        let until = end.checked_add_days(Days::new(1)).unwrap_or(end);

        let (bookings, overrides) = tokio::try_join!(
            self.bookings.list_active_for_target(&key, start, until),
            self.overrides.list_overrides(&key, start, end)
        )?;

        Ok(availability::project_days(
            start,
            end,
            target.concurrent_capacity(),
            &bookings,
            &overrides,
        ))
    }

    /// Marks `day` as under maintenance and/or attaches a display price.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a non-positive price.
    /// Returns [`AppError::NotFound`] if the accommodation, room or tier is unknown.
    pub async fn set_day_override(
        &self,
        selector: &CalendarSelector,
        day: NaiveDate,
        maintenance: bool,
        price: Option<i64>,
    ) -> Result<DayOverride, AppError> {
        if price.is_some_and(|p| p <= 0) {
            return Err(AppError::bad_request(
                "Price override must be positive",
                json!({ "price": price }),
            ));
        }
        let target = self.target(selector).await?;

        let saved = self
            .overrides
            .upsert_override(DayOverride {
                target_key: target.key(),
                day,
                maintenance,
                price,
            })
            .await?;

        tracing::info!(booking_target = %target, %day, maintenance, ?price, "Day override set");
        Ok(saved)
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if there is no override for `day`.
    pub async fn clear_day_override(
        &self,
        selector: &CalendarSelector,
        day: NaiveDate,
    ) -> Result<(), AppError> {
        let target = self.target(selector).await?;
        let key = target.key();

        if !self.overrides.delete_override(&key, day).await? {
            return Err(AppError::not_found(
                "No override for this day",
                json!({ "target": key, "date": day }),
            ));
        }

        tracing::info!(booking_target = %target, %day, "Day override cleared");
        Ok(())
    }

    async fn target(&self, selector: &CalendarSelector) -> Result<BookingTarget, AppError> {
        let selection = self
            .accommodations
            .resolve_selection(
                selector.accommodation_id,
                selector.room_id,
                selector.room_type.as_deref(),
            )
            .await?;
        Ok(selection.target())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::accommodation_service::fixtures::{accommodation, room};
    use crate::domain::entities::DayStatus;
    use crate::domain::entities::booking::fixtures::{booking, date};
    use crate::domain::repositories::{
        MockAccommodationRepository, MockAvailabilityRepository, MockBookingRepository,
    };

    fn inventory() -> Arc<AccommodationService> {
        let mut mock_repo = MockAccommodationRepository::new();
        mock_repo
            .expect_find_by_id()
            .returning(|id| Ok(Some(accommodation(id))));
        mock_repo
            .expect_find_room()
            .returning(|id| Ok(Some(room(id, 1))));
        Arc::new(AccommodationService::new(Arc::new(mock_repo)))
    }

    fn room_selector() -> CalendarSelector {
        CalendarSelector {
            accommodation_id: 1,
            room_id: Some(1),
            room_type: None,
        }
    }

    #[tokio::test]
    async fn test_calendar_marks_half_open_occupancy() {
        let mut bookings = MockBookingRepository::new();
        bookings
            .expect_list_active_for_target()
            .withf(|key, from, to| {
                key == "room:1" && *from == date(2024, 6, 9) && *to == date(2024, 6, 17)
            })
            .times(1)
            .returning(|_, _, _| Ok(vec![booking(1, date(2024, 6, 10), date(2024, 6, 15))]));

        let mut overrides = MockAvailabilityRepository::new();
        overrides.expect_list_overrides().returning(|key, _, _| {
            Ok(vec![DayOverride {
                target_key: key.to_string(),
                day: date(2024, 6, 16),
                maintenance: true,
                price: Some(90_000),
            }])
        });

        let service = AvailabilityService::new(Arc::new(bookings), Arc::new(overrides), inventory());
        let days = service
            .get_calendar(&room_selector(), date(2024, 6, 9), date(2024, 6, 16))
            .await
            .unwrap();

        let statuses: Vec<DayStatus> = days.iter().map(|d| d.status).collect();
        assert_eq!(
            statuses,
            vec![
                DayStatus::Available,
                DayStatus::Occupied,
                DayStatus::Occupied,
                DayStatus::Occupied,
                DayStatus::Occupied,
                DayStatus::Occupied,
                DayStatus::Available,
                DayStatus::Maintenance,
            ]
        );
        assert_eq!(days[7].price, Some(90_000));
    }

    #[tokio::test]
    async fn test_calendar_rejects_inverted_window() {
        let service = AvailabilityService::new(
            Arc::new(MockBookingRepository::new()),
            Arc::new(MockAvailabilityRepository::new()),
            inventory(),
        );

        let result = service
            .get_calendar(&room_selector(), date(2024, 6, 10), date(2024, 6, 9))
            .await;

        assert!(matches!(result, Err(AppError::InvalidDateRange { .. })));
    }

    #[tokio::test]
    async fn test_set_override_rejects_non_positive_price() {
        let mut overrides = MockAvailabilityRepository::new();
        overrides.expect_upsert_override().times(0);

        let service = AvailabilityService::new(
            Arc::new(MockBookingRepository::new()),
            Arc::new(overrides),
            inventory(),
        );
        let result = service
            .set_day_override(&room_selector(), date(2024, 6, 10), false, Some(0))
            .await;

        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_clear_missing_override_is_not_found() {
        let mut overrides = MockAvailabilityRepository::new();
        overrides.expect_delete_override().returning(|_, _| Ok(false));

        let service = AvailabilityService::new(
            Arc::new(MockBookingRepository::new()),
            Arc::new(overrides),
            inventory(),
        );
        let result = service
            .clear_day_override(&room_selector(), date(2024, 6, 10))
            .await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }
}
