//! Nightly rate resolution.
//!
//! Priority: selected room's rate, then a selected tier's rate (unless the tier
//! is exhausted), then the accommodation's base rate. The resolved rate is
//! frozen into the booking and never re-derived.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::json;

use crate::domain::entities::{Accommodation, Room, RoomTypePricing};
use crate::error::AppError;

/// Where a resolved nightly rate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RateSource {
    Room,
    RoomType,
    Base,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedRate {
    pub nightly_rate: i64,
    pub source: RateSource,
}

/// Resolves the nightly rate for a booking request.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if both a room and a tier are selected, or
/// if the selection belongs to a different accommodation.
pub fn resolve_nightly_rate(
    accommodation: &Accommodation,
    room: Option<&Room>,
    tier: Option<&RoomTypePricing>,
) -> Result<ResolvedRate, AppError> {
    match (room, tier) {
        (Some(_), Some(_)) => Err(AppError::bad_request(
            "Select either a room or a room type, not both",
            json!({ "accommodation_id": accommodation.id }),
        )),
        (Some(room), None) => {
            ensure_owned(accommodation, room.accommodation_id, "room")?;
            Ok(ResolvedRate {
                nightly_rate: room.nightly_rate,
                source: RateSource::Room,
            })
        }
        (None, Some(tier)) => {
            ensure_owned(accommodation, tier.accommodation_id, "room_type")?;
            if tier.is_exhausted() {
                Ok(base_rate(accommodation))
            } else {
                Ok(ResolvedRate {
                    nightly_rate: tier.nightly_rate,
                    source: RateSource::RoomType,
                })
            }
        }
        (None, None) => Ok(base_rate(accommodation)),
    }
}

/// Total price for `[check_in, check_out)` at a frozen nightly rate.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if the total overflows.
pub fn total_price(
    nightly_rate: i64,
    check_in: NaiveDate,
    check_out: NaiveDate,
) -> Result<i64, AppError> {
    let nights = (check_out - check_in).num_days();
    nights.checked_mul(nightly_rate).ok_or_else(|| {
        AppError::bad_request(
            "Booking total is too large",
            json!({ "nights": nights, "nightly_rate": nightly_rate }),
        )
    })
}

fn base_rate(accommodation: &Accommodation) -> ResolvedRate {
    ResolvedRate {
        nightly_rate: accommodation.base_rate,
        source: RateSource::Base,
    }
}

fn ensure_owned(accommodation: &Accommodation, owner_id: i64, kind: &str) -> Result<(), AppError> {
    if owner_id != accommodation.id {
        return Err(AppError::bad_request(
            format!("Selected {kind} does not belong to this accommodation"),
            json!({ "accommodation_id": accommodation.id, "owner_id": owner_id }),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::AccommodationStatus;
    use crate::domain::entities::booking::fixtures::date;
    use chrono::Utc;

    fn accommodation() -> Accommodation {
        Accommodation {
            id: 1,
            host_id: 9,
            name: "Seaside".to_string(),
            city: "Busan".to_string(),
            base_rate: 50_000,
            max_guests: 4,
            status: AccommodationStatus::Published,
            created_at: Utc::now(),
        }
    }

    fn room() -> Room {
        Room {
            id: 3,
            accommodation_id: 1,
            name: "Ocean view".to_string(),
            capacity: 2,
            nightly_rate: 70_000,
        }
    }

    fn tier(units: Option<i32>) -> RoomTypePricing {
        RoomTypePricing {
            id: 5,
            accommodation_id: 1,
            name: "Suite".to_string(),
            nightly_rate: 120_000,
            available_units: units,
        }
    }

    #[test]
    fn test_room_rate_wins() {
        let rate = resolve_nightly_rate(&accommodation(), Some(&room()), None).unwrap();
        assert_eq!(rate.nightly_rate, 70_000);
        assert_eq!(rate.source, RateSource::Room);
    }

    #[test]
    fn test_tier_rate_when_not_exhausted() {
        for units in [None, Some(2)] {
            let rate = resolve_nightly_rate(&accommodation(), None, Some(&tier(units))).unwrap();
            assert_eq!(rate.nightly_rate, 120_000);
            assert_eq!(rate.source, RateSource::RoomType);
        }
    }

    #[test]
    fn test_exhausted_tier_falls_back_to_base() {
        let rate = resolve_nightly_rate(&accommodation(), None, Some(&tier(Some(0)))).unwrap();
        assert_eq!(rate.nightly_rate, 50_000);
        assert_eq!(rate.source, RateSource::Base);
    }

    #[test]
    fn test_base_rate_without_selection() {
        let rate = resolve_nightly_rate(&accommodation(), None, None).unwrap();
        assert_eq!(rate.nightly_rate, 50_000);
        assert_eq!(rate.source, RateSource::Base);
    }

    #[test]
    fn test_room_and_tier_together_is_rejected() {
        let result = resolve_nightly_rate(&accommodation(), Some(&room()), Some(&tier(None)));
        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[test]
    fn test_foreign_room_is_rejected() {
        let mut foreign = room();
        foreign.accommodation_id = 2;
        let result = resolve_nightly_rate(&accommodation(), Some(&foreign), None);
        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[test]
    fn test_total_price() {
        let total = total_price(70_000, date(2024, 6, 10), date(2024, 6, 13)).unwrap();
        assert_eq!(total, 210_000);
    }

    #[test]
    fn test_total_price_overflow() {
        let result = total_price(i64::MAX, date(2024, 6, 10), date(2024, 6, 13));
        assert!(result.is_err());
    }
}
