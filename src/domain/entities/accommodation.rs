//! Accommodation, room and room-type (tier) entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Publication status of an accommodation.
///
/// Managed by platform moderation; the booking core only reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccommodationStatus {
    Draft,
    PendingReview,
    Published,
    Suspended,
}

impl AccommodationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::PendingReview => "pending_review",
            Self::Published => "published",
            Self::Suspended => "suspended",
        }
    }
}

impl fmt::Display for AccommodationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccommodationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "pending_review" => Ok(Self::PendingReview),
            "published" => Ok(Self::Published),
            "suspended" => Ok(Self::Suspended),
            other => Err(format!("unknown accommodation status '{other}'")),
        }
    }
}

/// A bookable property owned by a host.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Accommodation {
    pub id: i64,
    pub host_id: i64,
    pub name: String,
    pub city: String,
    /// Nightly rate in whole currency units.
    pub base_rate: i64,
    pub max_guests: i32,
    pub status: AccommodationStatus,
    pub created_at: DateTime<Utc>,
}

/// Input data for creating an accommodation.
#[derive(Debug, Clone)]
pub struct NewAccommodation {
    pub host_id: i64,
    pub name: String,
    pub city: String,
    pub base_rate: i64,
    pub max_guests: i32,
    pub status: AccommodationStatus,
}

/// A physical room inside an accommodation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Room {
    pub id: i64,
    pub accommodation_id: i64,
    pub name: String,
    pub capacity: i32,
    pub nightly_rate: i64,
}

#[derive(Debug, Clone)]
pub struct NewRoom {
    pub accommodation_id: i64,
    pub name: String,
    pub capacity: i32,
    pub nightly_rate: i64,
}

/// A named rate class ("Suite", "Dorm bed") not bound to a physical room.
///
/// `available_units` is `None` when the tier does not track inventory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomTypePricing {
    pub id: i64,
    pub accommodation_id: i64,
    pub name: String,
    pub nightly_rate: i64,
    pub available_units: Option<i32>,
}

impl RoomTypePricing {
    /// Tracked tier with at least one unit; such a tier is its own booking target.
    pub fn tracks_units(&self) -> bool {
        self.available_units.is_some_and(|u| u > 0)
    }

    /// Tracked tier configured with no units left.
    pub fn is_exhausted(&self) -> bool {
        self.available_units.is_some_and(|u| u <= 0)
    }
}

#[derive(Debug, Clone)]
pub struct NewRoomTypePricing {
    pub accommodation_id: i64,
    pub name: String,
    pub nightly_rate: i64,
    pub available_units: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tier(units: Option<i32>) -> RoomTypePricing {
        RoomTypePricing {
            id: 1,
            accommodation_id: 1,
            name: "Suite".to_string(),
            nightly_rate: 90_000,
            available_units: units,
        }
    }

    #[test]
    fn test_status_round_trips_through_str() {
        for status in [
            AccommodationStatus::Draft,
            AccommodationStatus::PendingReview,
            AccommodationStatus::Published,
            AccommodationStatus::Suspended,
        ] {
            assert_eq!(status.as_str().parse::<AccommodationStatus>(), Ok(status));
        }
        assert!("archived".parse::<AccommodationStatus>().is_err());
    }

    #[test]
    fn test_tier_unit_tracking() {
        assert!(!tier(None).tracks_units());
        assert!(!tier(None).is_exhausted());

        assert!(tier(Some(3)).tracks_units());
        assert!(!tier(Some(3)).is_exhausted());

        assert!(!tier(Some(0)).tracks_units());
        assert!(tier(Some(0)).is_exhausted());
    }
}
