//! DTOs for accommodation, room and tier management.

use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;
use validator::Validate;

use crate::domain::entities::{
    AccommodationStatus, NewAccommodation, NewRoom, NewRoomTypePricing,
};

/// Tier names become part of booking target keys, so `:` is excluded.
pub static ROOM_TYPE_NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L}\p{N}][\p{L}\p{N} _.\-]*$").unwrap());

#[derive(Debug, Deserialize, Validate)]
pub struct CreateAccommodationRequest {
    #[validate(range(min = 1))]
    pub host_id: i64,

    #[validate(length(min = 1, max = 200))]
    pub name: String,

    #[validate(length(max = 100))]
    #[serde(default)]
    pub city: String,

    #[validate(range(min = 1))]
    pub base_rate: i64,

    #[validate(range(min = 1, max = 1000))]
    pub max_guests: i32,

    #[serde(default = "default_status")]
    pub status: AccommodationStatus,
}

fn default_status() -> AccommodationStatus {
    AccommodationStatus::Published
}

impl From<CreateAccommodationRequest> for NewAccommodation {
    fn from(request: CreateAccommodationRequest) -> Self {
        NewAccommodation {
            host_id: request.host_id,
            name: request.name,
            city: request.city,
            base_rate: request.base_rate,
            max_guests: request.max_guests,
            status: request.status,
        }
    }
}

/// New nightly rate for an accommodation, room or tier.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateRateRequest {
    #[validate(range(min = 1))]
    pub nightly_rate: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateRoomRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(range(min = 1, max = 100))]
    pub capacity: i32,

    #[validate(range(min = 1))]
    pub nightly_rate: i64,
}

impl CreateRoomRequest {
    pub fn into_new_room(self, accommodation_id: i64) -> NewRoom {
        NewRoom {
            accommodation_id,
            name: self.name,
            capacity: self.capacity,
            nightly_rate: self.nightly_rate,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateRoomTypeRequest {
    #[validate(length(min = 1, max = 64))]
    #[validate(regex(path = "*ROOM_TYPE_NAME_REGEX"))]
    pub name: String,

    #[validate(range(min = 1))]
    pub nightly_rate: i64,

    /// Omit for a tier without inventory tracking.
    #[validate(range(min = 0))]
    pub available_units: Option<i32>,
}

impl CreateRoomTypeRequest {
    pub fn into_new_room_type(self, accommodation_id: i64) -> NewRoomTypePricing {
        NewRoomTypePricing {
            accommodation_id,
            name: self.name,
            nightly_rate: self.nightly_rate,
            available_units: self.available_units,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_type_name_regex() {
        assert!(ROOM_TYPE_NAME_REGEX.is_match("Suite"));
        assert!(ROOM_TYPE_NAME_REGEX.is_match("Dorm bed-6"));
        assert!(ROOM_TYPE_NAME_REGEX.is_match("한옥 스위트"));
        assert!(!ROOM_TYPE_NAME_REGEX.is_match("tier:1"));
        assert!(!ROOM_TYPE_NAME_REGEX.is_match(" leading"));
    }

    #[test]
    fn test_create_accommodation_defaults() {
        let request: CreateAccommodationRequest = serde_json::from_str(
            r#"{"host_id": 9, "name": "Seaside", "base_rate": 50000, "max_guests": 4}"#,
        )
        .unwrap();

        assert!(request.validate().is_ok());
        assert_eq!(request.status, AccommodationStatus::Published);
        assert_eq!(request.city, "");
    }

    #[test]
    fn test_non_positive_rate_is_invalid() {
        let request = UpdateRateRequest { nightly_rate: 0 };
        assert!(request.validate().is_err());
    }
}
