//! DTOs for availability calendars and day overrides.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};
use validator::Validate;

use crate::api::dto::accommodation::ROOM_TYPE_NAME_REGEX;
use crate::application::services::CalendarSelector;
use crate::domain::entities::{CalendarDay, DayOverride};

/// Query parameters for `GET /api/accommodations/{id}/calendar`.
#[serde_as]
#[derive(Debug, Deserialize, Validate)]
pub struct CalendarQuery {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub room_id: Option<i64>,

    #[validate(regex(path = "*ROOM_TYPE_NAME_REGEX"))]
    pub room_type: Option<String>,

    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl CalendarQuery {
    pub fn selector(&self, accommodation_id: i64) -> CalendarSelector {
        CalendarSelector {
            accommodation_id,
            room_id: self.room_id,
            room_type: self.room_type.clone(),
        }
    }
}

/// Selects the room or tier whose override is cleared.
#[serde_as]
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CalendarTargetQuery {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub room_id: Option<i64>,

    #[validate(regex(path = "*ROOM_TYPE_NAME_REGEX"))]
    pub room_type: Option<String>,
}

impl CalendarTargetQuery {
    pub fn selector(&self, accommodation_id: i64) -> CalendarSelector {
        CalendarSelector {
            accommodation_id,
            room_id: self.room_id,
            room_type: self.room_type.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CalendarResponse {
    pub accommodation_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_type: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: Vec<CalendarDay>,
}

/// Host override for one day of a calendar.
#[derive(Debug, Deserialize, Validate)]
pub struct DayOverrideRequest {
    #[validate(range(min = 1))]
    pub room_id: Option<i64>,

    #[validate(regex(path = "*ROOM_TYPE_NAME_REGEX"))]
    pub room_type: Option<String>,

    #[serde(default)]
    pub maintenance: bool,

    /// Display price for the day; has no effect on booking totals.
    #[validate(range(min = 1))]
    pub price: Option<i64>,
}

impl DayOverrideRequest {
    pub fn selector(&self, accommodation_id: i64) -> CalendarSelector {
        CalendarSelector {
            accommodation_id,
            room_id: self.room_id,
            room_type: self.room_type.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DayOverrideResponse {
    pub date: NaiveDate,
    pub maintenance: bool,
    pub price: Option<i64>,
}

impl From<DayOverride> for DayOverrideResponse {
    fn from(day_override: DayOverride) -> Self {
        Self {
            date: day_override.day,
            maintenance: day_override.maintenance,
            price: day_override.price,
        }
    }
}
