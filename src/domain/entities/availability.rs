//! Per-day availability entities.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Occupancy status of one day of a booking target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    Available,
    Occupied,
    Maintenance,
}

/// Host-set override for one day of a target.
///
/// `price` is informational and never used for booking pricing.
#[derive(Debug, Clone, PartialEq)]
pub struct DayOverride {
    pub target_key: String,
    pub day: NaiveDate,
    pub maintenance: bool,
    pub price: Option<i64>,
}

/// One cell of an availability calendar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub status: DayStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<i64>,
}
