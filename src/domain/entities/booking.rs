//! Booking entity and its status enums.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Reservation status of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Pending and confirmed bookings hold their dates.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(format!("unknown booking status '{other}'")),
        }
    }
}

/// Payment status, tracked independently of [`BookingStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "failed" => Ok(Self::Failed),
            "refunded" => Ok(Self::Refunded),
            other => Err(format!("unknown payment status '{other}'")),
        }
    }
}

/// The pair of statuses a lifecycle transition reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecycleState {
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
}

/// What overlap and occupancy are evaluated against.
///
/// Every booking belongs to exactly one target; bookings on different targets
/// never conflict and never serialize against each other.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BookingTarget {
    /// The accommodation as a whole (no room, or a tier without unit tracking).
    Accommodation(i64),
    Room(i64),
    /// A tier with tracked units; up to `units` bookings may overlap.
    Tier {
        accommodation_id: i64,
        name: String,
        units: i32,
    },
}

impl BookingTarget {
    /// Storage key identifying the target, e.g. `room:12` or `tier:3:Suite`.
    pub fn key(&self) -> String {
        match self {
            Self::Accommodation(id) => format!("accommodation:{id}"),
            Self::Room(id) => format!("room:{id}"),
            Self::Tier {
                accommodation_id,
                name,
                ..
            } => format!("tier:{accommodation_id}:{name}"),
        }
    }

    /// How many active bookings may cover the same night.
    pub fn concurrent_capacity(&self) -> usize {
        match self {
            Self::Tier { units, .. } => usize::try_from(*units).unwrap_or(0).max(1),
            _ => 1,
        }
    }
}

impl fmt::Display for BookingTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

/// A dated stay at an accommodation.
///
/// `nightly_rate` is frozen at creation; `total_price == nights() * nightly_rate`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Booking {
    pub id: i64,
    pub accommodation_id: i64,
    pub room_id: Option<i64>,
    pub room_type: Option<String>,
    pub target_key: String,
    pub check_in: NaiveDate,
    /// Exclusive: the checkout day is free for the next arrival.
    pub check_out: NaiveDate,
    pub guests: i32,
    pub nightly_rate: i64,
    pub total_price: i64,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    pub fn lifecycle(&self) -> LifecycleState {
        LifecycleState {
            status: self.status,
            payment_status: self.payment_status,
        }
    }

    /// True when `day` is one of the booked nights (`[check_in, check_out)`).
    pub fn occupies(&self, day: NaiveDate) -> bool {
        self.check_in <= day && day < self.check_out
    }

    /// Half-open overlap test against `[from, to)`.
    pub fn overlaps(&self, from: NaiveDate, to: NaiveDate) -> bool {
        self.check_in < to && self.check_out > from
    }
}

/// Fully resolved booking ready for insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub accommodation_id: i64,
    pub room_id: Option<i64>,
    pub room_type: Option<String>,
    pub target: BookingTarget,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: i32,
    pub nightly_rate: i64,
    pub total_price: i64,
    pub notes: Option<String>,
}

/// Filter criteria for booking listings.
#[derive(Debug, Clone, Default)]
pub struct BookingFilter {
    pub accommodation_id: Option<i64>,
    pub host_id: Option<i64>,
    pub status: Option<BookingStatus>,
    pub offset: i64,
    pub limit: i64,
}

impl BookingFilter {
    pub fn new(offset: i64, limit: i64) -> Self {
        Self {
            offset,
            limit,
            ..Self::default()
        }
    }

    pub fn with_accommodation(mut self, accommodation_id: Option<i64>) -> Self {
        self.accommodation_id = accommodation_id;
        self
    }

    pub fn with_host(mut self, host_id: Option<i64>) -> Self {
        self.host_id = host_id;
        self
    }

    pub fn with_status(mut self, status: Option<BookingStatus>) -> Self {
        self.status = status;
        self
    }

    /// Whether `booking` (owned by `host_id`) passes the non-paging criteria.
    pub fn matches(&self, booking: &Booking, host_id: i64) -> bool {
        self.accommodation_id
            .is_none_or(|id| id == booking.accommodation_id)
            && self.host_id.is_none_or(|id| id == host_id)
            && self.status.is_none_or(|s| s == booking.status)
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::{booking, date};
    use super::*;

    #[test]
    fn test_nights_and_occupancy_are_half_open() {
        let b = booking(1, date(2024, 6, 10), date(2024, 6, 15));

        assert_eq!(b.nights(), 5);
        assert!(b.occupies(date(2024, 6, 10)));
        assert!(b.occupies(date(2024, 6, 14)));
        assert!(!b.occupies(date(2024, 6, 15)));
        assert!(!b.occupies(date(2024, 6, 9)));
    }

    #[test]
    fn test_overlap_shares_boundary_day() {
        let b = booking(1, date(2024, 6, 10), date(2024, 6, 15));

        assert!(b.overlaps(date(2024, 6, 12), date(2024, 6, 18)));
        assert!(b.overlaps(date(2024, 6, 1), date(2024, 6, 11)));
        assert!(!b.overlaps(date(2024, 6, 15), date(2024, 6, 18)));
        assert!(!b.overlaps(date(2024, 6, 5), date(2024, 6, 10)));
    }

    #[test]
    fn test_target_keys() {
        assert_eq!(BookingTarget::Room(12).key(), "room:12");
        assert_eq!(BookingTarget::Accommodation(3).key(), "accommodation:3");
        let tier = BookingTarget::Tier {
            accommodation_id: 3,
            name: "Suite".to_string(),
            units: 4,
        };
        assert_eq!(tier.key(), "tier:3:Suite");
        assert_eq!(tier.concurrent_capacity(), 4);
        assert_eq!(BookingTarget::Room(1).concurrent_capacity(), 1);
    }

    #[test]
    fn test_only_pending_and_confirmed_are_active() {
        assert!(BookingStatus::Pending.is_active());
        assert!(BookingStatus::Confirmed.is_active());
        assert!(!BookingStatus::Cancelled.is_active());
    }

    #[test]
    fn test_filter_matches() {
        let b = booking(1, date(2024, 6, 10), date(2024, 6, 15));

        assert!(BookingFilter::new(0, 10).matches(&b, 9));
        assert!(
            BookingFilter::new(0, 10)
                .with_host(Some(9))
                .with_status(Some(BookingStatus::Pending))
                .matches(&b, 9)
        );
        assert!(!BookingFilter::new(0, 10).with_host(Some(8)).matches(&b, 9));
        assert!(
            !BookingFilter::new(0, 10)
                .with_accommodation(Some(2))
                .matches(&b, 9)
        );
    }
}
