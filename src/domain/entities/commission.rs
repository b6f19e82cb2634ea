//! Commission record and commission-rate audit entities.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Settlement status of a commission record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommissionStatus {
    Pending,
    Paid,
    Cancelled,
}

impl CommissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for CommissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(format!("unknown commission status '{other}'")),
        }
    }
}

/// Platform/host revenue split frozen at the first successful payment.
///
/// Only `status` ever changes after creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommissionRecord {
    pub id: i64,
    pub booking_id: i64,
    pub booking_amount: i64,
    /// Percentage snapshotted when the record was created.
    pub commission_rate: Decimal,
    pub commission_amount: i64,
    pub host_amount: i64,
    pub status: CommissionStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewCommissionRecord {
    pub booking_id: i64,
    pub booking_amount: i64,
    pub commission_rate: Decimal,
    pub commission_amount: i64,
    pub host_amount: i64,
}

/// Commission write applied together with a booking lifecycle update.
///
/// Applied in the same unit as the status change: a refunded booking never
/// keeps a pending commission and a paid booking always has a record.
#[derive(Debug, Clone, PartialEq)]
pub enum CommissionEffect {
    None,
    /// Create the record unless the booking already has one.
    Record(NewCommissionRecord),
    /// Cancel the booking's record if it is still pending.
    Cancel,
}

/// One entry of the commission-rate audit log. The latest entry is the current rate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommissionRateChange {
    /// Monotonic version of the rate configuration.
    pub id: i64,
    pub previous_rate: Option<Decimal>,
    pub rate: Decimal,
    pub note: Option<String>,
    pub changed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commission_status_parse() {
        assert_eq!("paid".parse(), Ok(CommissionStatus::Paid));
        assert_eq!(CommissionStatus::Cancelled.to_string(), "cancelled");
        assert!("settled".parse::<CommissionStatus>().is_err());
    }
}
