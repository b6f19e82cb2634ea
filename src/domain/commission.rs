//! Commission arithmetic.
//!
//! The split is computed once from a booking total and a snapshotted rate:
//! `commission = round(total * rate / 100)` (half away from zero) and
//! `host = total - commission`, so the two always sum to the booking amount.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::Serialize;
use serde_json::json;
use std::fmt;

use crate::domain::entities::NewCommissionRecord;
use crate::error::AppError;

/// A commission percentage validated to lie in `[0, 100]` with at most
/// [`CommissionRate::MAX_SCALE`] decimal places, the precision it is stored at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CommissionRate(Decimal);

impl CommissionRate {
    pub const MIN: Decimal = dec!(0);
    pub const MAX: Decimal = dec!(100);
    pub const MAX_SCALE: u32 = 4;

    /// # Errors
    ///
    /// Returns [`AppError::InvalidRate`] if `percent` is outside `[0, 100]` or
    /// has more than [`Self::MAX_SCALE`] decimal places.
    pub fn new(percent: Decimal) -> Result<Self, AppError> {
        if percent < Self::MIN || percent > Self::MAX {
            return Err(AppError::invalid_rate(
                "Commission rate must be between 0 and 100",
                json!({ "rate": percent.to_string() }),
            ));
        }
        let percent = percent.normalize();
        if percent.scale() > Self::MAX_SCALE {
            return Err(AppError::invalid_rate(
                format!(
                    "Commission rate allows at most {} decimal places",
                    Self::MAX_SCALE
                ),
                json!({ "rate": percent.to_string() }),
            ));
        }
        Ok(Self(percent))
    }

    pub fn percent(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for CommissionRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Platform/host split of a booking total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommissionSplit {
    pub commission_amount: i64,
    pub host_amount: i64,
}

/// Splits `total` at `rate`.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if the amount cannot be represented.
pub fn split(total: i64, rate: CommissionRate) -> Result<CommissionSplit, AppError> {
    let commission = (Decimal::from(total) * rate.percent() / dec!(100))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or_else(|| {
            AppError::internal(
                "Commission amount out of range",
                json!({ "total": total, "rate": rate.percent().to_string() }),
            )
        })?;

    Ok(CommissionSplit {
        commission_amount: commission,
        host_amount: total - commission,
    })
}

/// Builds the immutable record for `booking_id` from a rate snapshot.
///
/// # Errors
///
/// See [`split`].
pub fn new_record(
    booking_id: i64,
    booking_amount: i64,
    snapshot: CommissionRate,
) -> Result<NewCommissionRecord, AppError> {
    let split = split(booking_amount, snapshot)?;
    Ok(NewCommissionRecord {
        booking_id,
        booking_amount,
        commission_rate: snapshot.percent(),
        commission_amount: split.commission_amount,
        host_amount: split.host_amount,
    })
}
