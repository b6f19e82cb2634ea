//! DTOs for commission configuration and records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};
use validator::Validate;

use crate::api::dto::pagination::PaginationParams;
use crate::application::services::RateSnapshot;
use crate::domain::commission::CommissionRate;
use crate::domain::entities::CommissionStatus;
use chrono::{DateTime, Utc};

/// Current commission rate.
///
/// ```json
/// { "rate": 10.0, "version": 3, "changed_at": "2024-06-01T09:00:00Z", "source": "audit_log" }
/// ```
#[derive(Debug, Serialize)]
pub struct RateResponse {
    pub rate: CommissionRate,
    pub version: Option<i64>,
    pub changed_at: Option<DateTime<Utc>>,
    pub source: &'static str,
}

impl From<RateSnapshot> for RateResponse {
    fn from(snapshot: RateSnapshot) -> Self {
        let source = if snapshot.version.is_some() {
            "audit_log"
        } else {
            "default"
        };

        Self {
            rate: snapshot.rate,
            version: snapshot.version,
            changed_at: snapshot.changed_at,
            source,
        }
    }
}

/// Range checking happens in the service so that an out-of-range rate
/// surfaces as `invalid_rate` rather than a generic validation error.
#[derive(Debug, Deserialize, Validate)]
pub struct SetRateRequest {
    pub rate: Decimal,

    #[validate(length(max = 500))]
    pub note: Option<String>,
}

/// Query parameters for `GET /api/commissions`.
#[serde_as]
#[derive(Debug, Deserialize)]
pub struct CommissionListParams {
    #[serde(flatten)]
    pub pagination: PaginationParams,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub status: Option<CommissionStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_rate_response_source() {
        let snapshot = RateSnapshot {
            rate: CommissionRate::new(dec!(10)).unwrap(),
            version: None,
            changed_at: None,
        };
        assert_eq!(RateResponse::from(snapshot).source, "default");

        let snapshot = RateSnapshot {
            rate: CommissionRate::new(dec!(15)).unwrap(),
            version: Some(2),
            changed_at: Some(Utc::now()),
        };
        assert_eq!(RateResponse::from(snapshot).source, "audit_log");
    }

    #[test]
    fn test_set_rate_accepts_fractional_rates() {
        let request: SetRateRequest = serde_json::from_str(r#"{"rate": 12.5}"#).unwrap();
        assert_eq!(request.rate, dec!(12.5));
        assert!(request.note.is_none());
    }
}
