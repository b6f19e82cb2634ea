//! DTOs for host calendar views.

use chrono::NaiveDate;
use serde::Deserialize;

/// Query parameters for `GET /api/hosts/{id}/overview`.
#[derive(Debug, Default, Deserialize)]
pub struct OverviewQuery {
    /// Reference day for the windows; defaults to the server's current date.
    pub today: Option<NaiveDate>,
}
