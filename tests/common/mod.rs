#![allow(dead_code)]

use axum_test::TestServer;
use chrono::NaiveDate;
use rust_decimal_macros::dec;
use serde_json::{Value, json};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use stay_booking::domain::commission::CommissionRate;
use stay_booking::domain::lifecycle::RefundPolicy;
use stay_booking::prelude::*;
use stay_booking::routes::unthrottled_router;

/// "Today" for every test state.
pub fn today() -> NaiveDate {
    date(2024, 6, 1)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn policies() -> Policies {
    Policies {
        default_commission_rate: CommissionRate::new(dec!(10)).unwrap(),
        refund_policy: RefundPolicy::Automatic,
    }
}

pub fn create_memory_state() -> AppState {
    let store = Arc::new(MemoryStore::new(Duration::from_secs(2)));
    AppState::new(
        Repositories::memory(store),
        Arc::new(FixedClock::on(today())),
        policies(),
    )
}

pub fn create_pg_state(pool: PgPool) -> AppState {
    AppState::new(
        Repositories::postgres(Arc::new(pool), Duration::from_secs(2)),
        Arc::new(FixedClock::on(today())),
        policies(),
    )
}

pub fn make_server(state: AppState) -> TestServer {
    TestServer::new(unthrottled_router(state)).unwrap()
}

/// Registers an accommodation and returns its id.
pub async fn create_accommodation(server: &TestServer, base_rate: i64, max_guests: i32) -> i64 {
    let response = server
        .post("/api/accommodations")
        .json(&json!({
            "host_id": 9,
            "name": "Seaside Hanok",
            "city": "Busan",
            "base_rate": base_rate,
            "max_guests": max_guests
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<Value>()["id"].as_i64().unwrap()
}

pub async fn create_room(
    server: &TestServer,
    accommodation_id: i64,
    capacity: i32,
    nightly_rate: i64,
) -> i64 {
    let response = server
        .post(&format!("/api/accommodations/{accommodation_id}/rooms"))
        .json(&json!({
            "name": "Ondol room",
            "capacity": capacity,
            "nightly_rate": nightly_rate
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<Value>()["id"].as_i64().unwrap()
}

pub async fn book(
    server: &TestServer,
    body: Value,
) -> axum_test::TestResponse {
    server.post("/api/bookings").json(&body).await
}
