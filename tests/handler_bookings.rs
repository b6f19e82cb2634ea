mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};

fn booking_body(room_id: i64, accommodation_id: i64, check_in: &str, check_out: &str) -> Value {
    json!({
        "accommodation_id": accommodation_id,
        "room_id": room_id,
        "check_in": check_in,
        "check_out": check_out,
        "guests": 2
    })
}

// ─── CREATE ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_booking_quotes_room_rate() {
    let server = common::make_server(common::create_memory_state());
    let acc = common::create_accommodation(&server, 50_000, 4).await;
    let room = common::create_room(&server, acc, 2, 70_000).await;

    let response = common::book(&server, booking_body(room, acc, "2024-06-10", "2024-06-13")).await;

    response.assert_status(StatusCode::CREATED);
    let json = response.json::<Value>();
    assert_eq!(json["status"], "pending");
    assert_eq!(json["payment_status"], "pending");
    assert_eq!(json["nights"], 3);
    assert_eq!(json["nightly_rate"], 70_000);
    assert_eq!(json["total_price"], 210_000);
    assert_eq!(json["target_key"], format!("room:{room}"));
}

#[tokio::test]
async fn test_overlap_and_checkout_day_turnover() {
    let server = common::make_server(common::create_memory_state());
    let acc = common::create_accommodation(&server, 50_000, 4).await;
    let room = common::create_room(&server, acc, 2, 70_000).await;

    common::book(&server, booking_body(room, acc, "2024-06-10", "2024-06-13"))
        .await
        .assert_status(StatusCode::CREATED);

    let overlapping = common::book(&server, booking_body(room, acc, "2024-06-12", "2024-06-14")).await;
    overlapping.assert_status(StatusCode::CONFLICT);
    assert_eq!(overlapping.json::<Value>()["error"]["code"], "overlap");

    common::book(&server, booking_body(room, acc, "2024-06-13", "2024-06-15"))
        .await
        .assert_status(StatusCode::CREATED);
}

#[tokio::test]
async fn test_confirmed_booking_blocks_overlap_and_allows_turnover() {
    let server = common::make_server(common::create_memory_state());
    let acc = common::create_accommodation(&server, 50_000, 4).await;
    let room = common::create_room(&server, acc, 2, 70_000).await;

    let created = common::book(&server, booking_body(room, acc, "2024-06-10", "2024-06-15")).await;
    created.assert_status(StatusCode::CREATED);
    let id = created.json::<Value>()["id"].as_i64().unwrap();

    let confirmed = server
        .post(&format!("/api/bookings/{id}/transition"))
        .json(&json!({ "action": "confirm" }))
        .await;
    confirmed.assert_status_ok();
    assert_eq!(confirmed.json::<Value>()["status"], "confirmed");

    let overlapping = common::book(&server, booking_body(room, acc, "2024-06-12", "2024-06-18")).await;
    overlapping.assert_status(StatusCode::CONFLICT);
    let error = overlapping.json::<Value>();
    assert_eq!(error["error"]["code"], "overlap");

    let turnover = common::book(&server, booking_body(room, acc, "2024-06-15", "2024-06-18")).await;
    turnover.assert_status(StatusCode::CREATED);
    assert_eq!(turnover.json::<Value>()["total_price"], 210_000);
}

#[tokio::test]
async fn test_other_room_is_independent() {
    let server = common::make_server(common::create_memory_state());
    let acc = common::create_accommodation(&server, 50_000, 4).await;
    let first = common::create_room(&server, acc, 2, 70_000).await;
    let second = common::create_room(&server, acc, 2, 70_000).await;

    common::book(&server, booking_body(first, acc, "2024-06-10", "2024-06-13"))
        .await
        .assert_status(StatusCode::CREATED);
    common::book(&server, booking_body(second, acc, "2024-06-10", "2024-06-13"))
        .await
        .assert_status(StatusCode::CREATED);
}

#[tokio::test]
async fn test_same_day_stay_is_invalid_date_range() {
    let server = common::make_server(common::create_memory_state());
    let acc = common::create_accommodation(&server, 50_000, 4).await;
    let room = common::create_room(&server, acc, 2, 70_000).await;

    let response = common::book(&server, booking_body(room, acc, "2024-06-10", "2024-06-10")).await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.json::<Value>()["error"]["code"], "invalid_date_range");
}

#[tokio::test]
async fn test_check_in_in_the_past_is_rejected() {
    let server = common::make_server(common::create_memory_state());
    let acc = common::create_accommodation(&server, 50_000, 4).await;

    let response = common::book(
        &server,
        json!({
            "accommodation_id": acc,
            "check_in": "2024-05-30",
            "check_out": "2024-06-02",
            "guests": 1
        }),
    )
    .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.json::<Value>()["error"]["code"], "invalid_date_range");
}

#[tokio::test]
async fn test_capacity_exceeded_is_distinct_from_overlap() {
    let server = common::make_server(common::create_memory_state());
    let acc = common::create_accommodation(&server, 50_000, 4).await;
    let room = common::create_room(&server, acc, 2, 70_000).await;

    let mut body = booking_body(room, acc, "2024-06-10", "2024-06-12");
    body["guests"] = json!(3);
    let response = common::book(&server, body).await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.json::<Value>()["error"]["code"], "capacity_exceeded");
}

#[tokio::test]
async fn test_room_and_room_type_together_is_bad_request() {
    let server = common::make_server(common::create_memory_state());
    let acc = common::create_accommodation(&server, 50_000, 4).await;
    let room = common::create_room(&server, acc, 2, 70_000).await;

    let mut body = booking_body(room, acc, "2024-06-10", "2024-06-12");
    body["room_type"] = json!("Suite");
    let response = common::book(&server, body).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"]["code"], "validation_error");
}

#[tokio::test]
async fn test_unknown_accommodation_is_not_found() {
    let server = common::make_server(common::create_memory_state());

    let response = common::book(
        &server,
        json!({
            "accommodation_id": 999,
            "check_in": "2024-06-10",
            "check_out": "2024-06-12",
            "guests": 1
        }),
    )
    .await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn test_tracked_tier_allows_one_booking_per_unit() {
    let server = common::make_server(common::create_memory_state());
    let acc = common::create_accommodation(&server, 50_000, 4).await;

    server
        .post(&format!("/api/accommodations/{acc}/room-types"))
        .json(&json!({ "name": "Suite", "nightly_rate": 120_000, "available_units": 2 }))
        .await
        .assert_status(StatusCode::CREATED);

    let body = json!({
        "accommodation_id": acc,
        "room_type": "Suite",
        "check_in": "2024-06-10",
        "check_out": "2024-06-12",
        "guests": 2
    });

    let first = common::book(&server, body.clone()).await;
    first.assert_status(StatusCode::CREATED);
    assert_eq!(first.json::<Value>()["total_price"], 240_000);

    common::book(&server, body.clone()).await.assert_status(StatusCode::CREATED);
    common::book(&server, body).await.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_rate_change_applies_to_new_bookings_only() {
    let server = common::make_server(common::create_memory_state());
    let acc = common::create_accommodation(&server, 50_000, 4).await;
    let room = common::create_room(&server, acc, 2, 70_000).await;

    let created = common::book(&server, booking_body(room, acc, "2024-06-10", "2024-06-12")).await;
    let id = created.json::<Value>()["id"].as_i64().unwrap();

    let updated = server
        .patch(&format!("/api/rooms/{room}/rate"))
        .json(&json!({ "nightly_rate": 80_000 }))
        .await;
    updated.assert_status_ok();
    assert_eq!(updated.json::<Value>()["nightly_rate"], 80_000);

    let second = common::book(&server, booking_body(room, acc, "2024-06-20", "2024-06-22")).await;
    assert_eq!(second.json::<Value>()["total_price"], 160_000);

    let first = server.get(&format!("/api/bookings/{id}")).await;
    assert_eq!(first.json::<Value>()["total_price"], 140_000);
}

#[tokio::test]
async fn test_zero_rate_update_is_bad_request() {
    let server = common::make_server(common::create_memory_state());
    let acc = common::create_accommodation(&server, 50_000, 4).await;

    server
        .patch(&format!("/api/accommodations/{acc}/rate"))
        .json(&json!({ "nightly_rate": 0 }))
        .await
        .assert_status_bad_request();
}

// ─── LIFECYCLE ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_cancel_frees_dates_and_second_cancel_is_invalid() {
    let server = common::make_server(common::create_memory_state());
    let acc = common::create_accommodation(&server, 50_000, 4).await;
    let room = common::create_room(&server, acc, 2, 70_000).await;

    let created = common::book(&server, booking_body(room, acc, "2024-06-10", "2024-06-13")).await;
    let id = created.json::<Value>()["id"].as_i64().unwrap();

    let cancelled = server
        .post(&format!("/api/bookings/{id}/transition"))
        .json(&json!({ "action": "cancel" }))
        .await;
    cancelled.assert_status_ok();
    assert_eq!(cancelled.json::<Value>()["status"], "cancelled");

    server
        .post(&format!("/api/bookings/{id}/transition"))
        .json(&json!({ "action": "cancel" }))
        .await
        .assert_status(StatusCode::CONFLICT);

    common::book(&server, booking_body(room, acc, "2024-06-11", "2024-06-12"))
        .await
        .assert_status(StatusCode::CREATED);
}

#[tokio::test]
async fn test_confirm_unknown_booking_is_not_found() {
    let server = common::make_server(common::create_memory_state());

    server
        .post("/api/bookings/4242/transition")
        .json(&json!({ "action": "confirm" }))
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_payment_creates_commission_snapshot() {
    let server = common::make_server(common::create_memory_state());
    let acc = common::create_accommodation(&server, 50_000, 4).await;
    let room = common::create_room(&server, acc, 2, 70_000).await;

    let created = common::book(&server, booking_body(room, acc, "2024-06-10", "2024-06-13")).await;
    let id = created.json::<Value>()["id"].as_i64().unwrap();

    server
        .get(&format!("/api/bookings/{id}/commission"))
        .await
        .assert_status_not_found();

    let paid = server
        .post(&format!("/api/bookings/{id}/payment"))
        .json(&json!({ "outcome": "paid" }))
        .await;
    paid.assert_status_ok();
    assert_eq!(paid.json::<Value>()["payment_status"], "paid");

    let commission = server.get(&format!("/api/bookings/{id}/commission")).await;
    commission.assert_status_ok();
    let record = commission.json::<Value>();
    assert_eq!(record["booking_amount"], 210_000);
    assert_eq!(record["commission_amount"], 21_000);
    assert_eq!(record["host_amount"], 189_000);
    assert_eq!(record["status"], "pending");

    server
        .put("/api/commission-rate")
        .json(&json!({ "rate": 15 }))
        .await
        .assert_status_ok();

    // Repeated payment event and a later rate change leave the record alone.
    server
        .post(&format!("/api/bookings/{id}/payment"))
        .json(&json!({ "outcome": "paid" }))
        .await
        .assert_status_ok();

    let again = server
        .get(&format!("/api/bookings/{id}/commission"))
        .await
        .json::<Value>();
    assert_eq!(again["id"], record["id"]);
    assert_eq!(again["commission_amount"], 21_000);
    assert_eq!(again["commission_rate"].as_f64(), Some(10.0));
}

#[tokio::test]
async fn test_cancel_paid_booking_refunds_and_cancels_commission() {
    let server = common::make_server(common::create_memory_state());
    let acc = common::create_accommodation(&server, 50_000, 4).await;
    let room = common::create_room(&server, acc, 2, 70_000).await;

    let created = common::book(&server, booking_body(room, acc, "2024-06-10", "2024-06-12")).await;
    let id = created.json::<Value>()["id"].as_i64().unwrap();

    server
        .post(&format!("/api/bookings/{id}/payment"))
        .json(&json!({ "outcome": "paid" }))
        .await
        .assert_status_ok();

    let cancelled = server
        .post(&format!("/api/bookings/{id}/transition"))
        .json(&json!({ "action": "cancel" }))
        .await;
    cancelled.assert_status_ok();
    let json = cancelled.json::<Value>();
    assert_eq!(json["status"], "cancelled");
    assert_eq!(json["payment_status"], "refunded");

    let commission = server
        .get(&format!("/api/bookings/{id}/commission"))
        .await
        .json::<Value>();
    assert_eq!(commission["status"], "cancelled");
}

// ─── LIST ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_bookings_is_paged_newest_first() {
    let server = common::make_server(common::create_memory_state());
    let acc = common::create_accommodation(&server, 50_000, 4).await;
    let room = common::create_room(&server, acc, 2, 70_000).await;

    for (check_in, check_out) in [
        ("2024-06-10", "2024-06-11"),
        ("2024-06-11", "2024-06-12"),
        ("2024-06-12", "2024-06-13"),
    ] {
        common::book(&server, booking_body(room, acc, check_in, check_out))
            .await
            .assert_status(StatusCode::CREATED);
    }

    let response = server
        .get("/api/bookings")
        .add_query_param("page_size", 2)
        .add_query_param("accommodation_id", acc)
        .await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    let items = json["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["check_in"], "2024-06-12");
    assert_eq!(json["pagination"]["total_items"], 3);
    assert_eq!(json["pagination"]["last_page"], 2);
}

#[tokio::test]
async fn test_list_bookings_rejects_oversized_page() {
    let server = common::make_server(common::create_memory_state());

    server
        .get("/api/bookings")
        .add_query_param("page_size", 101)
        .await
        .assert_status_bad_request();
}
