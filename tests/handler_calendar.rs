mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};

#[tokio::test]
async fn test_calendar_marks_booked_nights() {
    let server = common::make_server(common::create_memory_state());
    let acc = common::create_accommodation(&server, 50_000, 4).await;
    let room = common::create_room(&server, acc, 2, 70_000).await;

    common::book(
        &server,
        json!({
            "accommodation_id": acc,
            "room_id": room,
            "check_in": "2024-06-10",
            "check_out": "2024-06-12",
            "guests": 2
        }),
    )
    .await
    .assert_status(StatusCode::CREATED);

    let response = server
        .get(&format!("/api/accommodations/{acc}/calendar"))
        .add_query_param("room_id", room)
        .add_query_param("start_date", "2024-06-09")
        .add_query_param("end_date", "2024-06-12")
        .await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    let statuses: Vec<&str> = json["days"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["status"].as_str().unwrap())
        .collect();
    assert_eq!(statuses, vec!["available", "occupied", "occupied", "available"]);

    // Whole-accommodation calendar is a different target.
    let whole = server
        .get(&format!("/api/accommodations/{acc}/calendar"))
        .add_query_param("start_date", "2024-06-10")
        .add_query_param("end_date", "2024-06-10")
        .await
        .json::<Value>();
    assert_eq!(whole["days"][0]["status"], "available");
}

#[tokio::test]
async fn test_calendar_window_limits() {
    let server = common::make_server(common::create_memory_state());
    let acc = common::create_accommodation(&server, 50_000, 4).await;

    server
        .get(&format!("/api/accommodations/{acc}/calendar"))
        .add_query_param("start_date", "2024-06-10")
        .add_query_param("end_date", "2024-06-09")
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    server
        .get(&format!("/api/accommodations/{acc}/calendar"))
        .add_query_param("start_date", "2024-06-01")
        .add_query_param("end_date", "2025-06-02")
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let single = server
        .get(&format!("/api/accommodations/{acc}/calendar"))
        .add_query_param("start_date", "2024-06-10")
        .add_query_param("end_date", "2024-06-10")
        .await;
    single.assert_status_ok();
    assert_eq!(single.json::<Value>()["days"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_maintenance_day_blocks_booking() {
    let server = common::make_server(common::create_memory_state());
    let acc = common::create_accommodation(&server, 50_000, 4).await;
    let room = common::create_room(&server, acc, 2, 70_000).await;

    let set = server
        .put(&format!("/api/accommodations/{acc}/calendar/2024-06-11"))
        .json(&json!({ "room_id": room, "maintenance": true }))
        .await;
    set.assert_status_ok();
    assert_eq!(set.json::<Value>()["maintenance"], true);

    let body = json!({
        "accommodation_id": acc,
        "room_id": room,
        "check_in": "2024-06-10",
        "check_out": "2024-06-12",
        "guests": 1
    });
    let blocked = common::book(&server, body.clone()).await;
    blocked.assert_status(StatusCode::CONFLICT);
    assert_eq!(blocked.json::<Value>()["error"]["code"], "overlap");

    // Checking out on the maintenance day is fine.
    common::book(
        &server,
        json!({
            "accommodation_id": acc,
            "room_id": room,
            "check_in": "2024-06-09",
            "check_out": "2024-06-11",
            "guests": 1
        }),
    )
    .await
    .assert_status(StatusCode::CREATED);

    server
        .delete(&format!("/api/accommodations/{acc}/calendar/2024-06-11"))
        .add_query_param("room_id", room)
        .await
        .assert_status(StatusCode::NO_CONTENT);

    server
        .delete(&format!("/api/accommodations/{acc}/calendar/2024-06-11"))
        .add_query_param("room_id", room)
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_price_override_is_display_only() {
    let server = common::make_server(common::create_memory_state());
    let acc = common::create_accommodation(&server, 50_000, 4).await;

    server
        .put(&format!("/api/accommodations/{acc}/calendar/2024-06-10"))
        .json(&json!({ "price": 99_000 }))
        .await
        .assert_status_ok();

    let calendar = server
        .get(&format!("/api/accommodations/{acc}/calendar"))
        .add_query_param("start_date", "2024-06-10")
        .add_query_param("end_date", "2024-06-10")
        .await
        .json::<Value>();
    assert_eq!(calendar["days"][0]["price"], 99_000);
    assert_eq!(calendar["days"][0]["status"], "available");

    let booking = common::book(
        &server,
        json!({
            "accommodation_id": acc,
            "check_in": "2024-06-10",
            "check_out": "2024-06-11",
            "guests": 1
        }),
    )
    .await;
    booking.assert_status(StatusCode::CREATED);
    assert_eq!(booking.json::<Value>()["total_price"], 50_000);
}

#[tokio::test]
async fn test_host_overview_and_day_view() {
    let server = common::make_server(common::create_memory_state());
    let acc = common::create_accommodation(&server, 50_000, 4).await;
    let room = common::create_room(&server, acc, 2, 70_000).await;

    for (check_in, check_out) in [("2024-06-03", "2024-06-05"), ("2024-07-10", "2024-07-12")] {
        common::book(
            &server,
            json!({
                "accommodation_id": acc,
                "room_id": room,
                "check_in": check_in,
                "check_out": check_out,
                "guests": 1
            }),
        )
        .await
        .assert_status(StatusCode::CREATED);
    }

    let overview = server.get("/api/hosts/9/overview").await;
    overview.assert_status_ok();
    let json = overview.json::<Value>();
    assert_eq!(json["week"].as_array().unwrap().len(), 1);
    assert_eq!(json["month"].as_array().unwrap().len(), 1);
    assert_eq!(json["two_months"].as_array().unwrap().len(), 1);
    assert!(json["history"].as_array().unwrap().is_empty());

    let later = server
        .get("/api/hosts/9/overview")
        .add_query_param("today", "2024-08-01")
        .await
        .json::<Value>();
    assert_eq!(later["history"].as_array().unwrap().len(), 2);

    let day = server.get("/api/hosts/9/day/2024-06-04").await.json::<Value>();
    assert_eq!(day["count"], 1);

    let checkout_day = server.get("/api/hosts/9/day/2024-06-05").await.json::<Value>();
    assert_eq!(checkout_day["count"], 0);

    let other_host = server.get("/api/hosts/10/overview").await.json::<Value>();
    assert!(other_host["week"].as_array().unwrap().is_empty());
}
