mod common;

use serde_json::Value;

#[tokio::test]
async fn test_health_reports_memory_storage() {
    let server = common::make_server(common::create_memory_state());

    let response = server.get("/health").await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["storage"], "memory");
    assert_eq!(json["checks"]["database"]["status"], "ok");
    assert_eq!(json["checks"]["commission_rate"]["status"], "ok");
    assert!(json.get("version").is_some());
}
