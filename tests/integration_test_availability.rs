mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use common::{RuleSpec, TestApp};
use serde_json::Value;
use tower::ServiceExt;

async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn get_slots(app: &TestApp, storefront_id: &str, service_id: &str, query: &str) -> axum::response::Response {
    app.router.clone().oneshot(
        Request::builder().method("GET")
            .uri(format!("/api/v1/storefronts/{}/services/{}/slots?{}", storefront_id, service_id, query))
            .body(Body::empty()).unwrap()
    ).await.unwrap()
}

// 2030-01-07 is a Monday.
const MONDAY: &str = "2030-01-07";

#[tokio::test]
async fn test_standard_slot_grid() {
    let app = TestApp::new().await;
    let sf = app.seed_storefront("UTC", "fixed").await;
    let svc = app.seed_service(&sf.id, 30, 0).await;
    app.seed_rule(&sf.id, RuleSpec::weekly(1, "09:00", "17:00")).await;

    let res = get_slots(&app, &sf.id, &svc.id, &format!("start_date={}", MONDAY)).await;
    assert_eq!(res.status(), StatusCode::OK);

    let body = parse_body(res).await;
    assert_eq!(body["timezone"], "UTC");
    assert_eq!(body["service"]["duration_minutes"], 30);

    let slots = body["slots"].as_array().unwrap();
    assert_eq!(slots.len(), 16);
    assert_eq!(slots[0]["local_start_time"], "09:00");
    assert_eq!(slots[0]["local_end_time"], "09:30");
    assert_eq!(slots[0]["local_date"], MONDAY);
    assert_eq!(slots[0]["available_capacity"], 1);
    assert_eq!(slots[15]["local_start_time"], "16:30");
}

#[tokio::test]
async fn test_multi_day_range_and_default_end_date() {
    let app = TestApp::new().await;
    let sf = app.seed_storefront("UTC", "fixed").await;
    let svc = app.seed_service(&sf.id, 60, 0).await;
    app.seed_rule(&sf.id, RuleSpec::weekly(1, "09:00", "11:00")).await;
    app.seed_rule(&sf.id, RuleSpec::weekly(2, "09:00", "10:00")).await;

    // Monday + Tuesday: 2 + 1 slots.
    let res = get_slots(&app, &sf.id, &svc.id, &format!("start_date={}&end_date=2030-01-08", MONDAY)).await;
    let body = parse_body(res).await;
    assert_eq!(body["slots"].as_array().unwrap().len(), 3);

    // Omitting end_date means a single day.
    let res = get_slots(&app, &sf.id, &svc.id, &format!("start_date={}", MONDAY)).await;
    let body = parse_body(res).await;
    assert_eq!(body["slots"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_day_without_rules_has_no_slots() {
    let app = TestApp::new().await;
    let sf = app.seed_storefront("UTC", "fixed").await;
    let svc = app.seed_service(&sf.id, 30, 0).await;
    app.seed_rule(&sf.id, RuleSpec::weekly(1, "09:00", "17:00")).await;

    // 2030-01-09 is a Wednesday.
    let res = get_slots(&app, &sf.id, &svc.id, "start_date=2030-01-09").await;
    let body = parse_body(res).await;
    assert!(body["slots"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_range_validation() {
    let app = TestApp::new().await;
    let sf = app.seed_storefront("UTC", "fixed").await;
    let svc = app.seed_service(&sf.id, 30, 0).await;

    let res = get_slots(&app, &sf.id, &svc.id, "start_date=2030-01-07&end_date=2030-01-06").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // 32 days is one over the cap.
    let res = get_slots(&app, &sf.id, &svc.id, "start_date=2030-01-07&end_date=2030-02-07").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = get_slots(&app, &sf.id, &svc.id, "start_date=not-a-date").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_storefront_and_service() {
    let app = TestApp::new().await;
    let sf = app.seed_storefront("UTC", "fixed").await;
    let svc = app.seed_service(&sf.id, 30, 0).await;

    let res = get_slots(&app, "missing", &svc.id, &format!("start_date={}", MONDAY)).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = get_slots(&app, &sf.id, "missing", &format!("start_date={}", MONDAY)).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_service_mismatch_is_rejected() {
    let app = TestApp::new().await;
    let sf_a = app.seed_storefront("UTC", "fixed").await;
    let sf_b = app.seed_storefront("UTC", "fixed").await;
    let svc_b = app.seed_service(&sf_b.id, 30, 0).await;

    let res = get_slots(&app, &sf_a.id, &svc_b.id, &format!("start_date={}", MONDAY)).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_capacity_counts_bookings_across_services() {
    let app = TestApp::new().await;
    let sf = app.seed_storefront("UTC", "fixed").await;
    let svc_a = app.seed_service(&sf.id, 60, 0).await;
    let svc_b = app.seed_service(&sf.id, 60, 0).await;
    app.seed_rule(&sf.id, RuleSpec::weekly(1, "09:00", "11:00").capacity(2)).await;

    // A booking on service B occupies storefront capacity for service A too.
    let payload = serde_json::json!({
        "client_id": "client-1",
        "storefront_id": sf.id,
        "service_id": svc_b.id,
        "start_datetime": "2030-01-07T09:00:00Z"
    });
    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/appointments")
            .header("Content-Type", "application/json")
            .body(Body::from(payload.to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = get_slots(&app, &sf.id, &svc_a.id, &format!("start_date={}", MONDAY)).await;
    let body = parse_body(res).await;
    let slots = body["slots"].as_array().unwrap();
    assert_eq!(slots.len(), 2);
    assert_eq!(slots[0]["local_start_time"], "09:00");
    assert_eq!(slots[0]["available_capacity"], 1);
    assert_eq!(slots[1]["available_capacity"], 2);
}

#[tokio::test]
async fn test_buffer_strides_but_displays_duration_only() {
    let app = TestApp::new().await;
    let sf = app.seed_storefront("UTC", "fixed").await;
    let svc = app.seed_service(&sf.id, 45, 15).await;
    app.seed_rule(&sf.id, RuleSpec::weekly(1, "09:00", "11:00")).await;

    let res = get_slots(&app, &sf.id, &svc.id, &format!("start_date={}", MONDAY)).await;
    let body = parse_body(res).await;
    let slots = body["slots"].as_array().unwrap();

    assert_eq!(slots.len(), 2);
    assert_eq!(slots[0]["local_start_time"], "09:00");
    assert_eq!(slots[0]["local_end_time"], "09:45");
    assert_eq!(slots[1]["local_start_time"], "10:00");
}
