mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use common::{RuleSpec, TestApp};
use serde_json::{json, Value};
use tower::ServiceExt;
use marketplace_backend::domain::models::storefront::Storefront;

async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

struct Fixture {
    storefront: Storefront,
    appointment_id: String,
}

async fn book_pending(app: &TestApp) -> Fixture {
    let sf = app.seed_storefront("UTC", "fixed").await;
    let svc = app.seed_service(&sf.id, 60, 0).await;
    app.seed_rule(&sf.id, RuleSpec::weekly(1, "09:00", "17:00")).await;

    let payload = json!({
        "client_id": "client-1",
        "storefront_id": sf.id,
        "service_id": svc.id,
        "start_datetime": "2030-01-07T10:00:00Z"
    });
    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/appointments")
            .header("Content-Type", "application/json")
            .body(Body::from(payload.to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;

    Fixture {
        storefront: sf,
        appointment_id: body["id"].as_str().unwrap().to_string(),
    }
}

async fn transition(app: &TestApp, appointment_id: &str, payload: Value) -> axum::response::Response {
    app.router.clone().oneshot(
        Request::builder().method("POST")
            .uri(format!("/api/v1/appointments/{}/transition", appointment_id))
            .header("Content-Type", "application/json")
            .body(Body::from(payload.to_string())).unwrap()
    ).await.unwrap()
}

#[tokio::test]
async fn test_vendor_confirms_with_times() {
    let app = TestApp::new().await;
    let fx = book_pending(&app).await;

    let res = transition(&app, &fx.appointment_id, json!({
        "actor_id": fx.storefront.vendor_id,
        "actor_role": "vendor",
        "new_status": "confirmed",
        "notes": "See you then",
        "confirmed_start_datetime": "2030-01-07T10:00:00Z",
        "confirmed_end_datetime": "2030-01-07T11:00:00Z"
    })).await;
    assert_eq!(res.status(), StatusCode::OK);

    let body = parse_body(res).await;
    assert_eq!(body["status"], "confirmed");
    assert_eq!(body["vendor_notes"], "See you then");
    assert_eq!(body["confirmed_start_datetime"], "2030-01-07T10:00:00Z");
    assert_eq!(body["confirmed_end_datetime"], "2030-01-07T11:00:00Z");
}

#[tokio::test]
async fn test_confirm_times_must_come_as_a_pair() {
    let app = TestApp::new().await;
    let fx = book_pending(&app).await;

    let res = transition(&app, &fx.appointment_id, json!({
        "actor_id": fx.storefront.vendor_id,
        "actor_role": "vendor",
        "new_status": "confirmed",
        "confirmed_start_datetime": "2030-01-07T10:00:00Z"
    })).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Inverted interval is also rejected.
    let res = transition(&app, &fx.appointment_id, json!({
        "actor_id": fx.storefront.vendor_id,
        "actor_role": "vendor",
        "new_status": "confirmed",
        "confirmed_start_datetime": "2030-01-07T11:00:00Z",
        "confirmed_end_datetime": "2030-01-07T10:00:00Z"
    })).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_client_cancels_own_appointment() {
    let app = TestApp::new().await;
    let fx = book_pending(&app).await;

    let res = transition(&app, &fx.appointment_id, json!({
        "actor_id": "client-1",
        "actor_role": "client",
        "new_status": "cancelled",
        "notes": "Cannot make it"
    })).await;
    assert_eq!(res.status(), StatusCode::OK);

    let body = parse_body(res).await;
    assert_eq!(body["status"], "cancelled");
    assert_eq!(body["client_notes"], "Cannot make it");
}

#[tokio::test]
async fn test_client_may_not_confirm_or_act_for_others() {
    let app = TestApp::new().await;
    let fx = book_pending(&app).await;

    let res = transition(&app, &fx.appointment_id, json!({
        "actor_id": "client-1",
        "actor_role": "client",
        "new_status": "confirmed"
    })).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // A different client cannot even cancel.
    let res = transition(&app, &fx.appointment_id, json!({
        "actor_id": "someone-else",
        "actor_role": "client",
        "new_status": "cancelled"
    })).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Same for an impostor vendor.
    let res = transition(&app, &fx.appointment_id, json!({
        "actor_id": "not-the-vendor",
        "actor_role": "vendor",
        "new_status": "confirmed"
    })).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_invalid_transitions_are_unprocessable() {
    let app = TestApp::new().await;
    let fx = book_pending(&app).await;

    // pending cannot skip to completed.
    let res = transition(&app, &fx.appointment_id, json!({
        "actor_id": fx.storefront.vendor_id,
        "actor_role": "vendor",
        "new_status": "completed"
    })).await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // Terminal states have no exits.
    let res = transition(&app, &fx.appointment_id, json!({
        "actor_id": fx.storefront.vendor_id,
        "actor_role": "vendor",
        "new_status": "declined"
    })).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = transition(&app, &fx.appointment_id, json!({
        "actor_id": fx.storefront.vendor_id,
        "actor_role": "vendor",
        "new_status": "confirmed"
    })).await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_full_confirmed_flow_to_completed() {
    let app = TestApp::new().await;
    let fx = book_pending(&app).await;

    let res = transition(&app, &fx.appointment_id, json!({
        "actor_id": fx.storefront.vendor_id,
        "actor_role": "vendor",
        "new_status": "confirmed"
    })).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = transition(&app, &fx.appointment_id, json!({
        "actor_id": fx.storefront.vendor_id,
        "actor_role": "vendor",
        "new_status": "completed"
    })).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(parse_body(res).await["status"], "completed");
}

#[tokio::test]
async fn test_unknown_status_and_role() {
    let app = TestApp::new().await;
    let fx = book_pending(&app).await;

    let res = transition(&app, &fx.appointment_id, json!({
        "actor_id": fx.storefront.vendor_id,
        "actor_role": "vendor",
        "new_status": "paused"
    })).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = transition(&app, &fx.appointment_id, json!({
        "actor_id": "admin-1",
        "actor_role": "admin",
        "new_status": "cancelled"
    })).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = transition(&app, "missing", json!({
        "actor_id": fx.storefront.vendor_id,
        "actor_role": "vendor",
        "new_status": "confirmed"
    })).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cancellation_frees_the_slot() {
    let app = TestApp::new().await;
    let fx = book_pending(&app).await;

    let res = transition(&app, &fx.appointment_id, json!({
        "actor_id": "client-1",
        "actor_role": "client",
        "new_status": "cancelled"
    })).await;
    assert_eq!(res.status(), StatusCode::OK);

    // The same slot can be booked again afterwards.
    let body = parse_body(app.router.clone().oneshot(
        Request::builder().method("GET")
            .uri(format!("/api/v1/appointments/{}", fx.appointment_id))
            .body(Body::empty()).unwrap()
    ).await.unwrap()).await;

    let payload = json!({
        "client_id": "client-2",
        "storefront_id": body["storefront_id"],
        "service_id": body["service_id"],
        "start_datetime": "2030-01-07T10:00:00Z"
    });
    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/appointments")
            .header("Content-Type", "application/json")
            .body(Body::from(payload.to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}
