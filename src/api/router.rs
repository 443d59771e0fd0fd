use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{appointment, availability, health, schedule_rule};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Availability (public read side)
        .route("/api/v1/storefronts/{storefront_id}/services/{service_id}/slots", get(availability::get_slots))
        .route("/api/v1/storefronts/{storefront_id}/services/{service_id}/slots/check", get(availability::check_slot))

        // Schedule rules (vendor side)
        .route("/api/v1/storefronts/{storefront_id}/rules", get(schedule_rule::list_rules).post(schedule_rule::create_rule))
        .route("/api/v1/storefronts/{storefront_id}/rules/{rule_id}", put(schedule_rule::update_rule).delete(schedule_rule::delete_rule))

        // Appointments
        .route("/api/v1/appointments", post(appointment::create_appointment))
        .route("/api/v1/appointments/{appointment_id}", get(appointment::get_appointment))
        .route("/api/v1/appointments/{appointment_id}/transition", post(appointment::transition_appointment))
        .route("/api/v1/storefronts/{storefront_id}/appointments", get(appointment::list_storefront_appointments))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}
