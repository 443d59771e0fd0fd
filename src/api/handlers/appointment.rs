use axum::{extract::{Path, State}, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::info;
use crate::api::dtos::requests::{CreateAppointmentRequest, TransitionAppointmentRequest};
use crate::domain::services::booking::BookingIntent;
use crate::domain::services::lifecycle;
use crate::error::AppError;
use crate::state::AppState;

pub async fn create_appointment(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateAppointmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let start = parse_datetime(&payload.start_datetime, "start_datetime")?;

    let created = state.booking.create_appointment(BookingIntent {
        client_id: payload.client_id,
        storefront_id: payload.storefront_id,
        service_id: payload.service_id,
        start,
        notes: payload.notes,
        location_type: payload.location_type,
        client_address: payload.client_address,
        drop_id: payload.drop_id,
    }).await?;

    Ok(Json(created))
}

pub async fn get_appointment(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let appointment = state.appointment_repo.find_by_id(&appointment_id).await?
        .ok_or(AppError::NotFound("Appointment not found".into()))?;
    Ok(Json(appointment))
}

pub async fn list_storefront_appointments(
    State(state): State<Arc<AppState>>,
    Path(storefront_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.storefront_repo.find_by_id(&storefront_id).await?
        .ok_or(AppError::NotFound("Storefront not found".into()))?;

    let appointments = state.appointment_repo.list_by_storefront(&storefront_id).await?;
    Ok(Json(appointments))
}

pub async fn transition_appointment(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<String>,
    Json(payload): Json<TransitionAppointmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let appointment = state.appointment_repo.find_by_id(&appointment_id).await?
        .ok_or(AppError::NotFound("Appointment not found".into()))?;

    // The actor must be a party to the appointment, not merely hold the role.
    match payload.actor_role.as_str() {
        "client" => {
            if payload.actor_id != appointment.client_id {
                return Err(AppError::Forbidden("Appointment belongs to a different client".into()));
            }
        }
        "vendor" => {
            let storefront = state.storefront_repo.find_by_id(&appointment.storefront_id).await?
                .ok_or(AppError::Internal)?;
            if payload.actor_id != storefront.vendor_id {
                return Err(AppError::Forbidden("Appointment belongs to a different vendor".into()));
            }
        }
        other => return Err(AppError::Forbidden(format!("Unknown actor role '{}'", other))),
    }

    let confirmed_start = payload.confirmed_start_datetime.as_deref()
        .map(|raw| parse_datetime(raw, "confirmed_start_datetime"))
        .transpose()?;
    let confirmed_end = payload.confirmed_end_datetime.as_deref()
        .map(|raw| parse_datetime(raw, "confirmed_end_datetime"))
        .transpose()?;

    let patch = lifecycle::build_transition_patch(
        &appointment,
        &payload.actor_role,
        &payload.new_status,
        payload.notes,
        confirmed_start,
        confirmed_end,
    )?;

    let updated = state.appointment_repo.update(&appointment_id, &patch).await?;
    info!(
        "Appointment {} transitioned {} -> {} by {}",
        updated.id, appointment.status, updated.status, payload.actor_role
    );
    Ok(Json(updated))
}

fn parse_datetime(raw: &str, field: &str) -> Result<DateTime<Utc>, AppError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| AppError::Validation(format!("{} must be an RFC 3339 datetime", field)))
}
