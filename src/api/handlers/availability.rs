use axum::{extract::{Path, Query, State}, response::IntoResponse, Json};
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;
use crate::api::dtos::requests::{CheckSlotQuery, SlotsQuery};
use crate::api::dtos::responses::{ServiceSummary, SlotsResponse};
use crate::error::AppError;
use crate::state::AppState;

pub async fn get_slots(
    State(state): State<Arc<AppState>>,
    Path((storefront_id, service_id)): Path<(String, String)>,
    Query(params): Query<SlotsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let start_date = parse_date(&params.start_date)?;
    let end_date = match params.end_date {
        Some(ref raw) => parse_date(raw)?,
        None => start_date,
    };

    let listing = state.availability
        .get_available_slots(&storefront_id, &service_id, start_date, end_date)
        .await?;

    Ok(Json(SlotsResponse {
        timezone: listing.timezone,
        service: ServiceSummary::from(&listing.service),
        slots: listing.slots,
    }))
}

pub async fn check_slot(
    State(state): State<Arc<AppState>>,
    Path((storefront_id, service_id)): Path<(String, String)>,
    Query(params): Query<CheckSlotQuery>,
) -> Result<impl IntoResponse, AppError> {
    let start = DateTime::parse_from_rfc3339(&params.start_datetime)
        .map_err(|_| AppError::Validation("start_datetime must be an RFC 3339 datetime".into()))?
        .with_timezone(&Utc);
    let end = match params.end_datetime {
        Some(ref raw) => Some(
            DateTime::parse_from_rfc3339(raw)
                .map_err(|_| AppError::Validation("end_datetime must be an RFC 3339 datetime".into()))?
                .with_timezone(&Utc),
        ),
        None => None,
    };

    let check = state.availability
        .is_slot_available(&storefront_id, &service_id, start, end)
        .await?;

    Ok(Json(check))
}

fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid date format (expected YYYY-MM-DD)".into()))
}
