use axum::{extract::{Path, State}, response::IntoResponse, Json};
use chrono::NaiveTime;
use std::sync::Arc;
use tracing::info;
use crate::api::dtos::requests::{CreateScheduleRuleRequest, UpdateScheduleRuleRequest};
use crate::domain::models::schedule_rule::{NewScheduleRuleParams, ScheduleRule, ScheduleRulePatch};
use crate::error::AppError;
use crate::state::AppState;

pub async fn create_rule(
    State(state): State<Arc<AppState>>,
    Path(storefront_id): Path<String>,
    Json(payload): Json<CreateScheduleRuleRequest>,
) -> Result<impl IntoResponse, AppError> {
    state.storefront_repo.find_by_id(&storefront_id).await?
        .ok_or(AppError::NotFound("Storefront not found".into()))?;

    if let Some(ref service_id) = payload.service_id {
        let service = state.service_repo.find_by_id(service_id).await?
            .ok_or(AppError::NotFound("Service not found".into()))?;
        if service.storefront_id != storefront_id {
            return Err(AppError::Validation("Service does not belong to this storefront".into()));
        }
    }

    let rule = ScheduleRule::new(NewScheduleRuleParams {
        storefront_id,
        service_id: payload.service_id,
        rule_type: payload.rule_type,
        priority: payload.priority.unwrap_or(0),
        day_of_week: payload.day_of_week,
        specific_date: payload.specific_date,
        month: payload.month,
        year: payload.year,
        start_time: parse_time(&payload.start_time, "start_time")?,
        end_time: parse_time(&payload.end_time, "end_time")?,
        is_available: payload.is_available.unwrap_or(true),
        max_concurrent_appointments: payload.max_concurrent_appointments.unwrap_or(1),
    });
    rule.validate()?;

    let created = state.rule_repo.create(&rule).await?;
    info!("Schedule rule {} created for storefront {}", created.id, created.storefront_id);
    Ok(Json(created))
}

pub async fn list_rules(
    State(state): State<Arc<AppState>>,
    Path(storefront_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.storefront_repo.find_by_id(&storefront_id).await?
        .ok_or(AppError::NotFound("Storefront not found".into()))?;

    let rules = state.rule_repo.list_by_storefront(&storefront_id).await?;
    Ok(Json(rules))
}

pub async fn update_rule(
    State(state): State<Arc<AppState>>,
    Path((storefront_id, rule_id)): Path<(String, String)>,
    Json(payload): Json<UpdateScheduleRuleRequest>,
) -> Result<impl IntoResponse, AppError> {
    let rule = state.rule_repo.find_by_id(&rule_id).await?
        .filter(|r| r.storefront_id == storefront_id)
        .ok_or(AppError::NotFound("Schedule rule not found".into()))?;

    let patch = ScheduleRulePatch {
        priority: payload.priority,
        day_of_week: payload.day_of_week,
        specific_date: payload.specific_date,
        month: payload.month,
        year: payload.year,
        start_time: payload.start_time.as_deref()
            .map(|raw| parse_time(raw, "start_time"))
            .transpose()?,
        end_time: payload.end_time.as_deref()
            .map(|raw| parse_time(raw, "end_time"))
            .transpose()?,
        is_available: payload.is_available,
        max_concurrent_appointments: payload.max_concurrent_appointments,
    };

    // Validate the merged result before anything is written.
    let mut preview = rule.clone();
    if let Some(v) = patch.priority { preview.priority = v; }
    if let Some(v) = patch.day_of_week { preview.day_of_week = Some(v); }
    if let Some(v) = patch.specific_date { preview.specific_date = Some(v); }
    if let Some(v) = patch.month { preview.month = Some(v); }
    if let Some(v) = patch.year { preview.year = Some(v); }
    if let Some(v) = patch.start_time { preview.start_time = v; }
    if let Some(v) = patch.end_time { preview.end_time = v; }
    if let Some(v) = patch.is_available { preview.is_available = v; }
    if let Some(v) = patch.max_concurrent_appointments { preview.max_concurrent_appointments = v; }
    preview.validate()?;

    let updated = state.rule_repo.update(&rule_id, &patch).await?;
    info!("Schedule rule {} updated", updated.id);
    Ok(Json(updated))
}

pub async fn delete_rule(
    State(state): State<Arc<AppState>>,
    Path((storefront_id, rule_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    state.rule_repo.soft_delete(&storefront_id, &rule_id).await?;
    info!("Schedule rule {} deleted", rule_id);
    Ok(Json(serde_json::json!({ "status": "deleted" })))
}

fn parse_time(raw: &str, field: &str) -> Result<NaiveTime, AppError> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|_| AppError::Validation(format!("{} must be HH:MM", field)))
}
