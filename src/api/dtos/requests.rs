use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct SlotsQuery {
    pub start_date: String,
    pub end_date: Option<String>,
}

#[derive(Deserialize)]
pub struct CheckSlotQuery {
    pub start_datetime: String,
    pub end_datetime: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateScheduleRuleRequest {
    pub service_id: Option<String>,
    pub rule_type: String,
    pub priority: Option<i32>,
    pub day_of_week: Option<i32>,
    pub specific_date: Option<NaiveDate>,
    pub month: Option<i32>,
    pub year: Option<i32>,
    pub start_time: String,
    pub end_time: String,
    pub is_available: Option<bool>,
    pub max_concurrent_appointments: Option<i32>,
}

#[derive(Deserialize)]
pub struct UpdateScheduleRuleRequest {
    pub priority: Option<i32>,
    pub day_of_week: Option<i32>,
    pub specific_date: Option<NaiveDate>,
    pub month: Option<i32>,
    pub year: Option<i32>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub is_available: Option<bool>,
    pub max_concurrent_appointments: Option<i32>,
}

#[derive(Deserialize)]
pub struct CreateAppointmentRequest {
    pub client_id: String,
    pub storefront_id: String,
    pub service_id: String,
    pub start_datetime: String,
    pub notes: Option<String>,
    pub location_type: Option<String>,
    pub client_address: Option<String>,
    pub drop_id: Option<String>,
}

#[derive(Deserialize)]
pub struct TransitionAppointmentRequest {
    pub actor_id: String,
    pub actor_role: String,
    pub new_status: String,
    pub notes: Option<String>,
    pub confirmed_start_datetime: Option<String>,
    pub confirmed_end_datetime: Option<String>,
}
