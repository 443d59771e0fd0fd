use serde::Serialize;
use crate::domain::models::service::Service;
use crate::domain::services::slots::AvailableSlot;

#[derive(Serialize)]
pub struct ServiceSummary {
    pub id: String,
    pub name: String,
    pub duration_minutes: i32,
    pub buffer_time_minutes: i32,
    pub price: i64,
}

impl From<&Service> for ServiceSummary {
    fn from(service: &Service) -> Self {
        Self {
            id: service.id.clone(),
            name: service.name.clone(),
            duration_minutes: service.duration_minutes,
            buffer_time_minutes: service.buffer_time_minutes,
            price: service.price,
        }
    }
}

#[derive(Serialize)]
pub struct SlotsResponse {
    pub timezone: String,
    pub service: ServiceSummary,
    pub slots: Vec<AvailableSlot>,
}
