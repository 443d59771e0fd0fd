use serde::{Deserialize, Serialize};
use chrono::{DateTime, Duration, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Appointment {
    pub id: String,
    pub client_id: String,
    pub storefront_id: String,
    pub service_id: String,
    pub drop_id: Option<String>,
    pub requested_start_datetime: DateTime<Utc>,
    pub requested_end_datetime: DateTime<Utc>,
    pub confirmed_start_datetime: Option<DateTime<Utc>>,
    pub confirmed_end_datetime: Option<DateTime<Utc>>,
    pub status: String,
    pub client_notes: Option<String>,
    pub vendor_notes: Option<String>,
    pub internal_notes: Option<String>,
    pub price_quoted: i64,
    pub price_final: Option<i64>,
    pub service_location_type: String,
    pub client_address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

pub struct NewAppointmentParams {
    pub client_id: String,
    pub storefront_id: String,
    pub service_id: String,
    pub drop_id: Option<String>,
    pub start: DateTime<Utc>,
    pub total_minutes: i64,
    pub notes: Option<String>,
    pub price_quoted: i64,
    pub service_location_type: String,
    pub client_address: Option<String>,
}

impl Appointment {
    pub fn new(params: NewAppointmentParams) -> Self {
        let end = params.start + Duration::minutes(params.total_minutes);

        Self {
            id: Uuid::new_v4().to_string(),
            client_id: params.client_id,
            storefront_id: params.storefront_id,
            service_id: params.service_id,
            drop_id: params.drop_id,
            requested_start_datetime: params.start,
            requested_end_datetime: end,
            confirmed_start_datetime: None,
            confirmed_end_datetime: None,
            status: "pending".to_string(),
            client_notes: params.notes,
            vendor_notes: None,
            internal_notes: None,
            price_quoted: params.price_quoted,
            price_final: None,
            service_location_type: params.service_location_type,
            client_address: params.client_address,
            created_at: Utc::now(),
            deleted_at: None,
        }
    }

    /// pending and confirmed bookings occupy capacity; terminal states do not.
    pub fn occupies_capacity(&self) -> bool {
        self.deleted_at.is_none() && matches!(self.status.as_str(), "pending" | "confirmed")
    }
}

/// Named-field partial update. Only fields set to Some are written.
#[derive(Debug, Default)]
pub struct AppointmentPatch {
    pub status: Option<String>,
    pub client_notes: Option<String>,
    pub vendor_notes: Option<String>,
    pub internal_notes: Option<String>,
    pub confirmed_start_datetime: Option<DateTime<Utc>>,
    pub confirmed_end_datetime: Option<DateTime<Utc>>,
    pub price_final: Option<i64>,
}
