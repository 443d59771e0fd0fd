use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Service {
    pub id: String,
    pub storefront_id: String,
    pub name: String,
    pub duration_minutes: i32,
    pub buffer_time_minutes: i32,
    pub price: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

pub struct NewServiceParams {
    pub storefront_id: String,
    pub name: String,
    pub duration_minutes: i32,
    pub buffer_time_minutes: i32,
    pub price: i64,
}

impl Service {
    pub fn new(params: NewServiceParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            storefront_id: params.storefront_id,
            name: params.name,
            duration_minutes: params.duration_minutes,
            buffer_time_minutes: params.buffer_time_minutes,
            price: params.price,
            is_active: true,
            created_at: Utc::now(),
            deleted_at: None,
        }
    }

    /// Slot stride: how much calendar time one booking consumes.
    pub fn total_slot_minutes(&self) -> i64 {
        (self.duration_minutes + self.buffer_time_minutes) as i64
    }
}
