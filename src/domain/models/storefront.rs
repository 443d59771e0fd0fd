use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Storefront {
    pub id: String,
    pub vendor_id: String,
    pub name: String,
    pub timezone: String,
    pub location_type: String,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Storefront {
    pub fn new(vendor_id: String, name: String, timezone: String, location_type: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            vendor_id,
            name,
            timezone,
            location_type,
            created_at: Utc::now(),
            deleted_at: None,
        }
    }

    pub fn has_fixed_location(&self) -> bool {
        self.location_type == "fixed"
    }
}
