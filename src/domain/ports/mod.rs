use crate::domain::models::{
    appointment::{Appointment, AppointmentPatch},
    schedule_rule::{ScheduleRule, ScheduleRulePatch},
    service::Service,
    storefront::Storefront,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

#[async_trait]
pub trait StorefrontRepository: Send + Sync {
    async fn create(&self, storefront: &Storefront) -> Result<Storefront, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Storefront>, AppError>;
}

#[async_trait]
pub trait ServiceRepository: Send + Sync {
    async fn create(&self, service: &Service) -> Result<Service, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Service>, AppError>;
    async fn list_by_storefront(&self, storefront_id: &str) -> Result<Vec<Service>, AppError>;
}

#[async_trait]
pub trait ScheduleRuleRepository: Send + Sync {
    async fn create(&self, rule: &ScheduleRule) -> Result<ScheduleRule, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<ScheduleRule>, AppError>;
    async fn list_by_storefront(&self, storefront_id: &str) -> Result<Vec<ScheduleRule>, AppError>;
    /// Rules that can contribute hours anywhere in [start, end]: all live
    /// weekly/monthly rules plus daily rules whose date falls in the range.
    async fn list_for_range(
        &self,
        storefront_id: &str,
        service_id: Option<&str>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ScheduleRule>, AppError>;
    async fn update(&self, id: &str, patch: &ScheduleRulePatch) -> Result<ScheduleRule, AppError>;
    async fn soft_delete(&self, storefront_id: &str, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    async fn create(&self, appointment: &Appointment) -> Result<Appointment, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Appointment>, AppError>;
    /// Capacity-occupying (pending/confirmed) appointments of the whole
    /// storefront intersecting [start, end).
    async fn list_overlapping(
        &self,
        storefront_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Appointment>, AppError>;
    async fn count_overlapping(
        &self,
        storefront_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<i64, AppError>;
    async fn list_by_storefront(&self, storefront_id: &str) -> Result<Vec<Appointment>, AppError>;
    async fn update(&self, id: &str, patch: &AppointmentPatch) -> Result<Appointment, AppError>;
}

/// Exclusive lock guard. Dropping the guard releases the lock; `release`
/// is the explicit happy-path variant that can report errors.
#[async_trait]
pub trait SlotLockGuard: Send {
    async fn release(self: Box<Self>) -> Result<(), AppError>;
}

/// Serializes booking commits that contend for the same slot bucket.
#[async_trait]
pub trait SlotLockManager: Send + Sync {
    async fn acquire(&self, key: i64) -> Result<Box<dyn SlotLockGuard>, AppError>;
}
