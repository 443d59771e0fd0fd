use std::sync::Arc;
use crate::config::Config;
use crate::domain::ports::{
    AppointmentRepository, ScheduleRuleRepository, ServiceRepository, SlotLockManager,
    StorefrontRepository,
};
use crate::domain::services::availability::AvailabilityService;
use crate::domain::services::booking::BookingService;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub storefront_repo: Arc<dyn StorefrontRepository>,
    pub service_repo: Arc<dyn ServiceRepository>,
    pub rule_repo: Arc<dyn ScheduleRuleRepository>,
    pub appointment_repo: Arc<dyn AppointmentRepository>,
    pub slot_lock: Arc<dyn SlotLockManager>,
    pub availability: Arc<AvailabilityService>,
    pub booking: Arc<BookingService>,
}
