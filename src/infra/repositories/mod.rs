pub mod sqlite_appointment_repo;
pub mod sqlite_schedule_rule_repo;
pub mod sqlite_service_repo;
pub mod sqlite_storefront_repo;

pub mod postgres_appointment_repo;
pub mod postgres_schedule_rule_repo;
pub mod postgres_service_repo;
pub mod postgres_storefront_repo;
