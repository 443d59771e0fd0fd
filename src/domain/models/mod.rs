pub mod appointment;
pub mod schedule_rule;
pub mod service;
pub mod storefront;
