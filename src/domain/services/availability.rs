use std::sync::Arc;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use crate::domain::models::service::Service;
use crate::domain::models::storefront::Storefront;
use crate::domain::ports::{
    AppointmentRepository, ScheduleRuleRepository, ServiceRepository, StorefrontRepository,
};
use crate::domain::services::slots::{generate_slots, AvailableSlot};
use crate::domain::services::time_blocks::{day_bounds_utc, resolve_day_blocks};
use crate::error::AppError;

pub const MAX_RANGE_DAYS: i64 = 31;

pub struct SlotListing {
    pub timezone: String,
    pub service: Service,
    pub slots: Vec<AvailableSlot>,
}

#[derive(Debug, Serialize)]
pub struct SlotCheck {
    pub available: bool,
    pub reason: Option<String>,
    pub current_bookings: Option<i64>,
    pub max_concurrent: Option<i32>,
}

impl SlotCheck {
    fn rejected(reason: &str) -> Self {
        Self {
            available: false,
            reason: Some(reason.to_string()),
            current_bookings: None,
            max_concurrent: None,
        }
    }
}

/// Read-side orchestration over the rule store, the time-block resolver
/// and the slot generator. `is_slot_available` doubles as the
/// re-validation step inside the booking lock.
pub struct AvailabilityService {
    storefront_repo: Arc<dyn StorefrontRepository>,
    service_repo: Arc<dyn ServiceRepository>,
    rule_repo: Arc<dyn ScheduleRuleRepository>,
    appointment_repo: Arc<dyn AppointmentRepository>,
}

impl AvailabilityService {
    pub fn new(
        storefront_repo: Arc<dyn StorefrontRepository>,
        service_repo: Arc<dyn ServiceRepository>,
        rule_repo: Arc<dyn ScheduleRuleRepository>,
        appointment_repo: Arc<dyn AppointmentRepository>,
    ) -> Self {
        Self {
            storefront_repo,
            service_repo,
            rule_repo,
            appointment_repo,
        }
    }

    async fn resolve_pair(
        &self,
        storefront_id: &str,
        service_id: &str,
    ) -> Result<(Storefront, Service), AppError> {
        let storefront = self.storefront_repo.find_by_id(storefront_id).await?
            .ok_or(AppError::NotFound("Storefront not found".into()))?;
        let service = self.service_repo.find_by_id(service_id).await?
            .ok_or(AppError::NotFound("Service not found".into()))?;

        if service.storefront_id != storefront.id {
            return Err(AppError::Validation("Service does not belong to this storefront".into()));
        }

        Ok((storefront, service))
    }

    pub async fn get_available_slots(
        &self,
        storefront_id: &str,
        service_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<SlotListing, AppError> {
        let (storefront, service) = self.resolve_pair(storefront_id, service_id).await?;

        if !service.is_active {
            return Err(AppError::Validation("Service is not active".into()));
        }
        if start_date > end_date {
            return Err(AppError::Validation("start_date must not be after end_date".into()));
        }
        if (end_date - start_date).num_days() + 1 > MAX_RANGE_DAYS {
            return Err(AppError::Validation("Date range must not exceed 31 days".into()));
        }

        let tz: Tz = storefront.timezone.parse().unwrap_or(chrono_tz::UTC);

        // One round trip each for rules and bookings; per-day resolution is
        // pure computation over the fetched sets.
        let rules = self.rule_repo
            .list_for_range(storefront_id, Some(service_id), start_date, end_date)
            .await?;

        let (range_start, _) = day_bounds_utc(start_date, tz).ok_or(AppError::Internal)?;
        let (_, range_end) = day_bounds_utc(end_date, tz).ok_or(AppError::Internal)?;
        let appointments = self.appointment_repo
            .list_overlapping(storefront_id, range_start, range_end)
            .await?;

        let now = Utc::now();
        let total_minutes = service.total_slot_minutes();
        let display_minutes = service.duration_minutes as i64;

        let mut slots = Vec::new();
        let mut day = start_date;
        while day <= end_date {
            let blocks = resolve_day_blocks(day, tz, &rules);
            slots.extend(generate_slots(
                &blocks,
                total_minutes,
                display_minutes,
                &appointments,
                now,
                tz,
            ));
            day = day.succ_opt().ok_or(AppError::Internal)?;
        }

        Ok(SlotListing {
            timezone: storefront.timezone.clone(),
            service,
            slots,
        })
    }

    /// Point-in-time check for one exact interval. When `end` is absent it
    /// is derived from the service's slot length. Never errors on business
    /// rejections; those come back as `available: false` with a reason so
    /// the booking path can surface them as a Conflict.
    pub async fn is_slot_available(
        &self,
        storefront_id: &str,
        service_id: &str,
        start: DateTime<Utc>,
        end: Option<DateTime<Utc>>,
    ) -> Result<SlotCheck, AppError> {
        let Some(storefront) = self.storefront_repo.find_by_id(storefront_id).await? else {
            return Ok(SlotCheck::rejected("Storefront not found"));
        };
        let Some(service) = self.service_repo.find_by_id(service_id).await? else {
            return Ok(SlotCheck::rejected("Service not found"));
        };
        if service.storefront_id != storefront.id {
            return Ok(SlotCheck::rejected("Service does not belong to this storefront"));
        }
        if !service.is_active {
            return Ok(SlotCheck::rejected("Service is not active"));
        }
        if start <= Utc::now() {
            return Ok(SlotCheck::rejected("Requested start is in the past"));
        }

        let end = end.unwrap_or_else(|| start + Duration::minutes(service.total_slot_minutes()));
        if end <= start {
            return Ok(SlotCheck::rejected("Requested end must be after start"));
        }
        let tz: Tz = storefront.timezone.parse().unwrap_or(chrono_tz::UTC);
        let date = start.with_timezone(&tz).date_naive();

        let rules = self.rule_repo
            .list_for_range(storefront_id, Some(service_id), date, date)
            .await?;
        let blocks = resolve_day_blocks(date, tz, &rules);

        let Some(block) = blocks
            .iter()
            .find(|b| b.is_available && b.start <= start && end <= b.end)
        else {
            return Ok(SlotCheck::rejected("Requested time is outside available hours"));
        };

        let current = self.appointment_repo
            .count_overlapping(storefront_id, start, end)
            .await?;

        if current >= block.max_concurrent as i64 {
            return Ok(SlotCheck {
                available: false,
                reason: Some("Slot capacity has been reached".into()),
                current_bookings: Some(current),
                max_concurrent: Some(block.max_concurrent),
            });
        }

        Ok(SlotCheck {
            available: true,
            reason: None,
            current_bookings: Some(current),
            max_concurrent: Some(block.max_concurrent),
        })
    }
}
