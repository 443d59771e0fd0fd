use std::sync::Arc;
use chrono::{DateTime, Utc};
use tracing::{error, info, warn};
use crate::domain::models::appointment::{Appointment, NewAppointmentParams};
use crate::domain::ports::{
    AppointmentRepository, ServiceRepository, SlotLockManager, StorefrontRepository,
};
use crate::domain::services::availability::AvailabilityService;
use crate::error::AppError;

/// Booking starts are quantized to 15-minute windows for locking: requests
/// contending for overlapping times serialize on the same key while
/// unrelated times proceed in parallel.
pub const LOCK_BUCKET_SECS: i64 = 15 * 60;

/// Deterministic lock key over (storefront, service, time bucket).
/// FNV-1a, stable across processes and restarts.
pub fn slot_lock_key(storefront_id: &str, service_id: &str, start: DateTime<Utc>) -> i64 {
    let bucket = start.timestamp().div_euclid(LOCK_BUCKET_SECS);

    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    let mut feed = |hash: &mut u64, bytes: &[u8]| {
        for b in bytes {
            *hash ^= *b as u64;
            *hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
        }
    };
    feed(&mut hash, storefront_id.as_bytes());
    feed(&mut hash, &[0]);
    feed(&mut hash, service_id.as_bytes());
    feed(&mut hash, &[0]);
    feed(&mut hash, &bucket.to_be_bytes());

    hash as i64
}

pub struct BookingIntent {
    pub client_id: String,
    pub storefront_id: String,
    pub service_id: String,
    pub start: DateTime<Utc>,
    pub notes: Option<String>,
    pub location_type: Option<String>,
    pub client_address: Option<String>,
    pub drop_id: Option<String>,
}

/// Turns a booking intent into a committed pending appointment, with the
/// availability re-check serialized under the slot-bucket lock so racing
/// requests cannot both pass the capacity check.
pub struct BookingService {
    storefront_repo: Arc<dyn StorefrontRepository>,
    service_repo: Arc<dyn ServiceRepository>,
    appointment_repo: Arc<dyn AppointmentRepository>,
    availability: Arc<AvailabilityService>,
    slot_lock: Arc<dyn SlotLockManager>,
}

impl BookingService {
    pub fn new(
        storefront_repo: Arc<dyn StorefrontRepository>,
        service_repo: Arc<dyn ServiceRepository>,
        appointment_repo: Arc<dyn AppointmentRepository>,
        availability: Arc<AvailabilityService>,
        slot_lock: Arc<dyn SlotLockManager>,
    ) -> Self {
        Self {
            storefront_repo,
            service_repo,
            appointment_repo,
            availability,
            slot_lock,
        }
    }

    pub async fn create_appointment(&self, intent: BookingIntent) -> Result<Appointment, AppError> {
        // All plain validation happens before any lock is taken.
        if intent.start <= Utc::now() {
            return Err(AppError::Validation("Cannot book in the past".into()));
        }

        let storefront = self.storefront_repo.find_by_id(&intent.storefront_id).await?
            .ok_or(AppError::NotFound("Storefront not found".into()))?;
        let service = self.service_repo.find_by_id(&intent.service_id).await?
            .ok_or(AppError::NotFound("Service not found".into()))?;

        if service.storefront_id != storefront.id {
            return Err(AppError::Validation("Service does not belong to this storefront".into()));
        }
        if !service.is_active {
            return Err(AppError::Validation("Service is not active".into()));
        }

        let requested_location = intent.location_type.unwrap_or_else(|| "at_vendor".to_string());
        if requested_location != "at_vendor" && requested_location != "at_client" {
            return Err(AppError::Validation("location_type must be at_vendor or at_client".into()));
        }

        let effective_location = if storefront.has_fixed_location() && requested_location == "at_client" {
            // Preserved source behavior: coerce silently instead of rejecting.
            warn!(
                "Storefront {} has a fixed location; coercing at_client request to at_vendor",
                storefront.id
            );
            "at_vendor".to_string()
        } else {
            requested_location
        };

        let client_address = intent.client_address.filter(|a| !a.trim().is_empty());
        if effective_location == "at_client" && client_address.is_none() {
            return Err(AppError::Validation("client_address is required for at_client appointments".into()));
        }

        let total_minutes = service.total_slot_minutes();

        let key = slot_lock_key(&intent.storefront_id, &intent.service_id, intent.start);
        let guard = self.slot_lock.acquire(key).await?;

        // The pre-checks above can go stale between display and commit;
        // only the re-check inside the lock decides.
        let check = match self.availability
            .is_slot_available(&intent.storefront_id, &intent.service_id, intent.start, None)
            .await
        {
            Ok(check) => check,
            Err(e) => {
                guard.release().await?;
                return Err(e);
            }
        };

        if !check.available {
            let reason = check.reason.unwrap_or_else(|| "Slot is not available".to_string());
            warn!(
                "Booking rejected for storefront {} at {}: {}",
                intent.storefront_id, intent.start, reason
            );
            guard.release().await?;
            return Err(AppError::Conflict(reason));
        }

        let appointment = Appointment::new(NewAppointmentParams {
            client_id: intent.client_id,
            storefront_id: intent.storefront_id,
            service_id: intent.service_id,
            drop_id: intent.drop_id,
            start: intent.start,
            total_minutes,
            notes: intent.notes,
            price_quoted: service.price,
            service_location_type: effective_location,
            client_address,
        });

        let created = match self.appointment_repo.create(&appointment).await {
            Ok(created) => created,
            Err(e) => {
                guard.release().await?;
                return Err(e);
            }
        };

        // The insert is durable at this point; a failed unlock must not
        // surface as a failed booking.
        if let Err(e) = guard.release().await {
            error!("Slot lock release failed after commit: {}", e);
        }

        info!(
            "Appointment {} created (pending) for storefront {} at {}",
            created.id, created.storefront_id, created.requested_start_datetime
        );
        Ok(created)
    }
}
