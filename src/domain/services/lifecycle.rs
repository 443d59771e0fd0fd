use chrono::{DateTime, Utc};
use crate::domain::models::appointment::{Appointment, AppointmentPatch};
use crate::error::AppError;

pub const STATUSES: [&str; 6] = [
    "pending",
    "confirmed",
    "declined",
    "cancelled",
    "completed",
    "no_show",
];

/// Status state machine with actor rules. declined/cancelled/completed/
/// no_show are terminal. Clients may only cancel; everything else is
/// vendor-only.
pub fn validate_transition(current: &str, next: &str, actor_role: &str) -> Result<(), AppError> {
    if !STATUSES.contains(&next) {
        return Err(AppError::Validation(format!("Unknown status '{}'", next)));
    }

    match actor_role {
        "vendor" => {}
        "client" => {
            if next != "cancelled" {
                return Err(AppError::Forbidden(format!(
                    "Clients may only cancel appointments, not set status '{}'",
                    next
                )));
            }
        }
        other => {
            return Err(AppError::Forbidden(format!("Unknown actor role '{}'", other)));
        }
    }

    let allowed = matches!(
        (current, next),
        ("pending", "confirmed")
            | ("pending", "declined")
            | ("pending", "cancelled")
            | ("confirmed", "cancelled")
            | ("confirmed", "completed")
            | ("confirmed", "no_show")
    );

    if !allowed {
        return Err(AppError::InvalidTransition(format!("{} -> {}", current, next)));
    }

    Ok(())
}

/// Validates a transition and builds the patch that applies it. Notes land
/// on the acting side; a vendor confirming may retime the appointment.
pub fn build_transition_patch(
    appointment: &Appointment,
    actor_role: &str,
    new_status: &str,
    notes: Option<String>,
    confirmed_start: Option<DateTime<Utc>>,
    confirmed_end: Option<DateTime<Utc>>,
) -> Result<AppointmentPatch, AppError> {
    validate_transition(&appointment.status, new_status, actor_role)?;

    let mut patch = AppointmentPatch {
        status: Some(new_status.to_string()),
        ..Default::default()
    };

    match actor_role {
        "vendor" => patch.vendor_notes = notes,
        _ => patch.client_notes = notes,
    }

    if new_status == "confirmed" {
        match (confirmed_start, confirmed_end) {
            (Some(start), Some(end)) => {
                if start >= end {
                    return Err(AppError::Validation(
                        "confirmed_start_datetime must be before confirmed_end_datetime".into(),
                    ));
                }
                patch.confirmed_start_datetime = Some(start);
                patch.confirmed_end_datetime = Some(end);
            }
            (None, None) => {}
            _ => {
                return Err(AppError::Validation(
                    "confirmed_start_datetime and confirmed_end_datetime must be provided together".into(),
                ));
            }
        }
    }

    Ok(patch)
}
