use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use crate::domain::models::appointment::Appointment;
use crate::domain::services::time_blocks::TimeBlock;

#[derive(Debug, Serialize, Clone)]
pub struct AvailableSlot {
    pub start_datetime: DateTime<Utc>,
    pub end_datetime: DateTime<Utc>,
    pub local_date: String,
    pub local_start_time: String,
    pub local_end_time: String,
    pub available_capacity: i32,
}

/// Walks each available block in fixed strides of `total_minutes`
/// (duration + buffer) and emits slots with remaining capacity.
///
/// Slot boundaries are block start + stride only: existing bookings never
/// shift the grid, they only reduce capacity. `end_datetime` uses
/// `display_minutes` (duration without buffer), which is what the customer
/// sees; capacity is still counted over the full stride.
pub fn generate_slots(
    blocks: &[TimeBlock],
    total_minutes: i64,
    display_minutes: i64,
    appointments: &[Appointment],
    now: DateTime<Utc>,
    tz: Tz,
) -> Vec<AvailableSlot> {
    let mut slots = Vec::new();

    if total_minutes <= 0 || display_minutes <= 0 {
        return slots;
    }

    let stride = Duration::minutes(total_minutes);
    let display = Duration::minutes(display_minutes);

    for block in blocks.iter().filter(|b| b.is_available) {
        let mut cursor = block.start;

        while cursor + stride <= block.end {
            let slot_end = cursor + stride;

            // Only strictly-future starts are bookable.
            if cursor > now {
                let occupied = appointments
                    .iter()
                    .filter(|a| a.occupies_capacity())
                    .filter(|a| {
                        a.requested_start_datetime < slot_end && a.requested_end_datetime > cursor
                    })
                    .count() as i32;

                let capacity = block.max_concurrent - occupied;
                if capacity > 0 {
                    let local_start = cursor.with_timezone(&tz);
                    let local_end = (cursor + display).with_timezone(&tz);

                    slots.push(AvailableSlot {
                        start_datetime: cursor,
                        end_datetime: cursor + display,
                        local_date: local_start.format("%Y-%m-%d").to_string(),
                        local_start_time: local_start.format("%H:%M").to_string(),
                        local_end_time: local_end.format("%H:%M").to_string(),
                        available_capacity: capacity,
                    });
                }
            }

            cursor += stride;
        }
    }

    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::appointment::{Appointment, NewAppointmentParams};
    use chrono::TimeZone;

    fn block(start: DateTime<Utc>, end: DateTime<Utc>, max_concurrent: i32) -> TimeBlock {
        TimeBlock {
            start,
            end,
            is_available: true,
            max_concurrent,
            priority: 1,
            rule_id: "rule-1".into(),
        }
    }

    fn appointment_at(start: DateTime<Utc>, total_minutes: i64) -> Appointment {
        Appointment::new(NewAppointmentParams {
            client_id: "client-1".into(),
            storefront_id: "sf-1".into(),
            service_id: "svc-1".into(),
            drop_id: None,
            start,
            total_minutes,
            notes: None,
            price_quoted: 0,
            service_location_type: "at_vendor".into(),
            client_address: None,
        })
    }

    fn past_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn grid_is_stable_for_nine_to_five() {
        let start = Utc.with_ymd_and_hms(2030, 1, 7, 9, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2030, 1, 7, 17, 0, 0).unwrap();
        let blocks = vec![block(start, end, 1)];

        let slots = generate_slots(&blocks, 30, 30, &[], past_now(), chrono_tz::UTC);

        assert_eq!(slots.len(), 16);
        assert_eq!(slots[0].local_start_time, "09:00");
        assert_eq!(slots[15].local_start_time, "16:30");
        assert_eq!(slots[15].local_end_time, "17:00");
    }

    #[test]
    fn capacity_subtracts_overlapping_appointments() {
        let start = Utc.with_ymd_and_hms(2030, 1, 7, 9, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2030, 1, 7, 10, 0, 0).unwrap();
        let blocks = vec![block(start, end, 3)];

        let existing = vec![appointment_at(start, 60), appointment_at(start, 60)];
        let slots = generate_slots(&blocks, 60, 60, &existing, past_now(), chrono_tz::UTC);

        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].available_capacity, 1);
    }

    #[test]
    fn full_slot_is_excluded_entirely() {
        let start = Utc.with_ymd_and_hms(2030, 1, 7, 9, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2030, 1, 7, 10, 0, 0).unwrap();
        let blocks = vec![block(start, end, 3)];

        let existing = vec![
            appointment_at(start, 60),
            appointment_at(start, 60),
            appointment_at(start, 60),
        ];
        let slots = generate_slots(&blocks, 60, 60, &existing, past_now(), chrono_tz::UTC);

        assert!(slots.is_empty());
    }

    #[test]
    fn cancelled_appointments_do_not_occupy_capacity() {
        let start = Utc.with_ymd_and_hms(2030, 1, 7, 9, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2030, 1, 7, 10, 0, 0).unwrap();
        let blocks = vec![block(start, end, 1)];

        let mut cancelled = appointment_at(start, 60);
        cancelled.status = "cancelled".to_string();

        let slots = generate_slots(&blocks, 60, 60, &[cancelled], past_now(), chrono_tz::UTC);
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].available_capacity, 1);
    }

    #[test]
    fn past_slots_are_filtered() {
        let start = Utc.with_ymd_and_hms(2030, 1, 7, 9, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2030, 1, 7, 11, 0, 0).unwrap();
        let blocks = vec![block(start, end, 1)];

        // "now" sits mid-block; only the 10:00 slot remains.
        let now = Utc.with_ymd_and_hms(2030, 1, 7, 9, 30, 0).unwrap();
        let slots = generate_slots(&blocks, 60, 60, &[], now, chrono_tz::UTC);

        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].local_start_time, "10:00");
    }

    #[test]
    fn buffer_widens_the_stride_but_not_the_display_end() {
        let start = Utc.with_ymd_and_hms(2030, 1, 7, 9, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2030, 1, 7, 11, 0, 0).unwrap();
        let blocks = vec![block(start, end, 1)];

        // 45min service + 15min buffer: slots at 09:00 and 10:00 only.
        let slots = generate_slots(&blocks, 60, 45, &[], past_now(), chrono_tz::UTC);

        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].local_start_time, "09:00");
        assert_eq!(slots[0].local_end_time, "09:45");
        assert_eq!(slots[1].local_start_time, "10:00");
    }
}
