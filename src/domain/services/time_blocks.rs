use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use crate::domain::models::schedule_rule::ScheduleRule;

/// A resolved, non-overlapping interval of one calendar day in UTC.
/// Derived fresh per query, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeBlock {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub is_available: bool,
    pub max_concurrent: i32,
    pub priority: i32,
    pub rule_id: String,
}

struct RuleInterval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    is_available: bool,
    max_concurrent: i32,
    priority: i32,
    rule_id: String,
}

/// UTC bounds of a local calendar day. DST transition days resolve to the
/// earliest/latest valid instants.
pub fn day_bounds_utc(date: NaiveDate, tz: Tz) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = tz.from_local_datetime(&date.and_hms_opt(0, 0, 0)?).earliest()?;
    let end = tz.from_local_datetime(&date.and_hms_opt(23, 59, 59)?).latest()?;
    Some((start.with_timezone(&Utc), end.with_timezone(&Utc)))
}

/// Merges the rules applicable on `date` into an ordered sequence of
/// non-overlapping blocks. Where rules overlap, the highest-priority rule
/// decides availability and capacity for the overlapping segment; adjacent
/// segments with identical attributes are consolidated. Time not covered
/// by any rule produces no block and is implicitly unavailable.
pub fn resolve_day_blocks(date: NaiveDate, tz: Tz, rules: &[ScheduleRule]) -> Vec<TimeBlock> {
    let mut intervals: Vec<RuleInterval> = Vec::new();

    for rule in rules.iter().filter(|r| r.deleted_at.is_none() && r.applies_on(date)) {
        // Local wall clock to UTC. A bound inside a spring-forward gap maps
        // to the earliest valid instant; a rule that cannot be mapped at all
        // is skipped for this date.
        let Some(start) = tz.from_local_datetime(&date.and_time(rule.start_time)).earliest() else {
            continue;
        };
        let Some(end) = tz.from_local_datetime(&date.and_time(rule.end_time)).earliest() else {
            continue;
        };
        let start = start.with_timezone(&Utc);
        let end = end.with_timezone(&Utc);
        if start >= end {
            continue;
        }

        intervals.push(RuleInterval {
            start,
            end,
            is_available: rule.is_available,
            max_concurrent: rule.max_concurrent_appointments,
            priority: rule.priority,
            rule_id: rule.id.clone(),
        });
    }

    if intervals.is_empty() {
        return Vec::new();
    }

    let mut boundaries: Vec<DateTime<Utc>> = intervals
        .iter()
        .flat_map(|i| [i.start, i.end])
        .collect();
    boundaries.sort();
    boundaries.dedup();

    let mut blocks: Vec<TimeBlock> = Vec::new();

    for window in boundaries.windows(2) {
        let (seg_start, seg_end) = (window[0], window[1]);

        let winner = intervals
            .iter()
            .filter(|i| i.start <= seg_start && i.end >= seg_end)
            .max_by_key(|i| i.priority);

        let Some(winner) = winner else {
            // Gap between rule coverage: implicitly unavailable.
            continue;
        };

        if let Some(last) = blocks.last_mut()
            && last.end == seg_start
            && last.is_available == winner.is_available
            && last.max_concurrent == winner.max_concurrent
        {
            last.end = seg_end;
            continue;
        }

        blocks.push(TimeBlock {
            start: seg_start,
            end: seg_end,
            is_available: winner.is_available,
            max_concurrent: winner.max_concurrent,
            priority: winner.priority,
            rule_id: winner.rule_id.clone(),
        });
    }

    blocks
}
