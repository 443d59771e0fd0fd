use serde::{Deserialize, Serialize};
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;
use crate::error::AppError;

/// A recurring or one-off availability statement. `is_available = false`
/// turns the rule into a closure override for the hours it covers.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct ScheduleRule {
    pub id: String,
    pub storefront_id: String,
    pub service_id: Option<String>,
    pub rule_type: String,
    pub priority: i32,
    pub day_of_week: Option<i32>,
    pub specific_date: Option<NaiveDate>,
    pub month: Option<i32>,
    pub year: Option<i32>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_available: bool,
    pub max_concurrent_appointments: i32,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

pub struct NewScheduleRuleParams {
    pub storefront_id: String,
    pub service_id: Option<String>,
    pub rule_type: String,
    pub priority: i32,
    pub day_of_week: Option<i32>,
    pub specific_date: Option<NaiveDate>,
    pub month: Option<i32>,
    pub year: Option<i32>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_available: bool,
    pub max_concurrent_appointments: i32,
}

impl ScheduleRule {
    pub fn new(params: NewScheduleRuleParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            storefront_id: params.storefront_id,
            service_id: params.service_id,
            rule_type: params.rule_type,
            priority: params.priority,
            day_of_week: params.day_of_week,
            specific_date: params.specific_date,
            month: params.month,
            year: params.year,
            start_time: params.start_time,
            end_time: params.end_time,
            is_available: params.is_available,
            max_concurrent_appointments: params.max_concurrent_appointments,
            created_at: Utc::now(),
            deleted_at: None,
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.start_time >= self.end_time {
            return Err(AppError::Validation("start_time must be before end_time".into()));
        }
        if self.max_concurrent_appointments < 1 {
            return Err(AppError::Validation("max_concurrent_appointments must be at least 1".into()));
        }

        match self.rule_type.as_str() {
            "weekly" => {
                match self.day_of_week {
                    Some(0..=6) => {}
                    Some(_) => return Err(AppError::Validation("day_of_week must be between 0 (Sunday) and 6".into())),
                    None => return Err(AppError::Validation("day_of_week is required for weekly rules".into())),
                }
            }
            "daily" => {
                if self.specific_date.is_none() {
                    return Err(AppError::Validation("specific_date is required for daily rules".into()));
                }
            }
            "monthly" => {
                match self.month {
                    Some(1..=12) => {}
                    Some(_) => return Err(AppError::Validation("month must be between 1 and 12".into())),
                    None => return Err(AppError::Validation("month is required for monthly rules".into())),
                }
            }
            _ => return Err(AppError::Validation("rule_type must be one of weekly, daily, monthly".into())),
        }

        Ok(())
    }

    /// Whether this rule contributes hours on the given local calendar date.
    /// Weekday numbering is Sunday-based (0 = Sunday).
    pub fn applies_on(&self, date: NaiveDate) -> bool {
        match self.rule_type.as_str() {
            "weekly" => self.day_of_week == Some(date.weekday().num_days_from_sunday() as i32),
            "daily" => self.specific_date == Some(date),
            "monthly" => {
                self.month == Some(date.month() as i32)
                    && self.year.is_none_or(|y| y == date.year())
            }
            _ => false,
        }
    }
}

/// Named-field partial update. Only fields set to Some are written.
#[derive(Debug, Default, Deserialize)]
pub struct ScheduleRulePatch {
    pub priority: Option<i32>,
    pub day_of_week: Option<i32>,
    pub specific_date: Option<NaiveDate>,
    pub month: Option<i32>,
    pub year: Option<i32>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub is_available: Option<bool>,
    pub max_concurrent_appointments: Option<i32>,
}
