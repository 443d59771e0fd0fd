use crate::domain::{models::schedule_rule::{ScheduleRule, ScheduleRulePatch}, ports::ScheduleRuleRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;

pub struct SqliteScheduleRuleRepo {
    pool: SqlitePool,
}

impl SqliteScheduleRuleRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ScheduleRuleRepository for SqliteScheduleRuleRepo {
    async fn create(&self, rule: &ScheduleRule) -> Result<ScheduleRule, AppError> {
        sqlx::query_as::<_, ScheduleRule>(
            "INSERT INTO schedule_rules (id, storefront_id, service_id, rule_type, priority, day_of_week, specific_date, month, year, start_time, end_time, is_available, max_concurrent_appointments, created_at, deleted_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&rule.id).bind(&rule.storefront_id).bind(&rule.service_id)
            .bind(&rule.rule_type).bind(rule.priority).bind(rule.day_of_week)
            .bind(rule.specific_date).bind(rule.month).bind(rule.year)
            .bind(rule.start_time).bind(rule.end_time).bind(rule.is_available)
            .bind(rule.max_concurrent_appointments).bind(rule.created_at).bind(rule.deleted_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_by_id(&self, id: &str) -> Result<Option<ScheduleRule>, AppError> {
        sqlx::query_as::<_, ScheduleRule>("SELECT * FROM schedule_rules WHERE id = ? AND deleted_at IS NULL")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_by_storefront(&self, storefront_id: &str) -> Result<Vec<ScheduleRule>, AppError> {
        sqlx::query_as::<_, ScheduleRule>("SELECT * FROM schedule_rules WHERE storefront_id = ? AND deleted_at IS NULL ORDER BY priority DESC, created_at ASC")
            .bind(storefront_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_for_range(&self, storefront_id: &str, service_id: Option<&str>, start: NaiveDate, end: NaiveDate) -> Result<Vec<ScheduleRule>, AppError> {
        sqlx::query_as::<_, ScheduleRule>(
            "SELECT * FROM schedule_rules
             WHERE storefront_id = ? AND deleted_at IS NULL
               AND (? IS NULL OR service_id IS NULL OR service_id = ?)
               AND (rule_type != 'daily' OR (specific_date >= ? AND specific_date <= ?))"
        )
            .bind(storefront_id).bind(service_id).bind(service_id)
            .bind(start).bind(end)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn update(&self, id: &str, patch: &ScheduleRulePatch) -> Result<ScheduleRule, AppError> {
        sqlx::query_as::<_, ScheduleRule>(
            "UPDATE schedule_rules SET
                priority = COALESCE(?, priority),
                day_of_week = COALESCE(?, day_of_week),
                specific_date = COALESCE(?, specific_date),
                month = COALESCE(?, month),
                year = COALESCE(?, year),
                start_time = COALESCE(?, start_time),
                end_time = COALESCE(?, end_time),
                is_available = COALESCE(?, is_available),
                max_concurrent_appointments = COALESCE(?, max_concurrent_appointments)
             WHERE id = ? AND deleted_at IS NULL
             RETURNING *"
        )
            .bind(patch.priority).bind(patch.day_of_week).bind(patch.specific_date)
            .bind(patch.month).bind(patch.year).bind(patch.start_time).bind(patch.end_time)
            .bind(patch.is_available).bind(patch.max_concurrent_appointments)
            .bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Schedule rule not found".into()))
    }
    async fn soft_delete(&self, storefront_id: &str, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE schedule_rules SET deleted_at = ? WHERE id = ? AND storefront_id = ? AND deleted_at IS NULL")
            .bind(Utc::now()).bind(id).bind(storefront_id)
            .execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Schedule rule not found".into()));
        }
        Ok(())
    }
}
