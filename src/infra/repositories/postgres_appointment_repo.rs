use crate::domain::{models::appointment::{Appointment, AppointmentPatch}, ports::AppointmentRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};

pub struct PostgresAppointmentRepo {
    pool: PgPool,
}

impl PostgresAppointmentRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AppointmentRepository for PostgresAppointmentRepo {
    async fn create(&self, appointment: &Appointment) -> Result<Appointment, AppError> {
        sqlx::query_as::<_, Appointment>(
            "INSERT INTO appointments (id, client_id, storefront_id, service_id, drop_id, requested_start_datetime, requested_end_datetime, confirmed_start_datetime, confirmed_end_datetime, status, client_notes, vendor_notes, internal_notes, price_quoted, price_final, service_location_type, client_address, created_at, deleted_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
             RETURNING *"
        )
            .bind(&appointment.id).bind(&appointment.client_id).bind(&appointment.storefront_id)
            .bind(&appointment.service_id).bind(&appointment.drop_id)
            .bind(appointment.requested_start_datetime).bind(appointment.requested_end_datetime)
            .bind(appointment.confirmed_start_datetime).bind(appointment.confirmed_end_datetime)
            .bind(&appointment.status).bind(&appointment.client_notes).bind(&appointment.vendor_notes)
            .bind(&appointment.internal_notes).bind(appointment.price_quoted).bind(appointment.price_final)
            .bind(&appointment.service_location_type).bind(&appointment.client_address)
            .bind(appointment.created_at).bind(appointment.deleted_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_by_id(&self, id: &str) -> Result<Option<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE id = $1 AND deleted_at IS NULL")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_overlapping(&self, storefront_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments WHERE storefront_id = $1 AND requested_start_datetime < $2 AND requested_end_datetime > $3 AND status IN ('pending', 'confirmed') AND deleted_at IS NULL"
        )
            .bind(storefront_id).bind(end).bind(start)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn count_overlapping(&self, storefront_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<i64, AppError> {
        let result = sqlx::query(
            "SELECT COUNT(*) as count FROM appointments WHERE storefront_id = $1 AND requested_start_datetime < $2 AND requested_end_datetime > $3 AND status IN ('pending', 'confirmed') AND deleted_at IS NULL"
        )
            .bind(storefront_id).bind(end).bind(start)
            .fetch_one(&self.pool).await.map_err(AppError::Database)?;
        Ok(result.get::<i64, _>("count"))
    }
    async fn list_by_storefront(&self, storefront_id: &str) -> Result<Vec<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE storefront_id = $1 AND deleted_at IS NULL ORDER BY requested_start_datetime ASC")
            .bind(storefront_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn update(&self, id: &str, patch: &AppointmentPatch) -> Result<Appointment, AppError> {
        sqlx::query_as::<_, Appointment>(
            "UPDATE appointments SET
                status = COALESCE($1, status),
                client_notes = COALESCE($2, client_notes),
                vendor_notes = COALESCE($3, vendor_notes),
                internal_notes = COALESCE($4, internal_notes),
                confirmed_start_datetime = COALESCE($5, confirmed_start_datetime),
                confirmed_end_datetime = COALESCE($6, confirmed_end_datetime),
                price_final = COALESCE($7, price_final)
             WHERE id = $8 AND deleted_at IS NULL
             RETURNING *"
        )
            .bind(&patch.status).bind(&patch.client_notes).bind(&patch.vendor_notes)
            .bind(&patch.internal_notes).bind(patch.confirmed_start_datetime)
            .bind(patch.confirmed_end_datetime).bind(patch.price_final)
            .bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Appointment not found".into()))
    }
}
