use crate::domain::{models::service::Service, ports::ServiceRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresServiceRepo {
    pool: PgPool,
}

impl PostgresServiceRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ServiceRepository for PostgresServiceRepo {
    async fn create(&self, service: &Service) -> Result<Service, AppError> {
        sqlx::query_as::<_, Service>(
            "INSERT INTO services (id, storefront_id, name, duration_minutes, buffer_time_minutes, price, is_active, created_at, deleted_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING *"
        )
            .bind(&service.id).bind(&service.storefront_id).bind(&service.name)
            .bind(service.duration_minutes).bind(service.buffer_time_minutes)
            .bind(service.price).bind(service.is_active)
            .bind(service.created_at).bind(service.deleted_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_by_id(&self, id: &str) -> Result<Option<Service>, AppError> {
        sqlx::query_as::<_, Service>("SELECT * FROM services WHERE id = $1 AND deleted_at IS NULL")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_by_storefront(&self, storefront_id: &str) -> Result<Vec<Service>, AppError> {
        sqlx::query_as::<_, Service>("SELECT * FROM services WHERE storefront_id = $1 AND deleted_at IS NULL ORDER BY name ASC")
            .bind(storefront_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}
