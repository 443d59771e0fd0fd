use crate::domain::{models::storefront::Storefront, ports::StorefrontRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresStorefrontRepo {
    pool: PgPool,
}

impl PostgresStorefrontRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StorefrontRepository for PostgresStorefrontRepo {
    async fn create(&self, storefront: &Storefront) -> Result<Storefront, AppError> {
        sqlx::query_as::<_, Storefront>(
            "INSERT INTO storefronts (id, vendor_id, name, timezone, location_type, created_at, deleted_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING *"
        )
            .bind(&storefront.id).bind(&storefront.vendor_id).bind(&storefront.name)
            .bind(&storefront.timezone).bind(&storefront.location_type)
            .bind(storefront.created_at).bind(storefront.deleted_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_by_id(&self, id: &str) -> Result<Option<Storefront>, AppError> {
        sqlx::query_as::<_, Storefront>("SELECT * FROM storefronts WHERE id = $1 AND deleted_at IS NULL")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
}
