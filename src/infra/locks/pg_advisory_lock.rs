use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::{Connection, PgPool, Postgres};
use tracing::warn;
use crate::domain::ports::{SlotLockGuard, SlotLockManager};
use crate::error::AppError;

/// Session-scoped Postgres advisory locks held on a dedicated pooled
/// connection. The happy path unlocks explicitly and returns the
/// connection to the pool; any other path closes the connection, which
/// makes the server release every session lock it held. Either way a
/// bucket can never stay wedged after the request ends.
pub struct PgAdvisorySlotLock {
    pool: PgPool,
}

impl PgAdvisorySlotLock {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub struct PgAdvisoryLockGuard {
    conn: Option<PoolConnection<Postgres>>,
    key: i64,
}

#[async_trait]
impl SlotLockGuard for PgAdvisoryLockGuard {
    async fn release(mut self: Box<Self>) -> Result<(), AppError> {
        if let Some(mut conn) = self.conn.take() {
            if let Err(e) = sqlx::query("SELECT pg_advisory_unlock($1)")
                .bind(self.key)
                .execute(&mut *conn)
                .await
            {
                // Do not hand a still-locked connection back to the pool.
                let _ = conn.detach().close().await;
                return Err(AppError::Database(e));
            }
        }
        Ok(())
    }
}

impl Drop for PgAdvisoryLockGuard {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            warn!("Slot lock {} dropped without release; closing its connection", self.key);
            tokio::spawn(async move {
                let _ = conn.detach().close().await;
            });
        }
    }
}

#[async_trait]
impl SlotLockManager for PgAdvisorySlotLock {
    async fn acquire(&self, key: i64) -> Result<Box<dyn SlotLockGuard>, AppError> {
        let mut conn = self.pool.acquire().await.map_err(AppError::Database)?;

        sqlx::query("SELECT pg_advisory_lock($1)")
            .bind(key)
            .execute(&mut *conn)
            .await
            .map_err(AppError::Database)?;

        Ok(Box::new(PgAdvisoryLockGuard {
            conn: Some(conn),
            key,
        }))
    }
}
