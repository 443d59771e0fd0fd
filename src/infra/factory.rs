use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::state::AppState;
use crate::domain::services::availability::AvailabilityService;
use crate::domain::services::booking::BookingService;
use crate::infra::locks::{local_lock::LocalSlotLock, pg_advisory_lock::PgAdvisorySlotLock};
use crate::infra::repositories::{
    postgres_appointment_repo::PostgresAppointmentRepo,
    postgres_schedule_rule_repo::PostgresScheduleRuleRepo,
    postgres_service_repo::PostgresServiceRepo,
    postgres_storefront_repo::PostgresStorefrontRepo,
    sqlite_appointment_repo::SqliteAppointmentRepo,
    sqlite_schedule_rule_repo::SqliteScheduleRuleRepo,
    sqlite_service_repo::SqliteServiceRepo,
    sqlite_storefront_repo::SqliteStorefrontRepo,
};

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;

    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;

        let storefront_repo = Arc::new(PostgresStorefrontRepo::new(pool.clone()));
        let service_repo = Arc::new(PostgresServiceRepo::new(pool.clone()));
        let rule_repo = Arc::new(PostgresScheduleRuleRepo::new(pool.clone()));
        let appointment_repo = Arc::new(PostgresAppointmentRepo::new(pool.clone()));
        let slot_lock = Arc::new(PgAdvisorySlotLock::new(pool.clone()));

        let availability = Arc::new(AvailabilityService::new(
            storefront_repo.clone(),
            service_repo.clone(),
            rule_repo.clone(),
            appointment_repo.clone(),
        ));
        let booking = Arc::new(BookingService::new(
            storefront_repo.clone(),
            service_repo.clone(),
            appointment_repo.clone(),
            availability.clone(),
            slot_lock.clone(),
        ));

        AppState {
            config: config.clone(),
            storefront_repo,
            service_repo,
            rule_repo,
            appointment_repo,
            slot_lock,
            availability,
            booking,
        }
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;

        let storefront_repo = Arc::new(SqliteStorefrontRepo::new(pool.clone()));
        let service_repo = Arc::new(SqliteServiceRepo::new(pool.clone()));
        let rule_repo = Arc::new(SqliteScheduleRuleRepo::new(pool.clone()));
        let appointment_repo = Arc::new(SqliteAppointmentRepo::new(pool.clone()));
        let slot_lock = Arc::new(LocalSlotLock::new());

        let availability = Arc::new(AvailabilityService::new(
            storefront_repo.clone(),
            service_repo.clone(),
            rule_repo.clone(),
            appointment_repo.clone(),
        ));
        let booking = Arc::new(BookingService::new(
            storefront_repo.clone(),
            service_repo.clone(),
            appointment_repo.clone(),
            availability.clone(),
            slot_lock.clone(),
        ));

        AppState {
            config: config.clone(),
            storefront_repo,
            service_repo,
            rule_repo,
            appointment_repo,
            slot_lock,
            availability,
            booking,
        }
    }
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
