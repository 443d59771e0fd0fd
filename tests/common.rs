use marketplace_backend::{
    api::router::create_router,
    state::AppState,
    config::Config,
    domain::models::schedule_rule::{NewScheduleRuleParams, ScheduleRule},
    domain::models::service::{NewServiceParams, Service},
    domain::models::storefront::Storefront,
    domain::services::availability::AvailabilityService,
    domain::services::booking::BookingService,
    infra::locks::local_lock::LocalSlotLock,
    infra::repositories::{
        sqlite_appointment_repo::SqliteAppointmentRepo,
        sqlite_schedule_rule_repo::SqliteScheduleRuleRepo,
        sqlite_service_repo::SqliteServiceRepo,
        sqlite_storefront_repo::SqliteStorefrontRepo,
    },
};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::str::FromStr;
use std::sync::Arc;
use axum::Router;
use chrono::NaiveTime;
use uuid::Uuid;

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

#[allow(dead_code)]
pub struct RuleSpec<'a> {
    pub service_id: Option<&'a str>,
    pub rule_type: &'a str,
    pub priority: i32,
    pub day_of_week: Option<i32>,
    pub specific_date: Option<chrono::NaiveDate>,
    pub month: Option<i32>,
    pub year: Option<i32>,
    pub start: &'a str,
    pub end: &'a str,
    pub is_available: bool,
    pub max_concurrent: i32,
}

#[allow(dead_code)]
impl<'a> RuleSpec<'a> {
    /// Baseline open-hours rule: weekly, priority 0, capacity 1.
    pub fn weekly(day_of_week: i32, start: &'a str, end: &'a str) -> Self {
        Self {
            service_id: None,
            rule_type: "weekly",
            priority: 0,
            day_of_week: Some(day_of_week),
            specific_date: None,
            month: None,
            year: None,
            start,
            end,
            is_available: true,
            max_concurrent: 1,
        }
    }

    pub fn daily(date: chrono::NaiveDate, start: &'a str, end: &'a str) -> Self {
        Self {
            service_id: None,
            rule_type: "daily",
            priority: 0,
            day_of_week: None,
            specific_date: Some(date),
            month: None,
            year: None,
            start,
            end,
            is_available: true,
            max_concurrent: 1,
        }
    }

    pub fn monthly(month: i32, start: &'a str, end: &'a str) -> Self {
        Self {
            service_id: None,
            rule_type: "monthly",
            priority: 0,
            day_of_week: None,
            specific_date: None,
            month: Some(month),
            year: None,
            start,
            end,
            is_available: true,
            max_concurrent: 1,
        }
    }

    pub fn in_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn closed(mut self) -> Self {
        self.is_available = false;
        self
    }

    pub fn capacity(mut self, max_concurrent: i32) -> Self {
        self.max_concurrent = max_concurrent;
        self
    }

    pub fn for_service(mut self, service_id: &'a str) -> Self {
        self.service_id = Some(service_id);
        self
    }
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
        };

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

        let state = Arc::new(AppState {
            config,
            storefront_repo,
            service_repo,
            rule_repo,
            appointment_repo,
            slot_lock,
            availability,
            booking,
        });

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    pub async fn seed_storefront(&self, timezone: &str, location_type: &str) -> Storefront {
        let storefront = Storefront::new(
            Uuid::new_v4().to_string(),
            "Test Storefront".to_string(),
            timezone.to_string(),
            location_type.to_string(),
        );
        self.state.storefront_repo.create(&storefront).await.unwrap()
    }

    pub async fn seed_service(&self, storefront_id: &str, duration: i32, buffer: i32) -> Service {
        let service = Service::new(NewServiceParams {
            storefront_id: storefront_id.to_string(),
            name: "Test Service".to_string(),
            duration_minutes: duration,
            buffer_time_minutes: buffer,
            price: 5000,
        });
        self.state.service_repo.create(&service).await.unwrap()
    }

    pub async fn seed_rule(&self, storefront_id: &str, spec: RuleSpec<'_>) -> ScheduleRule {
        let rule = ScheduleRule::new(NewScheduleRuleParams {
            storefront_id: storefront_id.to_string(),
            service_id: spec.service_id.map(|s| s.to_string()),
            rule_type: spec.rule_type.to_string(),
            priority: spec.priority,
            day_of_week: spec.day_of_week,
            specific_date: spec.specific_date,
            month: spec.month,
            year: spec.year,
            start_time: NaiveTime::parse_from_str(spec.start, "%H:%M").unwrap(),
            end_time: NaiveTime::parse_from_str(spec.end, "%H:%M").unwrap(),
            is_available: spec.is_available,
            max_concurrent_appointments: spec.max_concurrent,
        });
        rule.validate().unwrap();
        self.state.rule_repo.create(&rule).await.unwrap()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}
