//! Application state

use chrono_tz::Tz;
use shared::models::AdmissionWindow;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::auth::AdminCredentials;
use crate::config::Config;
use crate::db::PgStore;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub pool: PgPool,
    pub admin: AdminCredentials,
    /// Absolute base URL for check-in links
    pub base_url: String,
    /// `Cache-Control` max-age of public event pages
    pub event_revalidate_secs: u64,
    pub org_timezone: Tz,
    /// Window that gates self-service check-in
    pub admission_window: AdmissionWindow,
}

impl AppState {
    /// Connect, run migrations and build the state
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");

        Ok(Self::with_pool(pool, config))
    }

    pub fn with_pool(pool: PgPool, config: &Config) -> Self {
        Self {
            pool,
            admin: AdminCredentials::new(&config.admin_username, &config.admin_password),
            base_url: config.base_url.clone(),
            event_revalidate_secs: config.event_revalidate_secs,
            org_timezone: config.org_timezone,
            admission_window: AdmissionWindow::Form,
        }
    }

    pub fn store(&self) -> PgStore {
        PgStore::new(self.pool.clone())
    }

    /// Absolute self-service check-in URL of an event page (QR code target)
    pub fn checkin_url(&self, page_id: &str) -> String {
        format!("{}/events/{page_id}/checkin", self.base_url)
    }
}
