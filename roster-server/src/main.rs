//! roster-server: student organization membership service
//!
//! - Public event pages and self-service check-in
//! - Member registration and profile updates
//! - Admin API for members, events, check-ins and attendance statistics

mod api;
mod auth;
mod config;
mod db;
mod error;
mod logger;
mod services;
mod state;
mod time;

use config::Config;
use state::AppState;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;

    let _log_guard = logger::init_logger(config.log_dir.as_deref());

    tracing::info!(
        "Starting roster-server (env: {}, tz: {})",
        config.environment,
        config.org_timezone.name()
    );

    let state = AppState::new(&config).await?;
    let app = api::build_app(state);

    let http_addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&http_addr).await?;
    tracing::info!("roster-server HTTP listening on {http_addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("roster-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
