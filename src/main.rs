// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use anyhow::Context;
use std::{net::SocketAddr, sync::Arc};
use tracing_subscriber::EnvFilter;

use crate::application::forecast_service::ForecastService;
use crate::application::report_service::ReportService;
use crate::application::sinks::ReportRepository;
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::object_photo_store::ObjectPhotoStore;
use crate::infrastructure::postgres_reports::{LoggingReportRepository, PostgresReportRepository};
use crate::infrastructure::surfline_client::SurflineClient;
use crate::presentation::app_state::AppState;
use crate::presentation::router::build_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("surf_forecast=info,tower_http=info")),
        )
        .init();

    // Load configuration
    let config = load_app_config()?;
    let timezone = config.forecast.timezone()?;
    let spots = Arc::new(config.spot_directory());

    // Create adapters (infrastructure layer)
    let source = Arc::new(SurflineClient::new(&config.forecast)?);
    let photos = Arc::new(ObjectPhotoStore::from_settings(&config.storage)?);
    let reports: Arc<dyn ReportRepository> = match &config.database.url {
        Some(url) => Arc::new(
            PostgresReportRepository::connect(url, config.database.max_connections).await?,
        ),
        None => {
            tracing::warn!("database.url not set; reports will not be persisted");
            Arc::new(LoggingReportRepository)
        }
    };

    // Create services (application layer)
    let forecast_service =
        ForecastService::new(source, spots, timezone, config.forecast.default_spot());
    let report_service = ReportService::new(
        forecast_service.clone(),
        photos,
        reports,
        config.storage.timestamped_keys,
    );

    let state = Arc::new(AppState {
        forecast_service,
        report_service,
    });

    // Build router (presentation layer)
    let router = build_router(state);

    // Start server
    let addr: SocketAddr = config
        .server
        .bind_address
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.server.bind_address))?;
    tracing::info!(%addr, "Starting surf-forecast service");

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
