mod booking;
mod config;
mod dashboard;
mod dates;
mod error;
mod health_az;
mod middleware;
mod models;
mod reports;
mod routes;
mod services;
mod sessions;
mod upstream;
mod view;

use std::sync::Arc;

use crate::{
    config::Config,
    models::{local_today, AppState},
    services::ServiceCatalog,
    sessions::SessionStore,
    upstream::HttpPharmacyApi,
};

use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use axum::http::header;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cfg = Config::from_env()?;
    let upstream = HttpPharmacyApi::new(&cfg.upstream_base_url, cfg.upstream_timeout)?;
    let services = ServiceCatalog::new(cfg.booking_services.clone().unwrap_or_default());
    tracing::info!(
        upstream = %cfg.upstream_base_url,
        services = services.names().len(),
        "pharmacy frontend configured"
    );

    let state = AppState {
        upstream: Arc::new(upstream),
        services: Arc::new(services),
        wizards: SessionStore::new(cfg.session_ttl),
        calendars: SessionStore::new(cfg.session_ttl),
        reports: SessionStore::new(cfg.session_ttl),
        reports_default_days: cfg.reports_default_days,
        today: local_today,
    };

    // DEV ONLY: the browser shell may be served from another origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::COOKIE]);

    let app = routes::router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    tracing::info!("Listening on http://{}", cfg.bind_addr);
    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
