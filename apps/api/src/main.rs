mod acquisition;
mod boards;
mod config;
mod errors;
mod layout;
mod models;
mod provider;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::acquisition::AcquisitionPlanner;
use crate::config::Config;
use crate::provider::UnsplashClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Board API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize image provider
    let provider = UnsplashClient::new(
        config.unsplash_access_key.clone(),
        config.unsplash_base_url.clone(),
    )?;
    info!("Image provider initialized ({})", config.unsplash_base_url);

    let settings = config.planner_settings();
    info!(
        "Acquisition settings: page_size={} max_pages={}",
        settings.page_size, settings.max_pages
    );

    let state = AppState {
        planner: AcquisitionPlanner::new(Arc::new(provider), settings),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
