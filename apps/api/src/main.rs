mod config;
mod errors;
mod ingest;
mod model;
mod normalize;
mod resume;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::model::{CategoryPredictor, TrainedArtifacts};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume classifier v{}", env!("CARGO_PKG_VERSION"));

    // Load the trained artifacts once; refuse to serve without a consistent model.
    let paths = config.artifact_paths();
    info!("Loading trained artifacts from {}", config.artifact_dir.display());
    let artifacts = TrainedArtifacts::load(&paths).context("Failed to load trained artifacts")?;
    let predictor = CategoryPredictor::new(Arc::new(artifacts));

    let state = AppState {
        config: config.clone(),
        predictor,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
