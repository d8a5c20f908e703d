use crate::config::Config;
use crate::model::CategoryPredictor;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Loaded once at startup; read-only for the life of the process.
    pub predictor: CategoryPredictor,
}
