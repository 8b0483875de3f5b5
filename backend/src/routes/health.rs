use axum::{extract::State, routing::get, Router};
use tracing::{error, info};

use crate::errors::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(health))
}

async fn health(State(state): State<AppState>) -> Result<&'static str, AppError> {
    info!("GET /health - Health check");

    state.store.ping().await.map_err(|e| {
        error!("❌ Health check failed: {}", e);
        AppError::Unavailable(e.to_string())
    })?;

    Ok("OK")
}
