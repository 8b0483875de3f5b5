use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::{NavigationResponse, SearchParams, SearchQuery};
use crate::services::search_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/search", get(search_companies))
}

async fn search_companies(
    State(state): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<Vec<NavigationResponse>>, AppError> {
    let Query(query) = query.map_err(|e| AppError::Validation(e.body_text()))?;
    info!(
        "GET /api/companies/search - term={:?} direction={:?}",
        query.term, query.direction
    );

    let params = SearchParams::try_from(query).map_err(AppError::Validation)?;

    let results = search_service::search_companies(state.store.as_ref(), &params)
        .await
        .map_err(|e| {
            error!("❌ Search failed for {:?}: {}", params, e);
            e
        })?;

    Ok(Json(results))
}
