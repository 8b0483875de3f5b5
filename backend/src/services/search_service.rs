use tracing::{debug, info};

use crate::errors::AppError;
use crate::models::{NavigationResponse, SearchMode, SearchParams};
use crate::store::AnalysisStore;

/// Resolve a search/navigation request to at most one record.
///
/// Issues one store read to resolve the record and, only when one was found,
/// a second read for the universe bounds. An unresolvable request is an empty
/// result rather than an error.
pub async fn search_companies(
    store: &dyn AnalysisStore,
    params: &SearchParams,
) -> Result<Vec<NavigationResponse>, AppError> {
    let mode = SearchMode::from_params(params);
    debug!("Resolved search mode: {:?}", mode);

    let record = match &mode {
        SearchMode::Move { term, direction } => store.latest_adjacent(term, *direction).await?,
        SearchMode::Lookup { term } => store.latest_for_symbol(term).await?,
        SearchMode::Default => store.first_latest().await?,
    };

    let Some(record) = record else {
        info!("🔍 No result for {} search {:?}", mode.name(), params);
        return Ok(Vec::new());
    };

    let bounds = store.universe_bounds().await?;
    let navigation = bounds.context_for(&record.symbol);

    info!(
        "🔍 {} search resolved {} ({}) first={} last={} total={}",
        mode.name(),
        record.symbol,
        record.date,
        navigation.is_first,
        navigation.is_last,
        navigation.total_stocks
    );

    Ok(vec![NavigationResponse { record, navigation }])
}
