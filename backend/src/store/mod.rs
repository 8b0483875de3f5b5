pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{AnalysisRecord, Direction, UniverseBounds};

pub use memory::InMemoryAnalysisStore;
pub use postgres::PgAnalysisStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Database(#[from] sqlx::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Shape of the backing table, reported once at startup.
#[derive(Debug, Clone, Default)]
pub struct StoreDescription {
    pub columns: Vec<(String, String)>,
    pub row_count: i64,
}

/// Read access to transcript analyses.
///
/// Every record returned has its structured sections already decoded.
#[async_trait]
pub trait AnalysisStore: Send + Sync {
    /// Latest record of the nearest symbol strictly after (`Next`) or
    /// before (`Previous`) `term`, compared byte-wise as stored.
    async fn latest_adjacent(
        &self,
        term: &str,
        direction: Direction,
    ) -> Result<Option<AnalysisRecord>, StoreError>;

    /// Latest record whose symbol equals `term` ignoring case.
    async fn latest_for_symbol(&self, term: &str) -> Result<Option<AnalysisRecord>, StoreError>;

    /// Latest record of the alphabetically first symbol.
    async fn first_latest(&self) -> Result<Option<AnalysisRecord>, StoreError>;

    async fn universe_bounds(&self) -> Result<UniverseBounds, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;

    async fn describe(&self) -> Result<StoreDescription, StoreError>;

    /// Release underlying resources. Called once during shutdown.
    async fn close(&self) {}
}
