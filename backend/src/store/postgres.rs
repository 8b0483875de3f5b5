use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use crate::config::{ConfigError, DatabaseConfig};
use crate::db::analysis_queries;
use crate::models::{AnalysisRecord, Direction, UniverseBounds};
use crate::store::{AnalysisStore, StoreDescription, StoreError};

/// [`AnalysisStore`] over a Postgres connection pool.
#[derive(Clone)]
pub struct PgAnalysisStore {
    pool: PgPool,
}

#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to connect to database: {0}")]
    Database(#[from] sqlx::Error),
}

impl PgAnalysisStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(config: &DatabaseConfig) -> Result<Self, ConnectError> {
        let options = config.connect_options()?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect_with(options)
            .await?;

        info!("🗄️ Connected to database (max {} connections)", config.max_connections);
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl AnalysisStore for PgAnalysisStore {
    async fn latest_adjacent(
        &self,
        term: &str,
        direction: Direction,
    ) -> Result<Option<AnalysisRecord>, StoreError> {
        let row = analysis_queries::fetch_adjacent_latest(&self.pool, term, direction).await?;
        Ok(row.map(AnalysisRecord::from_row))
    }

    async fn latest_for_symbol(&self, term: &str) -> Result<Option<AnalysisRecord>, StoreError> {
        let row = analysis_queries::fetch_latest_for_symbol(&self.pool, term).await?;
        Ok(row.map(AnalysisRecord::from_row))
    }

    async fn first_latest(&self) -> Result<Option<AnalysisRecord>, StoreError> {
        let row = analysis_queries::fetch_first_latest(&self.pool).await?;
        Ok(row.map(AnalysisRecord::from_row))
    }

    async fn universe_bounds(&self) -> Result<UniverseBounds, StoreError> {
        Ok(analysis_queries::fetch_universe_bounds(&self.pool).await?)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(analysis_queries::ping(&self.pool).await?)
    }

    async fn describe(&self) -> Result<StoreDescription, StoreError> {
        let columns = analysis_queries::fetch_table_columns(&self.pool)
            .await?
            .into_iter()
            .map(|c| (c.column_name, c.data_type))
            .collect();
        let row_count = analysis_queries::count_rows(&self.pool).await?;

        Ok(StoreDescription { columns, row_count })
    }

    async fn close(&self) {
        info!("🗄️ Closing database pool");
        self.pool.close().await;
    }
}
