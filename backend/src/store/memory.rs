use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;

use async_trait::async_trait;

use crate::models::{AnalysisRecord, AnalysisRow, Direction, UniverseBounds};
use crate::store::{AnalysisStore, StoreDescription, StoreError};

/// [`AnalysisStore`] over a fixed set of rows held in memory.
///
/// Follows the same ordering and tie-breaking rules as the Postgres store.
#[derive(Clone, Default)]
pub struct InMemoryAnalysisStore {
    rows: Arc<Vec<AnalysisRow>>,
}

impl InMemoryAnalysisStore {
    pub fn new(rows: Vec<AnalysisRow>) -> Self {
        Self { rows: Arc::new(rows) }
    }

    /// Most recent row per symbol, keyed and ordered by symbol bytes.
    fn latest_records(&self) -> BTreeMap<&str, &AnalysisRow> {
        let mut latest: BTreeMap<&str, &AnalysisRow> = BTreeMap::new();

        for row in self.rows.iter() {
            latest
                .entry(row.symbol.as_str())
                .and_modify(|current| {
                    if is_newer(row, *current) {
                        *current = row;
                    }
                })
                .or_insert(row);
        }

        latest
    }
}

fn is_newer(candidate: &AnalysisRow, current: &AnalysisRow) -> bool {
    (candidate.date, candidate.id) > (current.date, current.id)
}

#[async_trait]
impl AnalysisStore for InMemoryAnalysisStore {
    async fn latest_adjacent(
        &self,
        term: &str,
        direction: Direction,
    ) -> Result<Option<AnalysisRecord>, StoreError> {
        let latest = self.latest_records();

        let row = match direction {
            Direction::Next => latest
                .range::<str, _>((Bound::Excluded(term), Bound::Unbounded))
                .next(),
            Direction::Previous => latest
                .range::<str, _>((Bound::Unbounded, Bound::Excluded(term)))
                .next_back(),
        };

        Ok(row.map(|(_, row)| AnalysisRecord::from_row((*row).clone())))
    }

    async fn latest_for_symbol(&self, term: &str) -> Result<Option<AnalysisRecord>, StoreError> {
        let wanted = term.to_uppercase();

        let row = self
            .rows
            .iter()
            .filter(|row| row.symbol.to_uppercase() == wanted)
            .fold(None::<&AnalysisRow>, |best, row| match best {
                Some(current) if !is_newer(row, current) => Some(current),
                _ => Some(row),
            });

        Ok(row.cloned().map(AnalysisRecord::from_row))
    }

    async fn first_latest(&self) -> Result<Option<AnalysisRecord>, StoreError> {
        let latest = self.latest_records();
        Ok(latest
            .values()
            .next()
            .map(|row| AnalysisRecord::from_row((*row).clone())))
    }

    async fn universe_bounds(&self) -> Result<UniverseBounds, StoreError> {
        let latest = self.latest_records();

        Ok(UniverseBounds {
            total: latest.len() as i64,
            first_symbol: latest.keys().next().map(|s| s.to_string()),
            last_symbol: latest.keys().next_back().map(|s| s.to_string()),
        })
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn describe(&self) -> Result<StoreDescription, StoreError> {
        Ok(StoreDescription {
            columns: Vec::new(),
            row_count: self.rows.len() as i64,
        })
    }
}
