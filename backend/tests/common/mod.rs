#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use earnings_dashboard::models::{AnalysisRecord, AnalysisRow, Direction, UniverseBounds};
use earnings_dashboard::store::{AnalysisStore, InMemoryAnalysisStore, StoreDescription, StoreError};

pub fn analysis_row(id: i64, symbol: &str, date: &str) -> AnalysisRow {
    AnalysisRow {
        id,
        symbol: symbol.to_string(),
        company_name: Some(format!("{} Corp", symbol)),
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        analysis_period: Some("Q1 2024".to_string()),
        financial_highlights: Some(
            r#"{"otherMetrics":[{"metricName":"Revenue","currentPeriod":"$2.1B","previousPeriod":"$1.9B","change":"+10.5%"}]}"#
                .to_string(),
        ),
        key_insights: Some(r#"["Pricing power intact","Inventory normalised"]"#.to_string()),
        risks_and_challenges: Some(r#"["Supply constraints"]"#.to_string()),
        opportunities: Some(r#"["International expansion"]"#.to_string()),
        significant_quotes: Some(r#"[{"quote":"We see durable demand","speaker":"CEO"}]"#.to_string()),
        sentiment_summary: Some("Positive".to_string()),
        sentiment_explanation: Some("Management sounded confident.".to_string()),
    }
}

/// Universe {AAA, BBB, CCC}, one call each.
pub fn abc_store() -> InMemoryAnalysisStore {
    InMemoryAnalysisStore::new(vec![
        analysis_row(1, "AAA", "2024-01-10"),
        analysis_row(2, "BBB", "2024-01-11"),
        analysis_row(3, "CCC", "2024-01-12"),
    ])
}

/// Several calls per symbol, inserted out of order.
pub fn history_store() -> InMemoryAnalysisStore {
    InMemoryAnalysisStore::new(vec![
        analysis_row(10, "MSFT", "2023-07-25"),
        analysis_row(11, "AAPL", "2024-02-01"),
        analysis_row(12, "MSFT", "2024-01-30"),
        analysis_row(13, "NVDA", "2023-11-21"),
        analysis_row(14, "AAPL", "2023-11-02"),
        analysis_row(15, "AMD", "2024-01-30"),
        analysis_row(16, "NVDA", "2024-02-21"),
        analysis_row(17, "MSFT", "2023-10-24"),
    ])
}

/// Store whose every query fails like a dropped connection.
pub struct FailingStore;

fn down() -> StoreError {
    StoreError::Unavailable("connection refused".to_string())
}

#[async_trait]
impl AnalysisStore for FailingStore {
    async fn latest_adjacent(&self, _: &str, _: Direction) -> Result<Option<AnalysisRecord>, StoreError> {
        Err(down())
    }

    async fn latest_for_symbol(&self, _: &str) -> Result<Option<AnalysisRecord>, StoreError> {
        Err(down())
    }

    async fn first_latest(&self) -> Result<Option<AnalysisRecord>, StoreError> {
        Err(down())
    }

    async fn universe_bounds(&self) -> Result<UniverseBounds, StoreError> {
        Err(down())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(down())
    }

    async fn describe(&self) -> Result<StoreDescription, StoreError> {
        Err(down())
    }
}
