use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::models::{AnalysisRow, Direction, UniverseBounds};

// Symbols compare byte-wise (COLLATE "C") so ordering does not depend on the
// database locale. JSON sections are cast to TEXT so json/jsonb columns decode
// the same way as text ones.

/// One row per symbol: its most recent analysis.
const LATEST_RECORDS_CTE: &str = r#"
    WITH latest_records AS (
        SELECT DISTINCT ON (symbol)
            id::BIGINT AS id,
            symbol,
            company_name,
            date::DATE AS date,
            analysis_period,
            financial_highlights::TEXT AS financial_highlights,
            key_insights::TEXT AS key_insights,
            risks_and_challenges::TEXT AS risks_and_challenges,
            opportunities::TEXT AS opportunities,
            significant_quotes::TEXT AS significant_quotes,
            sentiment_summary,
            sentiment_explanation
        FROM transcript_analyses
        ORDER BY symbol, date DESC, id DESC
    )
"#;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ColumnInfo {
    pub column_name: String,
    pub data_type: String,
}

// ==============================================================================
// Record Resolution
// ==============================================================================

pub async fn fetch_adjacent_latest(
    pool: &PgPool,
    term: &str,
    direction: Direction,
) -> Result<Option<AnalysisRow>, sqlx::Error> {
    let (operator, order) = match direction {
        Direction::Next => (">", "ASC"),
        Direction::Previous => ("<", "DESC"),
    };

    let mut query_builder: QueryBuilder<Postgres> = QueryBuilder::new(LATEST_RECORDS_CTE);
    query_builder.push(format!(
        " SELECT * FROM latest_records WHERE symbol COLLATE \"C\" {} ",
        operator
    ));
    query_builder.push_bind(term);
    query_builder.push(format!(" ORDER BY symbol COLLATE \"C\" {} LIMIT 1", order));

    query_builder
        .build_query_as::<AnalysisRow>()
        .fetch_optional(pool)
        .await
}

pub async fn fetch_latest_for_symbol(
    pool: &PgPool,
    term: &str,
) -> Result<Option<AnalysisRow>, sqlx::Error> {
    sqlx::query_as::<_, AnalysisRow>(
        r#"
        SELECT
            id::BIGINT AS id,
            symbol,
            company_name,
            date::DATE AS date,
            analysis_period,
            financial_highlights::TEXT AS financial_highlights,
            key_insights::TEXT AS key_insights,
            risks_and_challenges::TEXT AS risks_and_challenges,
            opportunities::TEXT AS opportunities,
            significant_quotes::TEXT AS significant_quotes,
            sentiment_summary,
            sentiment_explanation
        FROM transcript_analyses
        WHERE UPPER(symbol) = UPPER($1)
        ORDER BY date DESC, id DESC
        LIMIT 1
        "#,
    )
    .bind(term)
    .fetch_optional(pool)
    .await
}

pub async fn fetch_first_latest(pool: &PgPool) -> Result<Option<AnalysisRow>, sqlx::Error> {
    let sql = format!(
        "{} SELECT * FROM latest_records ORDER BY symbol COLLATE \"C\" ASC LIMIT 1",
        LATEST_RECORDS_CTE
    );

    sqlx::query_as::<_, AnalysisRow>(&sql)
        .fetch_optional(pool)
        .await
}

// ==============================================================================
// Universe Metadata
// ==============================================================================

pub async fn fetch_universe_bounds(pool: &PgPool) -> Result<UniverseBounds, sqlx::Error> {
    sqlx::query_as::<_, UniverseBounds>(
        r#"
        WITH symbols AS (
            SELECT DISTINCT symbol COLLATE "C" AS symbol
            FROM transcript_analyses
        )
        SELECT
            COUNT(*)::BIGINT AS total,
            MIN(symbol) AS first_symbol,
            MAX(symbol) AS last_symbol
        FROM symbols
        "#,
    )
    .fetch_one(pool)
    .await
}

// ==============================================================================
// Diagnostics
// ==============================================================================

pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

pub async fn fetch_table_columns(pool: &PgPool) -> Result<Vec<ColumnInfo>, sqlx::Error> {
    sqlx::query_as::<_, ColumnInfo>(
        r#"
        SELECT column_name::TEXT AS column_name, data_type::TEXT AS data_type
        FROM information_schema.columns
        WHERE table_name = 'transcript_analyses'
        ORDER BY ordinal_position
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn count_rows(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*)::BIGINT FROM transcript_analyses")
        .fetch_one(pool)
        .await
}
