use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

/// Raw row of `transcript_analyses` as it comes out of storage.
///
/// Structured fields are still JSON text here; [`AnalysisRecord::from_row`]
/// decodes them.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AnalysisRow {
    pub id: i64,
    pub symbol: String,
    pub company_name: Option<String>,
    pub date: NaiveDate,
    pub analysis_period: Option<String>,
    pub financial_highlights: Option<String>,
    pub key_insights: Option<String>,
    pub risks_and_challenges: Option<String>,
    pub opportunities: Option<String>,
    pub significant_quotes: Option<String>,
    pub sentiment_summary: Option<String>,
    pub sentiment_explanation: Option<String>,
}

/// One earnings-call analysis with its structured sections decoded.
///
/// A section that was NULL, blank, or not valid JSON for its shape is `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: i64,
    pub symbol: String,
    pub company_name: Option<String>,
    pub date: NaiveDate,
    pub analysis_period: Option<String>,
    pub financial_highlights: Option<FinancialHighlights>,
    pub key_insights: Option<Vec<SectionItem<String>>>,
    pub risks_and_challenges: Option<Vec<SectionItem<String>>>,
    pub opportunities: Option<Vec<SectionItem<String>>>,
    pub significant_quotes: Option<Vec<SectionItem<SignificantQuote>>>,
    pub sentiment_summary: Option<String>,
    pub sentiment_explanation: Option<String>,
}

/// Element of a decoded list section.
///
/// Elements that do not fit the expected shape are kept verbatim so one odd
/// entry does not cost the rest of the section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SectionItem<T> {
    Typed(T),
    Other(Value),
}

impl<T> SectionItem<T> {
    pub fn typed(&self) -> Option<&T> {
        match self {
            SectionItem::Typed(value) => Some(value),
            SectionItem::Other(_) => None,
        }
    }
}

impl From<&str> for SectionItem<String> {
    fn from(value: &str) -> Self {
        SectionItem::Typed(value.to_string())
    }
}

/// A key that may be absent, present as `null`, or present with a value.
///
/// Outer `None` means absent; `Some(None)` is an explicit `null`.
pub type Nullable<T> = Option<Option<T>>;

mod keep_null {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<T, S>(value: &Option<Option<T>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        match value {
            Some(inner) => inner.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialHighlights {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "keep_null")]
    pub other_metrics: Nullable<Vec<SectionItem<FinancialMetric>>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FinancialHighlights {
    pub fn metrics(&self) -> &[SectionItem<FinancialMetric>] {
        self.other_metrics.as_ref().and_then(|m| m.as_deref()).unwrap_or_default()
    }
}

/// Period-over-period comparison of a single metric.
///
/// Values are kept as raw JSON since upstream mixes strings ("$1.2B")
/// and plain numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialMetric {
    pub metric_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "keep_null")]
    pub current_period: Nullable<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "keep_null")]
    pub previous_period: Nullable<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "keep_null")]
    pub change: Nullable<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignificantQuote {
    pub quote: String,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "keep_null")]
    pub speaker: Nullable<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AnalysisRecord {
    pub fn from_row(row: AnalysisRow) -> Self {
        let symbol = row.symbol;

        Self {
            financial_highlights: decode_section(&symbol, "financial_highlights", row.financial_highlights.as_deref()),
            key_insights: decode_section(&symbol, "key_insights", row.key_insights.as_deref()),
            risks_and_challenges: decode_section(&symbol, "risks_and_challenges", row.risks_and_challenges.as_deref()),
            opportunities: decode_section(&symbol, "opportunities", row.opportunities.as_deref()),
            significant_quotes: decode_section(&symbol, "significant_quotes", row.significant_quotes.as_deref()),
            id: row.id,
            symbol,
            company_name: row.company_name,
            date: row.date,
            analysis_period: row.analysis_period,
            sentiment_summary: row.sentiment_summary,
            sentiment_explanation: row.sentiment_explanation,
        }
    }
}

/// Decode one JSON-encoded section, logging and dropping it on failure.
pub fn decode_section<T: DeserializeOwned>(symbol: &str, field: &str, raw: Option<&str>) -> Option<T> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;

    // A stored JSON `null` is just an empty section.
    match serde_json::from_str::<Option<T>>(raw) {
        Ok(value) => value,
        Err(e) => {
            warn!("⚠️ Could not decode {} for {}: {}", field, symbol, e);
            None
        }
    }
}
