use serde_json::Value;

use crate::models::{FinancialHighlights, FinancialMetric, NavigationResponse, SectionItem, SignificantQuote};

/// Coarse reading of a free-text sentiment label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Positive,
    Negative,
    Neutral,
    Unknown,
}

impl Tone {
    pub fn classify(label: Option<&str>) -> Self {
        let Some(label) = label else {
            return Tone::Unknown;
        };

        match label.trim().to_lowercase().as_str() {
            "increase in optimism" | "very positive" | "positive" => Tone::Positive,
            "decrease in optimism" | "very negative" | "negative" => Tone::Negative,
            "no significant change" | "neutral" => Tone::Neutral,
            _ => Tone::Unknown,
        }
    }

    pub fn marker(&self) -> &'static str {
        match self {
            Tone::Positive => "▲",
            Tone::Negative => "▼",
            Tone::Neutral => "●",
            Tone::Unknown => "?",
        }
    }
}

const NO_DATA: &str = "  No data";

/// Plain-text view of one company for a terminal.
pub fn render_company(response: &NavigationResponse) -> String {
    let record = &response.record;
    let nav = &response.navigation;
    let mut out = String::new();

    line(
        &mut out,
        format!("{} - {}", record.symbol, record.company_name.as_deref().unwrap_or("Unknown company")),
    );
    line(
        &mut out,
        format!(
            "Analysis Period: {}   Call date: {}",
            record.analysis_period.as_deref().unwrap_or("N/A"),
            record.date
        ),
    );
    line(
        &mut out,
        format!(
            "Stock {} ({} companies available){}{}",
            record.symbol,
            nav.total_stocks,
            if nav.is_first { " [first]" } else { "" },
            if nav.is_last { " [last]" } else { "" }
        ),
    );

    out.push_str("\nSentiment Analysis\n");
    let tone = Tone::classify(record.sentiment_summary.as_deref());
    match &record.sentiment_summary {
        Some(summary) => line(&mut out, format!("  {} {}", tone.marker(), summary)),
        None => line(&mut out, NO_DATA),
    }
    if let Some(explanation) = &record.sentiment_explanation {
        line(&mut out, format!("  {}", explanation));
    }

    out.push_str("\nFinancial Highlights\n");
    render_highlights(&mut out, record.financial_highlights.as_ref());

    render_list(&mut out, "Key Insights", record.key_insights.as_deref());
    render_list(&mut out, "Risks and Challenges", record.risks_and_challenges.as_deref());
    render_list(&mut out, "Opportunities", record.opportunities.as_deref());

    out.push_str("\nSignificant Quotes\n");
    render_quotes(&mut out, record.significant_quotes.as_deref());

    out
}

fn line(out: &mut String, text: impl AsRef<str>) {
    out.push_str(text.as_ref());
    out.push('\n');
}

/// Borrowed view of a metric, whether it decoded cleanly or was kept raw.
struct MetricView<'a> {
    name: &'a str,
    current: Option<&'a Value>,
    previous: Option<&'a Value>,
    change: Option<&'a Value>,
}

impl<'a> MetricView<'a> {
    fn new(item: &'a SectionItem<FinancialMetric>) -> Self {
        match item {
            SectionItem::Typed(metric) => Self {
                name: &metric.metric_name,
                current: metric.current_period.as_ref().and_then(Option::as_ref),
                previous: metric.previous_period.as_ref().and_then(Option::as_ref),
                change: metric.change.as_ref().and_then(Option::as_ref),
            },
            SectionItem::Other(raw) => Self {
                name: raw.get("metricName").and_then(Value::as_str).unwrap_or_default(),
                current: raw.get("currentPeriod"),
                previous: raw.get("previousPeriod"),
                change: raw.get("change"),
            },
        }
    }
}

fn render_highlights(out: &mut String, highlights: Option<&FinancialHighlights>) {
    let metrics = highlights.map(FinancialHighlights::metrics).unwrap_or_default();
    if metrics.is_empty() {
        line(out, NO_DATA);
        return;
    }

    for metric in metrics.iter().map(MetricView::new) {
        let name = if metric.name.trim().is_empty() { "Unnamed metric" } else { metric.name };
        line(out, format!("  {}", name));
        line(
            out,
            format!(
                "    Current: {} | Previous: {}",
                display_value(metric.current),
                display_value(metric.previous)
            ),
        );
        if let Some(change) = metric.change.filter(|v| !is_blank(v)) {
            line(out, format!("    Change: {}", display_value(Some(change))));
        }
    }
}

fn render_list(out: &mut String, title: &str, items: Option<&[SectionItem<String>]>) {
    line(out, format!("\n{}", title));
    match items {
        Some(items) if !items.is_empty() => {
            for item in items {
                let text = match item {
                    SectionItem::Typed(text) => text.clone(),
                    SectionItem::Other(raw) => display_value(Some(raw)),
                };
                line(out, format!("  • {}", text));
            }
        }
        _ => line(out, NO_DATA),
    }
}

fn render_quotes(out: &mut String, quotes: Option<&[SectionItem<SignificantQuote>]>) {
    match quotes {
        Some(quotes) if !quotes.is_empty() => {
            for item in quotes {
                let (quote, speaker) = match item {
                    SectionItem::Typed(q) => (q.quote.clone(), q.speaker.clone().flatten()),
                    SectionItem::Other(raw) => (
                        raw.get("quote").map(|v| display_value(Some(v))).unwrap_or_else(|| raw.to_string()),
                        raw.get("speaker").and_then(Value::as_str).map(str::to_string),
                    ),
                };
                line(out, format!("  \"{}\"", quote));
                line(out, format!("    - {}", speaker.as_deref().unwrap_or("Unknown speaker")));
            }
        }
        _ => line(out, NO_DATA),
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn display_value(value: Option<&Value>) -> String {
    match value {
        Some(v) if !is_blank(v) => match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        },
        _ => "N/A".to_string(),
    }
}
