use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::analysis::AnalysisRecord;

/// Alphabetical step through the symbol universe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Next,
    Previous,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Next => "next",
            Direction::Previous => "previous",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "next" => Ok(Direction::Next),
            "previous" => Ok(Direction::Previous),
            other => Err(format!(
                "direction must be 'next' or 'previous', got '{}'",
                other
            )),
        }
    }
}

/// Query string of `GET /api/companies/search`, as received.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    pub term: Option<String>,
    pub direction: Option<String>,
}

/// Validated search input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
    pub term: Option<String>,
    pub direction: Option<Direction>,
}

impl SearchParams {
    pub fn new(term: Option<&str>, direction: Option<Direction>) -> Self {
        Self {
            term: term.map(str::trim).filter(|t| !t.is_empty()).map(str::to_string),
            direction,
        }
    }
}

impl TryFrom<SearchQuery> for SearchParams {
    type Error = String;

    fn try_from(query: SearchQuery) -> Result<Self, Self::Error> {
        let direction = match query.direction.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<Direction>()?),
        };

        Ok(SearchParams::new(query.term.as_deref(), direction))
    }
}

/// Which resolution rule a request falls under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchMode {
    /// Step from `term` to its alphabetical neighbour.
    Move { term: String, direction: Direction },
    /// Latest record for exactly this ticker, any case.
    Lookup { term: String },
    /// Alphabetically first symbol.
    Default,
}

impl SearchMode {
    pub fn from_params(params: &SearchParams) -> Self {
        match (&params.term, params.direction) {
            (Some(term), Some(direction)) => SearchMode::Move {
                term: term.clone(),
                direction,
            },
            (Some(term), None) => SearchMode::Lookup { term: term.clone() },
            (None, _) => SearchMode::Default,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SearchMode::Move { .. } => "move",
            SearchMode::Lookup { .. } => "lookup",
            SearchMode::Default => "default",
        }
    }
}

/// Size and ends of the deduplicated symbol universe.
#[derive(Debug, Clone, Default, PartialEq, Eq, sqlx::FromRow)]
pub struct UniverseBounds {
    pub total: i64,
    pub first_symbol: Option<String>,
    pub last_symbol: Option<String>,
}

impl UniverseBounds {
    pub fn context_for(&self, symbol: &str) -> NavigationContext {
        NavigationContext {
            is_first: self.first_symbol.as_deref() == Some(symbol),
            is_last: self.last_symbol.as_deref() == Some(symbol),
            total_stocks: self.total,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationContext {
    pub is_first: bool,
    pub is_last: bool,
    pub total_stocks: i64,
}

/// A resolved record plus where it sits in the universe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationResponse {
    #[serde(flatten)]
    pub record: AnalysisRecord,
    #[serde(flatten)]
    pub navigation: NavigationContext,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_precedence() {
        let params = SearchParams::new(Some("AAPL"), Some(Direction::Next));
        assert_eq!(
            SearchMode::from_params(&params),
            SearchMode::Move { term: "AAPL".into(), direction: Direction::Next }
        );

        let params = SearchParams::new(Some("aapl"), None);
        assert_eq!(SearchMode::from_params(&params), SearchMode::Lookup { term: "aapl".into() });

        assert_eq!(SearchMode::from_params(&SearchParams::default()), SearchMode::Default);
    }

    #[test]
    fn test_direction_without_term_is_default_mode() {
        let params = SearchParams::new(None, Some(Direction::Previous));
        assert_eq!(SearchMode::from_params(&params), SearchMode::Default);
    }

    #[test]
    fn test_blank_term_is_absent() {
        let params = SearchParams::new(Some("   "), None);
        assert_eq!(params.term, None);

        let params = SearchParams::new(Some(" msft "), None);
        assert_eq!(params.term.as_deref(), Some("msft"));
    }

    #[test]
    fn test_query_conversion() {
        let query = SearchQuery { term: Some("IBM".into()), direction: Some("previous".into()) };
        let params = SearchParams::try_from(query).unwrap();
        assert_eq!(params.direction, Some(Direction::Previous));

        let query = SearchQuery { term: Some("IBM".into()), direction: Some(String::new()) };
        assert_eq!(SearchParams::try_from(query).unwrap().direction, None);

        let query = SearchQuery { term: Some("IBM".into()), direction: Some("sideways".into()) };
        assert!(SearchParams::try_from(query).is_err());
    }

    #[test]
    fn test_context_for() {
        let bounds = UniverseBounds {
            total: 3,
            first_symbol: Some("AAA".into()),
            last_symbol: Some("CCC".into()),
        };

        assert_eq!(
            bounds.context_for("AAA"),
            NavigationContext { is_first: true, is_last: false, total_stocks: 3 }
        );
        assert_eq!(
            bounds.context_for("BBB"),
            NavigationContext { is_first: false, is_last: false, total_stocks: 3 }
        );
        assert!(bounds.context_for("CCC").is_last);
    }

    #[test]
    fn test_single_symbol_universe_is_both_ends() {
        let bounds = UniverseBounds {
            total: 1,
            first_symbol: Some("ONLY".into()),
            last_symbol: Some("ONLY".into()),
        };
        let ctx = bounds.context_for("ONLY");
        assert!(ctx.is_first && ctx.is_last);
    }
}
