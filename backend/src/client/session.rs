use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tokio::time::{sleep, Duration};
use tracing::{debug, info};

use crate::client::{ClientError, CompanySearch};
use crate::models::{Direction, NavigationResponse};

/// Quiet period between the last keystroke and the search it triggers.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Identifies one issued request; only the newest ticket may apply its response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Hands out monotonically increasing tickets.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: AtomicU64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}

/// Collapses a burst of calls into the last one.
#[derive(Debug)]
pub struct Debouncer {
    quiet: Duration,
    generation: AtomicU64,
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            generation: AtomicU64::new(0),
        }
    }

    /// Waits out the quiet period. Returns `false` if another call arrived meanwhile.
    pub async fn settle(&self) -> bool {
        let mine = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        sleep(self.quiet).await;
        self.generation.load(Ordering::SeqCst) == mine
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(SEARCH_DEBOUNCE)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    /// The response became the current selection.
    Selected(Box<NavigationResponse>),
    /// The server had nothing for this request.
    NotFound,
    /// Refused locally: nothing selected, or already at that end.
    Blocked,
    /// A newer request was issued before this one finished; its response was dropped.
    Stale,
    /// An empty search term cleared the selection.
    Cleared,
}

/// Client-side state of one dashboard viewer.
///
/// Methods take `&self` so several requests can be in flight at once; only
/// the most recently issued one may change the selection.
pub struct BrowseSession<C> {
    client: C,
    sequencer: RequestSequencer,
    debouncer: Debouncer,
    current: Mutex<Option<NavigationResponse>>,
}

impl<C: CompanySearch> BrowseSession<C> {
    pub fn new(client: C) -> Self {
        Self::with_debounce(client, SEARCH_DEBOUNCE)
    }

    pub fn with_debounce(client: C, quiet: Duration) -> Self {
        Self {
            client,
            sequencer: RequestSequencer::new(),
            debouncer: Debouncer::new(quiet),
            current: Mutex::new(None),
        }
    }

    pub fn current(&self) -> Option<NavigationResponse> {
        self.current.lock().clone()
    }

    pub fn can_navigate(&self, direction: Direction) -> bool {
        match self.current.lock().as_ref() {
            None => false,
            Some(current) => match direction {
                Direction::Next => !current.navigation.is_last,
                Direction::Previous => !current.navigation.is_first,
            },
        }
    }

    /// Load the alphabetically first company.
    pub async fn load_first(&self) -> Result<SessionOutcome, ClientError> {
        self.request(None, None).await
    }

    /// Look up a ticker right away.
    pub async fn search(&self, term: &str) -> Result<SessionOutcome, ClientError> {
        let term = term.trim();
        if term.is_empty() {
            self.sequencer.issue();
            *self.current.lock() = None;
            return Ok(SessionOutcome::Cleared);
        }

        self.request(Some(term), None).await
    }

    /// Look up a ticker typed keystroke by keystroke; only the last one in a
    /// burst reaches the server.
    pub async fn search_as_typed(&self, term: &str) -> Result<SessionOutcome, ClientError> {
        if !self.debouncer.settle().await {
            debug!("Search for {:?} superseded while debouncing", term);
            return Ok(SessionOutcome::Stale);
        }
        self.search(term).await
    }

    /// Step to the neighbouring symbol of the current selection.
    pub async fn navigate(&self, direction: Direction) -> Result<SessionOutcome, ClientError> {
        if !self.can_navigate(direction) {
            return Ok(SessionOutcome::Blocked);
        }

        let symbol = match self.current.lock().as_ref() {
            Some(current) => current.record.symbol.clone(),
            None => return Ok(SessionOutcome::Blocked),
        };

        self.request(Some(&symbol), Some(direction)).await
    }

    async fn request(
        &self,
        term: Option<&str>,
        direction: Option<Direction>,
    ) -> Result<SessionOutcome, ClientError> {
        let ticket = self.sequencer.issue();
        let result = self.client.search_companies(term, direction).await;

        if !self.sequencer.is_current(ticket) {
            debug!("Dropping stale response for {:?} {:?}", term, direction);
            return Ok(SessionOutcome::Stale);
        }

        let Some(first) = result?.into_iter().next() else {
            return Ok(SessionOutcome::NotFound);
        };

        info!("Selected {} ({} companies)", first.record.symbol, first.navigation.total_stocks);
        *self.current.lock() = Some(first.clone());
        Ok(SessionOutcome::Selected(Box::new(first)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnalysisRow, SearchParams};
    use crate::services::search_service;
    use crate::store::InMemoryAnalysisStore;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::Arc;
    use tokio::sync::Notify;

    /// Answers from an in-memory store, optionally holding the first
    /// `previous` request until released.
    struct LocalSearch {
        store: InMemoryAnalysisStore,
        hold_previous: Option<Arc<Notify>>,
    }

    #[async_trait]
    impl CompanySearch for LocalSearch {
        async fn search_companies(
            &self,
            term: Option<&str>,
            direction: Option<Direction>,
        ) -> Result<Vec<NavigationResponse>, ClientError> {
            if direction == Some(Direction::Previous) {
                if let Some(gate) = &self.hold_previous {
                    gate.notified().await;
                }
            }
            let params = SearchParams::new(term, direction);
            Ok(search_service::search_companies(&self.store, &params).await.unwrap())
        }
    }

    fn store() -> InMemoryAnalysisStore {
        let rows = ["AMZN", "GOOG", "META"]
            .iter()
            .enumerate()
            .map(|(i, symbol)| AnalysisRow {
                id: i as i64 + 1,
                symbol: symbol.to_string(),
                company_name: None,
                date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
                analysis_period: None,
                financial_highlights: None,
                key_insights: None,
                risks_and_challenges: None,
                opportunities: None,
                significant_quotes: None,
                sentiment_summary: None,
                sentiment_explanation: None,
            })
            .collect();
        InMemoryAnalysisStore::new(rows)
    }

    fn session() -> BrowseSession<LocalSearch> {
        BrowseSession::new(LocalSearch { store: store(), hold_previous: None })
    }

    fn symbol_of(outcome: &SessionOutcome) -> Option<&str> {
        match outcome {
            SessionOutcome::Selected(r) => Some(r.record.symbol.as_str()),
            _ => None,
        }
    }

    #[test]
    fn test_sequencer_only_latest_is_current() {
        let sequencer = RequestSequencer::new();
        let first = sequencer.issue();
        let second = sequencer.issue();

        assert!(second > first);
        assert!(!sequencer.is_current(first));
        assert!(sequencer.is_current(second));
    }

    #[tokio::test]
    async fn test_navigation_is_blocked_at_the_ends() {
        let session = session();
        assert_eq!(session.navigate(Direction::Next).await.unwrap(), SessionOutcome::Blocked);

        let outcome = session.load_first().await.unwrap();
        assert_eq!(symbol_of(&outcome), Some("AMZN"));
        assert!(!session.can_navigate(Direction::Previous));
        assert_eq!(session.navigate(Direction::Previous).await.unwrap(), SessionOutcome::Blocked);

        let outcome = session.navigate(Direction::Next).await.unwrap();
        assert_eq!(symbol_of(&outcome), Some("GOOG"));
        let outcome = session.navigate(Direction::Next).await.unwrap();
        assert_eq!(symbol_of(&outcome), Some("META"));
        assert_eq!(session.navigate(Direction::Next).await.unwrap(), SessionOutcome::Blocked);
    }

    #[tokio::test]
    async fn test_search_and_clear() {
        let session = session();

        let outcome = session.search("goog").await.unwrap();
        assert_eq!(symbol_of(&outcome), Some("GOOG"));

        assert_eq!(session.search("TSLA").await.unwrap(), SessionOutcome::NotFound);
        // A miss keeps the previous selection.
        assert_eq!(session.current().unwrap().record.symbol, "GOOG");

        assert_eq!(session.search("  ").await.unwrap(), SessionOutcome::Cleared);
        assert!(session.current().is_none());
    }

    #[tokio::test]
    async fn test_slow_response_is_discarded() {
        let gate = Arc::new(Notify::new());
        let session = Arc::new(BrowseSession::new(LocalSearch {
            store: store(),
            hold_previous: Some(gate.clone()),
        }));
        session.search("GOOG").await.unwrap();

        let slow = {
            let session = session.clone();
            tokio::spawn(async move { session.navigate(Direction::Previous).await })
        };
        tokio::task::yield_now().await;

        let outcome = session.search("META").await.unwrap();
        assert_eq!(symbol_of(&outcome), Some("META"));

        gate.notify_one();
        assert_eq!(slow.await.unwrap().unwrap(), SessionOutcome::Stale);
        assert_eq!(session.current().unwrap().record.symbol, "META");
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounce_fires_only_last_keystroke() {
        let session = Arc::new(session());

        let mut typing = Vec::new();
        for term in ["G", "GO", "GOO", "GOOG"] {
            let session = session.clone();
            typing.push(tokio::spawn(async move { session.search_as_typed(term).await }));
            tokio::time::advance(Duration::from_millis(100)).await;
        }

        let mut outcomes = Vec::new();
        for handle in typing {
            outcomes.push(handle.await.unwrap().unwrap());
        }

        assert_eq!(&outcomes[..3], &[SessionOutcome::Stale, SessionOutcome::Stale, SessionOutcome::Stale]);
        assert_eq!(symbol_of(&outcomes[3]), Some("GOOG"));
    }
}
