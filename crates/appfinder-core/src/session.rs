use std::sync::atomic::{AtomicU64, Ordering};

use crate::app::SearchResults;

/// Queries at or below this many characters are "short"
const SHORT_QUERY_LEN: usize = 3;

/// Marks one in-flight search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchTicket(u64);

/// Last-query-wins bookkeeping for concurrent searches.
///
/// Every new query takes a ticket; when its search completes the caller checks
/// the ticket and drops the outcome if a newer query has started since.
/// Superseded searches are never aborted, only ignored.
#[derive(Debug, Default)]
pub struct SearchGeneration {
    latest: AtomicU64,
}

impl SearchGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> SearchTicket {
        SearchTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: SearchTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Hand back `outcome` only if `ticket` is still the latest search
    pub fn accept<T>(&self, ticket: SearchTicket, outcome: T) -> Option<T> {
        self.is_current(ticket).then_some(outcome)
    }
}

/// Whether a search should consult the intent interpreter
pub fn wants_assist(query: &str, force: bool) -> bool {
    force || query.trim().chars().count() > SHORT_QUERY_LEN
}

/// Whether to offer the user an interpreter-backed retry
pub fn offer_assist(query: &str, results: &SearchResults, force: bool, loading: bool) -> bool {
    let len = query.trim().chars().count();
    len > 0 && !force && !loading && (len <= SHORT_QUERY_LEN || results.is_empty())
}
