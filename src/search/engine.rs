//! Party search engine: full-directory scan, ranked by relevance.
//!
//! The scan is O(parties × members) per query, which is fine at the
//! intended scale (hundreds of parties). An index would only pay off far
//! beyond that.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::StoreError;
use crate::model::Party;
use crate::search::scorer::{EXACT_PHRASE_THRESHOLD, score};
use crate::store::PartyDirectory;

/// One candidate paired with its relevance score for a single query.
#[derive(Debug, Clone)]
pub struct ScoredParty {
    pub party: Party,
    pub score: u32,
}

/// Result of one search call.
#[derive(Debug, Clone)]
pub enum SearchOutcome {
    /// Matching parties, most relevant first.
    Results(Vec<ScoredParty>),
    /// A newer search started while this one was fetching; its results
    /// were discarded. Supersession is normal control flow, not a fault.
    Superseded,
}

/// Opaque request ticket. Only the most recently issued ticket may deliver
/// results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchTicket(u64);

/// Searches the party directory with latest-request-wins semantics.
///
/// Each call takes a ticket from [`SearchEngine::ticket`]; issuing a new
/// ticket invalidates all prior ones, so a slow in-flight scan can never
/// overwrite the results of a newer query.
pub struct SearchEngine {
    directory: Arc<dyn PartyDirectory>,
    generation: AtomicU64,
}

impl SearchEngine {
    pub fn new(directory: Arc<dyn PartyDirectory>) -> Self {
        Self {
            directory,
            generation: AtomicU64::new(0),
        }
    }

    /// Issue a ticket for a new search, superseding any in-flight one.
    pub fn ticket(&self) -> SearchTicket {
        SearchTicket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn is_current(&self, ticket: SearchTicket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }

    /// Search the directory for parties matching `query`.
    ///
    /// Empty or whitespace-only queries yield an empty result list: there
    /// is no implicit browse-all.
    pub async fn search(
        &self,
        query: &str,
        ticket: SearchTicket,
    ) -> Result<SearchOutcome, StoreError> {
        if query.trim().is_empty() {
            return Ok(SearchOutcome::Results(Vec::new()));
        }
        if !self.is_current(ticket) {
            return Ok(SearchOutcome::Superseded);
        }

        let parties = self.directory.fetch_all_parties().await?;

        // The fetch suspends; a newer ticket may have been issued meanwhile.
        if !self.is_current(ticket) {
            tracing::debug!(query, "discarding superseded search");
            return Ok(SearchOutcome::Superseded);
        }

        let results = rank(query, parties);
        tracing::debug!(query, hits = results.len(), "search complete");
        Ok(SearchOutcome::Results(results))
    }
}

/// Score, filter, and order a set of candidates for one query. Pure.
///
/// Non-matching parties are dropped. When any candidate reaches the exact
/// full-phrase threshold, weaker partial matches are suppressed entirely.
pub fn rank(query: &str, parties: Vec<Party>) -> Vec<ScoredParty> {
    if query.trim().is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<ScoredParty> = parties
        .into_iter()
        .filter_map(|party| {
            let score = score(query, &party);
            (score > 0).then_some(ScoredParty { party, score })
        })
        .collect();

    if scored.iter().any(|c| c.score >= EXACT_PHRASE_THRESHOLD) {
        scored.retain(|c| c.score >= EXACT_PHRASE_THRESHOLD);
    }

    // Stable sort: ties keep directory order.
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored
}
