//! Immutable per-cycle quote snapshot

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use super::{Quote, TokenId, VenueId};

#[derive(Debug, Clone, Serialize)]
pub struct QuoteSnapshot {
    pub taken_at: DateTime<Utc>,
    quotes: Vec<Quote>,
}

impl QuoteSnapshot {
    pub fn new(quotes: Vec<Quote>, taken_at: DateTime<Utc>) -> Self {
        Self { taken_at, quotes }
    }

    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// Quotes grouped by ordered pair, in a stable pair order.
    pub fn by_pair(&self) -> BTreeMap<(TokenId, TokenId), Vec<&Quote>> {
        let mut pairs: BTreeMap<(TokenId, TokenId), Vec<&Quote>> = BTreeMap::new();
        for quote in &self.quotes {
            pairs.entry(quote.pair()).or_default().push(quote);
        }
        pairs
    }

    pub fn tokens(&self) -> BTreeSet<&TokenId> {
        self.quotes
            .iter()
            .flat_map(|q| [q.token_in(), q.token_out()])
            .collect()
    }

    pub fn venues(&self) -> BTreeSet<&VenueId> {
        self.quotes.iter().map(|q| q.venue_id()).collect()
    }
}
