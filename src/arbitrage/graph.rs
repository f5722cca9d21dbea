//! Directed token graph built from venue quotes

use std::collections::BTreeMap;
use crate::types::{Quote, QuoteSnapshot, TokenId};

/// Nodes are tokens, each quote is an edge `token_in -> token_out` on its
/// venue. Edges out of a token are kept sorted by target token then venue
/// so that traversal order never depends on quote arrival order.
#[derive(Debug, Clone, Default)]
pub struct QuoteGraph {
    adjacency: BTreeMap<TokenId, Vec<Quote>>,
}

impl QuoteGraph {
    pub fn from_quotes<I>(quotes: I) -> Self
    where
        I: IntoIterator<Item = Quote>,
    {
        let mut adjacency: BTreeMap<TokenId, Vec<Quote>> = BTreeMap::new();
        for quote in quotes {
            adjacency.entry(quote.token_in().clone()).or_default().push(quote);
        }
        for edges in adjacency.values_mut() {
            edges.sort_by(|a, b| {
                a.token_out()
                    .cmp(b.token_out())
                    .then_with(|| a.venue_id().cmp(b.venue_id()))
            });
        }
        Self { adjacency }
    }

    pub fn from_snapshot(snapshot: &QuoteSnapshot) -> Self {
        Self::from_quotes(snapshot.quotes().iter().cloned())
    }

    pub fn edges_from(&self, token: &TokenId) -> &[Quote] {
        self.adjacency.get(token).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains_token(&self, token: &TokenId) -> bool {
        self.adjacency.contains_key(token)
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::VenueId;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn edge(venue: &str, from: &str, to: &str) -> Quote {
        Quote::new(
            VenueId::new(venue),
            TokenId::new(from),
            TokenId::new(to),
            dec!(1),
            dec!(1),
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn edges_are_sorted_by_target_then_venue() {
        let graph = QuoteGraph::from_quotes(vec![
            edge("v2", "USDC", "WETH"),
            edge("v1", "USDC", "WETH"),
            edge("v1", "USDC", "DAI"),
            edge("v1", "WETH", "USDC"),
        ]);

        let order: Vec<(String, String)> = graph
            .edges_from(&TokenId::new("USDC"))
            .iter()
            .map(|q| (q.token_out().to_string(), q.venue_id().to_string()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("DAI".to_string(), "v1".to_string()),
                ("WETH".to_string(), "v1".to_string()),
                ("WETH".to_string(), "v2".to_string()),
            ]
        );
        assert_eq!(graph.edge_count(), 4);
        assert!(graph.edges_from(&TokenId::new("DAI")).is_empty());
    }
}
