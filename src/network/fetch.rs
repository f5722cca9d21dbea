//! Concurrent quote collection across venues

use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use crate::errors::PipelineError;
use crate::types::{RawQuote, VenueId};
use super::{retry_with_backoff, QuoteRequest, QuoteSource, RetryConfig};

#[derive(Debug, Default)]
pub struct FetchOutcome {
    pub quotes: Vec<RawQuote>,
    pub succeeded_venues: Vec<VenueId>,
    pub failed_venues: Vec<(VenueId, String)>,
}

impl FetchOutcome {
    pub fn all_failed(&self) -> bool {
        self.succeeded_venues.is_empty() && !self.failed_venues.is_empty()
    }
}

/// Fetches every venue in parallel. Each venue gets its own retry budget
/// inside a hard `timeout`; a venue that errors or times out is excluded
/// from this cycle and never blocks the others.
pub async fn fetch_quotes_concurrently(
    sources: &[Arc<dyn QuoteSource>],
    requests: &[QuoteRequest],
    timeout: Duration,
    retry: &RetryConfig,
) -> FetchOutcome {
    let fetches = sources.iter().map(|source| async move {
        let venue = source.venue_id().clone();
        let result = tokio::time::timeout(
            timeout,
            retry_with_backoff(|| source.fetch_quotes(requests), retry, &venue),
        )
        .await
        .unwrap_or_else(|_| Err(PipelineError::VenueTimeout { venue: venue.clone(), timeout }));
        (venue, result)
    });

    let mut outcome = FetchOutcome::default();
    for (venue, result) in join_all(fetches).await {
        match result {
            Ok(quotes) => {
                outcome.quotes.extend(quotes);
                outcome.succeeded_venues.push(venue);
            }
            Err(e) => {
                warn!("Excluding {} from this cycle: {}", venue, e);
                outcome.failed_venues.push((venue, e.to_string()));
            }
        }
    }

    info!(
        quotes = outcome.quotes.len(),
        venues_ok = outcome.succeeded_venues.len(),
        venues_failed = outcome.failed_venues.len(),
        "Quote fetch complete"
    );
    outcome
}
