//! Quote ingestion: validation, staleness and de-duplication

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, warn};
use crate::types::{Quote, QuoteSnapshot, RawQuote, TokenId, VenueId};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IngestReport {
    pub accepted: usize,
    pub invalid: usize,
    pub stale: usize,
    pub duplicates: usize,
}

/// Builds the immutable snapshot for one cycle.
///
/// Invalid and stale quotes are dropped and counted; they never fail the
/// cycle. When a venue quotes the same ordered pair more than once, the
/// newest quote is kept (the first reported wins a timestamp tie).
pub fn ingest_quotes(
    raw_quotes: Vec<RawQuote>,
    now: DateTime<Utc>,
    max_quote_age: Duration,
) -> (QuoteSnapshot, IngestReport) {
    let mut report = IngestReport::default();
    let mut kept: Vec<Quote> = Vec::with_capacity(raw_quotes.len());
    let mut index: HashMap<(VenueId, TokenId, TokenId), usize> = HashMap::new();

    for raw in raw_quotes {
        let quote = match Quote::try_from(raw) {
            Ok(quote) => quote,
            Err(e) => {
                warn!("Dropping quote: {}", e);
                report.invalid += 1;
                continue;
            }
        };

        if now - quote.timestamp() > max_quote_age {
            debug!(
                venue = %quote.venue_id(),
                age_secs = (now - quote.timestamp()).num_seconds(),
                "Dropping stale quote"
            );
            report.stale += 1;
            continue;
        }

        let key = (
            quote.venue_id().clone(),
            quote.token_in().clone(),
            quote.token_out().clone(),
        );
        match index.get(&key) {
            Some(&slot) => {
                report.duplicates += 1;
                if quote.timestamp() > kept[slot].timestamp() {
                    kept[slot] = quote;
                }
            }
            None => {
                index.insert(key, kept.len());
                kept.push(quote);
            }
        }
    }

    report.accepted = kept.len();
    (QuoteSnapshot::new(kept, now), report)
}
