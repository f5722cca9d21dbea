//! Venue adapter interface

use anyhow::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Serialize;
use crate::types::{RawQuote, TokenId, VenueId};

/// One quote the scanner wants from every venue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteRequest {
    pub token_in: TokenId,
    pub token_out: TokenId,
    pub amount_in: Decimal,
}

impl QuoteRequest {
    pub fn new(token_in: TokenId, token_out: TokenId, amount_in: Decimal) -> Self {
        Self {
            token_in,
            token_out,
            amount_in,
        }
    }
}

/// A liquidity venue that can price swaps. Implementations may skip
/// requests for pairs they do not list.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    fn venue_id(&self) -> &VenueId;

    async fn fetch_quotes(&self, requests: &[QuoteRequest]) -> Result<Vec<RawQuote>>;
}
