//! In-process venues with jittered rates, used by the demo binary

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;
use crate::types::{RawQuote, TokenId, VenueId};
use super::{QuoteRequest, QuoteSource};

pub struct SimulatedVenue {
    venue: VenueId,
    /// Mid rate per ordered pair: units of `token_out` per unit of `token_in`.
    rates: HashMap<(TokenId, TokenId), Decimal>,
    jitter_bps: i64,
    failure_rate: f64,
    max_latency_ms: u64,
}

impl SimulatedVenue {
    pub fn new(venue: impl Into<String>) -> Self {
        Self {
            venue: VenueId::new(venue),
            rates: HashMap::new(),
            jitter_bps: 30,
            failure_rate: 0.0,
            max_latency_ms: 50,
        }
    }

    /// Lists both directions of the pair, the reverse at the inverse rate.
    pub fn with_pair(mut self, token_in: &str, token_out: &str, rate: Decimal) -> Self {
        let (a, b) = (TokenId::new(token_in), TokenId::new(token_out));
        if !rate.is_zero() {
            self.rates.insert((b.clone(), a.clone()), Decimal::ONE / rate);
        }
        self.rates.insert((a, b), rate);
        self
    }

    pub fn with_jitter_bps(mut self, jitter_bps: i64) -> Self {
        self.jitter_bps = jitter_bps.abs();
        self
    }

    pub fn with_failure_rate(mut self, failure_rate: f64) -> Self {
        self.failure_rate = failure_rate.clamp(0.0, 1.0);
        self
    }

    pub fn with_max_latency_ms(mut self, max_latency_ms: u64) -> Self {
        self.max_latency_ms = max_latency_ms;
        self
    }

    fn quote_all(&self, requests: &[QuoteRequest]) -> Vec<RawQuote> {
        let mut rng = rand::rng();
        let now = Utc::now();

        requests
            .iter()
            .filter_map(|request| {
                let rate = self
                    .rates
                    .get(&(request.token_in.clone(), request.token_out.clone()))?;
                let jitter = rng.random_range(-self.jitter_bps..=self.jitter_bps);
                let quoted = *rate * (Decimal::ONE + Decimal::new(jitter, 4));
                Some(RawQuote {
                    venue_id: self.venue.clone(),
                    token_in: request.token_in.clone(),
                    token_out: request.token_out.clone(),
                    amount_in: request.amount_in,
                    amount_out: request.amount_in * quoted,
                    timestamp: now,
                })
            })
            .collect()
    }
}

#[async_trait]
impl QuoteSource for SimulatedVenue {
    fn venue_id(&self) -> &VenueId {
        &self.venue
    }

    async fn fetch_quotes(&self, requests: &[QuoteRequest]) -> Result<Vec<RawQuote>> {
        let latency = (rand::random::<f64>() * self.max_latency_ms as f64) as u64;
        let fails = rand::random::<f64>() < self.failure_rate;
        let quotes = self.quote_all(requests);

        tokio::time::sleep(Duration::from_millis(latency)).await;

        if fails {
            bail!("simulated outage at {}", self.venue);
        }
        debug!(venue = %self.venue, quotes = quotes.len(), latency_ms = latency, "Simulated quotes");
        Ok(quotes)
    }
}
