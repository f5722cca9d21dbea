//! Venue quotes and the identifiers they are keyed by

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use crate::errors::{PipelineError, PipelineResult};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TokenId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VenueId(pub String);

impl TokenId {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into())
    }
}

impl VenueId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for VenueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Quote as reported by a venue adapter, before any validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawQuote {
    pub venue_id: VenueId,
    pub token_in: TokenId,
    pub token_out: TokenId,
    pub amount_in: Decimal,
    pub amount_out: Decimal,
    pub timestamp: DateTime<Utc>,
}

/// A validated venue price for one ordered token pair.
///
/// `amount_in` is always positive, the two tokens always differ and the
/// unit price is computed once here, so reading it can never fail.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    venue_id: VenueId,
    token_in: TokenId,
    token_out: TokenId,
    amount_in: Decimal,
    amount_out: Decimal,
    unit_price: Decimal,
    timestamp: DateTime<Utc>,
}

impl Quote {
    pub fn new(
        venue_id: VenueId,
        token_in: TokenId,
        token_out: TokenId,
        amount_in: Decimal,
        amount_out: Decimal,
        timestamp: DateTime<Utc>,
    ) -> PipelineResult<Self> {
        let reject = |reason: String| PipelineError::InvalidQuote {
            venue: venue_id.clone(),
            reason,
        };

        if amount_in <= Decimal::ZERO {
            return Err(reject(format!("amount_in must be positive, got {}", amount_in)));
        }
        if amount_out < Decimal::ZERO {
            return Err(reject(format!("amount_out is negative: {}", amount_out)));
        }
        if token_in == token_out {
            return Err(reject(format!("token_in and token_out are both {}", token_in)));
        }
        let Some(unit_price) = amount_out.checked_div(amount_in) else {
            return Err(reject(format!("unit price of {} / {} overflows", amount_out, amount_in)));
        };

        Ok(Self {
            venue_id,
            token_in,
            token_out,
            amount_in,
            amount_out,
            unit_price,
            timestamp,
        })
    }

    pub fn venue_id(&self) -> &VenueId {
        &self.venue_id
    }

    pub fn token_in(&self) -> &TokenId {
        &self.token_in
    }

    pub fn token_out(&self) -> &TokenId {
        &self.token_out
    }

    pub fn amount_in(&self) -> Decimal {
        self.amount_in
    }

    pub fn amount_out(&self) -> Decimal {
        self.amount_out
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Units of `token_out` received per unit of `token_in`.
    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    /// Output for an arbitrary input, assuming the quoted rate holds.
    /// `None` when the result does not fit in a `Decimal`.
    pub fn amount_out_for(&self, amount_in: Decimal) -> Option<Decimal> {
        amount_in.checked_mul(self.unit_price)
    }

    pub fn pair(&self) -> (TokenId, TokenId) {
        (self.token_in.clone(), self.token_out.clone())
    }
}

impl TryFrom<RawQuote> for Quote {
    type Error = PipelineError;

    fn try_from(raw: RawQuote) -> PipelineResult<Self> {
        Quote::new(
            raw.venue_id,
            raw.token_in,
            raw.token_out,
            raw.amount_in,
            raw.amount_out,
            raw.timestamp,
        )
    }
}
