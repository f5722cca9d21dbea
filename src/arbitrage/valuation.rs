//! Conversion of token amounts into the settlement token

use rust_decimal::Decimal;
use std::collections::BTreeMap;
use crate::types::{Quote, QuoteSnapshot, TokenId};

/// Settlement-token price of every token reachable in one step from a
/// snapshot.
///
/// A token is priced from its best direct quote into the settlement token.
/// When only the opposite direction is quoted, the price is the inverse of
/// the best `settlement -> token` rate. Tokens with neither have no price
/// and cannot be valued this cycle.
#[derive(Debug, Clone)]
pub struct SettlementPrices {
    settlement: TokenId,
    prices: BTreeMap<TokenId, Decimal>,
}

impl SettlementPrices {
    /// Prices only the settlement token itself.
    pub fn settlement_only(settlement: TokenId) -> Self {
        let mut prices = BTreeMap::new();
        prices.insert(settlement.clone(), Decimal::ONE);
        Self { settlement, prices }
    }

    pub fn from_snapshot(snapshot: &QuoteSnapshot, settlement: &TokenId) -> Self {
        Self::from_quotes(snapshot.quotes(), settlement)
    }

    pub fn from_quotes<'q>(quotes: impl IntoIterator<Item = &'q Quote>, settlement: &TokenId) -> Self {
        let mut direct: BTreeMap<&TokenId, Decimal> = BTreeMap::new();
        let mut inverse: BTreeMap<&TokenId, Decimal> = BTreeMap::new();

        for quote in quotes {
            let rate = quote.unit_price();
            if rate.is_zero() {
                continue;
            }
            let (token, best) = if quote.token_out() == settlement {
                (quote.token_in(), &mut direct)
            } else if quote.token_in() == settlement {
                (quote.token_out(), &mut inverse)
            } else {
                continue;
            };
            best.entry(token)
                .and_modify(|current| *current = (*current).max(rate))
                .or_insert(rate);
        }

        let mut valued = Self::settlement_only(settlement.clone());
        for (token, rate) in inverse {
            if let Some(price) = Decimal::ONE.checked_div(rate).filter(|p| !p.is_zero()) {
                valued.prices.insert(token.clone(), price);
            }
        }
        // Direct quotes take precedence over inverted ones.
        for (token, price) in direct {
            valued.prices.insert(token.clone(), price);
        }
        valued.prices.insert(settlement.clone(), Decimal::ONE);
        valued
    }

    pub fn settlement(&self) -> &TokenId {
        &self.settlement
    }

    pub fn price(&self, token: &TokenId) -> Option<Decimal> {
        self.prices.get(token).copied()
    }

    /// `None` when the token has no price or the value overflows.
    pub fn to_settlement(&self, token: &TokenId, amount: Decimal) -> Option<Decimal> {
        amount.checked_mul(self.price(token)?)
    }

    /// Amount of `token` worth `value` settlement units.
    pub fn from_settlement(&self, token: &TokenId, value: Decimal) -> Option<Decimal> {
        value.checked_div(self.price(token)?)
    }
}
