//! Single-hop cross-venue opportunity evaluation

use rust_decimal::Decimal;
use std::cmp::Reverse;
use std::collections::BTreeMap;
use tracing::debug;
use crate::types::{CycleEconomics, Opportunity, OpportunityKind, Quote, QuoteSnapshot, VenueId};
use super::{ConfidenceScorer, GasModel, ProfitConfig, SettlementPrices};

/// One venue's usable quote for the pair, with its leg gas cost.
struct Leg<'a> {
    quote: &'a Quote,
    price: Decimal,
    gas: Decimal,
}

impl Leg<'_> {
    fn venue(&self) -> &VenueId {
        self.quote.venue_id()
    }
}

/// Evaluates quotes for one ordered pair `(token_in, token_out)`.
///
/// The round trip starts and ends in `token_in`: sell it at the venue with
/// the highest unit price, then buy it back at the venue with the lowest.
/// Gas ties go to the cheaper venue, then to the smaller venue id. Input
/// and output are valued in the settlement token, so pairs whose
/// `token_in` has no settlement price are skipped, as are pairs whose
/// amounts overflow.
pub fn evaluate_pair(
    quotes: &[&Quote],
    prices: &SettlementPrices,
    profit: &ProfitConfig,
    gas: &GasModel,
    scorer: &dyn ConfidenceScorer,
) -> Option<Opportunity> {
    let first = quotes.first()?;
    let pair = first.pair();
    let Some(token_price) = prices.price(&pair.0) else {
        debug!(token = %pair.0, settlement = %prices.settlement(), "No settlement price, pair skipped");
        return None;
    };

    // Newest quote per venue; zero-priced quotes have no liquidity to buy from.
    let mut by_venue: BTreeMap<&VenueId, &Quote> = BTreeMap::new();
    for quote in quotes.iter().copied() {
        if quote.pair() != pair || quote.unit_price().is_zero() {
            continue;
        }
        by_venue
            .entry(quote.venue_id())
            .and_modify(|existing| {
                if quote.timestamp() > existing.timestamp() {
                    *existing = quote;
                }
            })
            .or_insert(quote);
    }

    if by_venue.len() < 2 {
        return None;
    }

    let legs: Vec<Leg> = by_venue
        .values()
        .map(|quote| Leg {
            quote,
            price: quote.unit_price(),
            gas: gas.leg_cost(quote.venue_id()),
        })
        .collect();

    let buy = legs.iter().min_by(|a, b| {
        a.price
            .cmp(&b.price)
            .then(a.gas.cmp(&b.gas))
            .then(a.venue().cmp(b.venue()))
    })?;
    let sell = legs.iter().min_by(|a, b| {
        Reverse(a.price)
            .cmp(&Reverse(b.price))
            .then(a.gas.cmp(&b.gas))
            .then(a.venue().cmp(b.venue()))
    })?;

    if buy.venue() == sell.venue() || buy.price >= sell.price {
        return None;
    }

    let input_tokens = buy.quote.amount_in().min(sell.quote.amount_in());
    let Some(economics) = round_trip(input_tokens, token_price, buy, sell, profit) else {
        debug!(token_in = %pair.0, token_out = %pair.1, "Round trip overflows, pair dropped");
        return None;
    };

    if !profit.accepts(&economics) {
        return None;
    }

    let kind = OpportunityKind::SingleHop {
        buy_venue: buy.venue().clone(),
        sell_venue: sell.venue().clone(),
        buy_price: buy.price,
        sell_price: sell.price,
    };
    let confidence = scorer.score(&kind);
    let (token_in, token_out) = pair;

    let opportunity = Opportunity::new(
        kind,
        vec![token_in.clone(), token_out, token_in],
        vec![sell.venue().clone(), buy.venue().clone()],
        economics,
        confidence,
    )?;

    debug!(
        route = %opportunity.route(),
        net_profit = %opportunity.net_profit,
        net_profit_pct = %opportunity.net_profit_pct,
        "Single-hop opportunity"
    );

    Some(opportunity)
}

/// Settlement-valued economics of selling `input_tokens` on `sell` and
/// buying them back on `buy`.
fn round_trip(
    input_tokens: Decimal,
    token_price: Decimal,
    buy: &Leg,
    sell: &Leg,
    profit: &ProfitConfig,
) -> Option<CycleEconomics> {
    let gross_tokens = input_tokens.checked_mul(sell.price)?.checked_div(buy.price)?;
    let input_amount = input_tokens.checked_mul(token_price)?;
    let gross_output_amount = gross_tokens.checked_mul(token_price)?;
    Some(CycleEconomics {
        input_amount,
        gross_output_amount,
        gas_cost: buy.gas.checked_add(sell.gas)?,
        slippage_cost: profit.slippage_cost(gross_output_amount),
    })
}

/// Runs `evaluate_pair` over every ordered pair of the snapshot.
pub fn evaluate_snapshot(
    snapshot: &QuoteSnapshot,
    prices: &SettlementPrices,
    profit: &ProfitConfig,
    gas: &GasModel,
    scorer: &dyn ConfidenceScorer,
) -> Vec<Opportunity> {
    snapshot
        .by_pair()
        .values()
        .filter_map(|quotes| evaluate_pair(quotes, prices, profit, gas, scorer))
        .collect()
}
