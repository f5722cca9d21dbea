#![allow(dead_code)]

use arb_pipeline::arbitrage::ProfitConfig;
use arb_pipeline::types::{
    CycleEconomics, Opportunity, OpportunityKind, Quote, RawQuote, TokenId, VenueId,
};
use chrono::Utc;
use rust_decimal::Decimal;

pub fn raw(venue: &str, token_in: &str, token_out: &str, amount_in: Decimal, amount_out: Decimal) -> RawQuote {
    RawQuote {
        venue_id: VenueId::new(venue),
        token_in: TokenId::new(token_in),
        token_out: TokenId::new(token_out),
        amount_in,
        amount_out,
        timestamp: Utc::now(),
    }
}

pub fn quote(venue: &str, token_in: &str, token_out: &str, amount_in: Decimal, amount_out: Decimal) -> Quote {
    Quote::try_from(raw(venue, token_in, token_out, amount_in, amount_out)).unwrap()
}

pub fn profit(min_profit_pct: Decimal) -> ProfitConfig {
    ProfitConfig {
        min_profit_pct,
        min_profit_usd: Decimal::ZERO,
        max_slippage_bps: 0,
    }
}

/// Multi-hop opportunity over a synthetic `USDC -> T1 .. -> USDC` path.
pub fn multi_hop(hops: usize, input: Decimal, gross: Decimal, confidence: Decimal) -> Opportunity {
    let mut token_path = vec![TokenId::new("USDC")];
    token_path.extend((1..hops).map(|i| TokenId::new(format!("T{}", i))));
    token_path.push(TokenId::new("USDC"));
    let venue_path = (0..hops).map(|i| VenueId::new(format!("v{}", i))).collect();

    Opportunity::new(
        OpportunityKind::MultiHop { hops },
        token_path,
        venue_path,
        CycleEconomics {
            input_amount: input,
            gross_output_amount: gross,
            gas_cost: Decimal::ZERO,
            slippage_cost: Decimal::ZERO,
        },
        confidence,
    )
    .expect("synthetic opportunity fits in a Decimal")
}

pub fn single_hop(input: Decimal, gross: Decimal, confidence: Decimal) -> Opportunity {
    Opportunity::new(
        OpportunityKind::SingleHop {
            buy_venue: VenueId::new("v1"),
            sell_venue: VenueId::new("v0"),
            buy_price: Decimal::ONE,
            sell_price: gross / input,
        },
        vec![TokenId::new("USDC"), TokenId::new("TOKEN"), TokenId::new("USDC")],
        vec![VenueId::new("v0"), VenueId::new("v1")],
        CycleEconomics {
            input_amount: input,
            gross_output_amount: gross,
            gas_cost: Decimal::ZERO,
            slippage_cost: Decimal::ZERO,
        },
        confidence,
    )
    .expect("synthetic opportunity fits in a Decimal")
}
