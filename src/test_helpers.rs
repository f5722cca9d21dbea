use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::types::{
    CycleEconomics, Opportunity, OpportunityKind, RawQuote, TokenId, VenueId,
};

#[allow(dead_code)]
pub fn raw_quote(venue: &str, token_in: &str, token_out: &str, amount_in: Decimal, amount_out: Decimal) -> RawQuote {
    RawQuote {
        venue_id: VenueId::new(venue),
        token_in: TokenId::new(token_in),
        token_out: TokenId::new(token_out),
        amount_in,
        amount_out,
        timestamp: Utc::now(),
    }
}

#[allow(dead_code)]
pub fn opportunity(kind: OpportunityKind, input: Decimal, gross: Decimal, confidence: Decimal) -> Opportunity {
    let legs = kind.legs();
    let mut token_path = vec![TokenId::new("USDC")];
    token_path.extend((1..legs).map(|i| TokenId::new(format!("T{}", i))));
    token_path.push(TokenId::new("USDC"));
    let venue_path = (0..legs).map(|i| VenueId::new(format!("v{}", i))).collect();

    Opportunity::new(
        kind,
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

#[allow(dead_code)]
pub fn multi_hop(hops: usize, input: Decimal, gross: Decimal, confidence: Decimal) -> Opportunity {
    opportunity(OpportunityKind::MultiHop { hops }, input, gross, confidence)
}

#[allow(dead_code)]
pub fn single_hop(input: Decimal, gross: Decimal, confidence: Decimal) -> Opportunity {
    opportunity(
        OpportunityKind::SingleHop {
            buy_venue: VenueId::new("v1"),
            sell_venue: VenueId::new("v0"),
            buy_price: dec!(1),
            sell_price: gross / input,
        },
        input,
        gross,
        confidence,
    )
}
